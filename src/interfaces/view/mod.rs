use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;
use url::Url;

use crate::application::{ReportObserver, ReportSnapshot};
use crate::domain::report::{
    columns, FilterCriteria, FilterField, ProfileStatus, Record, SummaryStats,
};
use crate::infrastructure::config::ViewConfig;

/// Table column headings, in display order
pub const TABLE_HEADINGS: [&str; 7] = [
    "User Name",
    "Profile URL",
    "Profile Status",
    "Skill Badges Completed",
    "Names of Completed Skill Badges",
    "Arcade Games Completed",
    "Names of Completed Arcade Games",
];

const MAX_CELL_WIDTH: usize = 40;

/// One rendered table row
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    /// Render key, the record's dataset position
    pub key: usize,
    pub user_name: String,
    /// Parsed profile link; `None` when the cell is not a valid URL
    pub profile_url: Option<Url>,
    pub profile_url_raw: String,
    pub profile_status: String,
    pub skill_badge_count: String,
    pub skill_badge_names: String,
    pub arcade_game_count: String,
    pub arcade_game_names: String,
}

impl TableRow {
    pub fn from_record(record: &Record) -> Self {
        let text = |value: Option<&str>| value.unwrap_or_default().to_string();
        let profile_url_raw = text(record.profile_url());

        Self {
            key: record.index(),
            user_name: text(record.user_name()),
            profile_url: Url::parse(profile_url_raw.trim()).ok(),
            profile_url_raw,
            profile_status: record
                .profile_url_status()
                .map(ProfileStatus::display_label)
                .unwrap_or_default()
                .to_string(),
            skill_badge_count: text(record.get(columns::SKILL_BADGE_COUNT)),
            skill_badge_names: text(record.skill_badge_names()),
            arcade_game_count: text(record.get(columns::ARCADE_GAME_COUNT)),
            arcade_game_names: text(record.arcade_game_names()),
        }
    }

    fn cells(&self) -> [&str; 7] {
        [
            self.user_name.as_str(),
            self.profile_url
                .as_ref()
                .map(Url::as_str)
                .unwrap_or(self.profile_url_raw.as_str()),
            self.profile_status.as_str(),
            self.skill_badge_count.as_str(),
            self.skill_badge_names.as_str(),
            self.arcade_game_count.as_str(),
            self.arcade_game_names.as_str(),
        ]
    }
}

/// A categorical selector offered to the user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterControl {
    pub name: &'static str,
    pub options: Vec<&'static str>,
    pub selected: &'static str,
}

/// Everything a front end needs to draw the page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewModel {
    pub title: String,
    pub subtitle: String,
    pub summary: SummaryStats,
    pub criteria: FilterCriteria,
    pub filters: Vec<FilterControl>,
    pub total_rows: usize,
    /// When the displayed dataset was installed
    pub loaded_at: DateTime<Utc>,
    pub rows: Vec<TableRow>,
    pub error: Option<String>,
}

impl ViewModel {
    pub fn from_snapshot(config: &ViewConfig, snapshot: &ReportSnapshot<'_>) -> Self {
        let filters = FilterField::ALL
            .into_iter()
            .map(|field| FilterControl {
                name: field.name(),
                options: field.options(),
                selected: snapshot.criteria.value_of(field),
            })
            .collect();

        Self {
            title: config.title.clone(),
            subtitle: config.subtitle.clone(),
            summary: *snapshot.summary,
            criteria: snapshot.criteria.clone(),
            filters,
            total_rows: snapshot.dataset.len(),
            loaded_at: snapshot.dataset.loaded_at(),
            rows: snapshot.active.records().map(TableRow::from_record).collect(),
            error: snapshot.last_error.map(|e| e.to_string()),
        }
    }
}

/// Plain-text rendering of the report page
pub struct TextTableView<W: Write> {
    out: W,
    config: ViewConfig,
}

impl<W: Write> TextTableView<W> {
    pub fn new(out: W, config: ViewConfig) -> Self {
        Self { out, config }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn render(&mut self, snapshot: &ReportSnapshot<'_>) -> std::io::Result<()> {
        let model = ViewModel::from_snapshot(&self.config, snapshot);
        let out = &mut self.out;

        writeln!(out, "{}", model.title)?;
        writeln!(out, "{}", model.subtitle)?;
        writeln!(out)?;

        if let Some(error) = &model.error {
            writeln!(out, "Could not load the report: {}", error)?;
        }

        writeln!(
            out,
            "Total Participants: {}    Total Correct Participants: {}",
            model.summary.total_participants, model.summary.total_correct_participants
        )?;

        let selectors: Vec<String> = model
            .filters
            .iter()
            .map(|f| format!("{}={}", f.name, f.selected))
            .collect();
        writeln!(
            out,
            "Search: \"{}\"    {}",
            model.criteria.search_term,
            selectors.join("  ")
        )?;
        writeln!(out, "Showing {} of {} participants", model.rows.len(), model.total_rows)?;
        writeln!(out)?;

        let widths = column_widths(&model.rows);
        write_line(out, &TABLE_HEADINGS, &widths)?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        writeln!(out, "{}", rule.join("-+-"))?;
        for row in &model.rows {
            write_line(out, &row.cells(), &widths)?;
        }
        out.flush()
    }
}

impl<W: Write> ReportObserver for TextTableView<W> {
    fn on_report_changed(&mut self, snapshot: &ReportSnapshot<'_>) {
        if let Err(err) = self.render(snapshot) {
            warn!(error = %err, "Failed to render report table");
        }
    }
}

fn column_widths(rows: &[TableRow]) -> [usize; 7] {
    let mut widths = TABLE_HEADINGS.map(|h| h.chars().count().min(MAX_CELL_WIDTH));
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row.cells()) {
            *width = (*width).max(cell.chars().count().min(MAX_CELL_WIDTH));
        }
    }
    widths
}

fn write_line(out: &mut impl Write, cells: &[&str; 7], widths: &[usize; 7]) -> std::io::Result<()> {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", fit(cell, *width), width = *width))
        .collect();
    writeln!(out, "{}", padded.join(" | ").trim_end())
}

/// Cut a cell to `width` characters, marking the cut with `~`
fn fit(cell: &str, width: usize) -> String {
    let cell = cell.replace(['\n', '\r'], " ");
    if cell.chars().count() <= width {
        return cell;
    }
    let mut cut: String = cell.chars().take(width.saturating_sub(1)).collect();
    cut.push('~');
    cut
}
