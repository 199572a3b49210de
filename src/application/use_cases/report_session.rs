// ============================================================
// REPORT SESSION
// ============================================================
// State owner for one loaded report: dataset, criteria, derived views

use std::sync::Arc;

use tracing::{debug, error, info};

use super::filter_state::{FilterPredicateSet, RecomputeRequest};
use super::query_engine::{compute_active_subset, ActiveSubset};
use super::summary_aggregator::compute_summary;
use crate::domain::error::{AppError, Result};
use crate::domain::report::{Dataset, FilterCriteria, SummaryStats};
use crate::infrastructure::csv::ReportParser;
use crate::infrastructure::report_source::ReportSource;

/// What caused a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    DatasetInstalled,
    LoadFailed,
    CriteriaChanged,
}

/// Read-only view of the session handed to observers
#[derive(Debug)]
pub struct ReportSnapshot<'a> {
    pub change: ChangeKind,
    pub dataset: &'a Dataset,
    pub criteria: &'a FilterCriteria,
    pub active: &'a ActiveSubset,
    pub summary: &'a SummaryStats,
    pub last_error: Option<&'a AppError>,
}

/// Called after every completed state transition
pub trait ReportObserver {
    fn on_report_changed(&mut self, snapshot: &ReportSnapshot<'_>);
}

impl<F> ReportObserver for F
where
    F: FnMut(&ReportSnapshot<'_>),
{
    fn on_report_changed(&mut self, snapshot: &ReportSnapshot<'_>) {
        self(snapshot)
    }
}

pub struct ReportSession {
    dataset: Arc<Dataset>,
    filters: FilterPredicateSet,
    active: ActiveSubset,
    summary: SummaryStats,
    last_error: Option<AppError>,
    recomputations: u64,
    observers: Vec<Box<dyn ReportObserver>>,
}

impl ReportSession {
    pub fn new() -> Self {
        Self {
            dataset: Arc::new(Dataset::empty()),
            filters: FilterPredicateSet::new(),
            active: ActiveSubset::empty(),
            summary: SummaryStats::default(),
            last_error: None,
            recomputations: 0,
            observers: Vec::new(),
        }
    }

    /// Register an observer; observers run in registration order
    pub fn subscribe(&mut self, observer: impl ReportObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn criteria(&self) -> &FilterCriteria {
        self.filters.criteria()
    }

    pub fn active_subset(&self) -> &ActiveSubset {
        &self.active
    }

    pub fn summary(&self) -> &SummaryStats {
        &self.summary
    }

    pub fn last_error(&self) -> Option<&AppError> {
        self.last_error.as_ref()
    }

    /// Number of criteria changes accepted so far
    pub fn generation(&self) -> u64 {
        self.filters.generation()
    }

    /// Number of active-subset recomputations performed
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }

    pub fn snapshot(&self, change: ChangeKind) -> ReportSnapshot<'_> {
        ReportSnapshot {
            change,
            dataset: &self.dataset,
            criteria: self.filters.criteria(),
            active: &self.active,
            summary: &self.summary,
            last_error: self.last_error.as_ref(),
        }
    }

    /// Replace the dataset. The summary is computed here once and held
    /// until the next install; criteria changes do not touch it.
    pub fn install_dataset(&mut self, dataset: Dataset) {
        let summary = compute_summary(&dataset);
        info!(
            dataset_id = %dataset.id(),
            loaded_at = %dataset.loaded_at().to_rfc3339(),
            rows = dataset.len(),
            correct = summary.total_correct_participants,
            warnings = dataset.warnings().len(),
            "Installing report dataset"
        );

        self.dataset = Arc::new(dataset);
        self.summary = summary;
        self.last_error = None;
        self.recompute();
        self.notify(ChangeKind::DatasetInstalled);
    }

    /// Fetch, decode and parse a report, then install it. On failure the
    /// current dataset stays in place and the error is kept for display.
    pub async fn load(&mut self, source: &dyn ReportSource, parser: &ReportParser) -> Result<()> {
        let outcome = match source.fetch_text().await {
            Ok(text) => parser.parse(&text),
            Err(err) => Err(err),
        };

        match outcome {
            Ok(dataset) => {
                self.install_dataset(dataset);
                Ok(())
            }
            Err(err) => {
                error!(source = %source.describe(), error = %err, "Failed to load report");
                self.last_error = Some(err.clone());
                self.notify(ChangeKind::LoadFailed);
                Err(err)
            }
        }
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        let request = self.filters.set_search_term(term);
        self.apply(request);
    }

    /// Set a categorical filter by surface name. Rejected values change
    /// nothing and notify no one.
    pub fn set_filter(&mut self, field_name: &str, value: &str) -> Result<()> {
        let request = self.filters.set_filter(field_name, value)?;
        self.apply(request);
        Ok(())
    }

    pub fn reset_filters(&mut self) {
        let request = self.filters.reset();
        self.apply(request);
    }

    fn apply(&mut self, request: RecomputeRequest) {
        debug!(generation = request.generation, "Recomputing active subset");
        self.recompute();
        self.notify(ChangeKind::CriteriaChanged);
    }

    fn recompute(&mut self) {
        self.active = compute_active_subset(&self.dataset, self.filters.criteria());
        self.recomputations += 1;
        debug!(
            matched = self.active.len(),
            total = self.dataset.len(),
            "Active subset recomputed"
        );
    }

    fn notify(&mut self, change: ChangeKind) {
        let snapshot = ReportSnapshot {
            change,
            dataset: &self.dataset,
            criteria: self.filters.criteria(),
            active: &self.active,
            summary: &self.summary,
            last_error: self.last_error.as_ref(),
        };
        for observer in self.observers.iter_mut() {
            observer.on_report_changed(&snapshot);
        }
    }
}

impl Default for ReportSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::report::{columns, Record};
    use async_trait::async_trait;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct StaticSource(std::result::Result<&'static str, AppError>);

    #[async_trait]
    impl ReportSource for StaticSource {
        async fn fetch_text(&self) -> Result<String> {
            self.0.clone().map(str::to_string)
        }

        fn describe(&self) -> String {
            "static".to_string()
        }
    }

    const REPORT_CSV: &str = "\
User Name,Profile URL Status,Access Code Redemption Status,All Skill Badges & Games Completed
Ann,All Good,Yes,Yes
Bob,Wrong Google Cloud Skills Boost Public Profile URL,No,No
";

    fn scenario_dataset() -> Dataset {
        let row = |name: &str, status: &str, yes_no: &str| {
            Record::from_pairs(
                0,
                &[
                    (columns::USER_NAME, name),
                    (columns::PROFILE_URL_STATUS, status),
                    (columns::REDEMPTION_STATUS, yes_no),
                    (columns::ALL_COMPLETED, yes_no),
                ],
            )
        };
        Dataset::from_records(vec![
            row("Ann", "AllGood", "Yes"),
            row("Bob", "WrongProfileUrl", "No"),
        ])
        .unwrap()
    }

    fn recording(session: &mut ReportSession) -> Rc<RefCell<Vec<(ChangeKind, usize)>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        session.subscribe(move |snapshot: &ReportSnapshot<'_>| {
            sink.borrow_mut().push((snapshot.change, snapshot.active.len()));
        });
        seen
    }

    fn active_names(session: &ReportSession) -> Vec<String> {
        session
            .active_subset()
            .records()
            .filter_map(|r| r.user_name().map(str::to_string))
            .collect()
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = ReportSession::new();
        assert!(session.dataset().is_empty());
        assert!(session.active_subset().is_empty());
        assert_eq!(*session.summary(), SummaryStats::default());
        assert!(session.last_error().is_none());
    }

    #[test]
    fn test_install_computes_summary_and_subset() {
        let mut session = ReportSession::new();
        let seen = recording(&mut session);

        session.install_dataset(scenario_dataset());

        assert_eq!(active_names(&session), ["Ann", "Bob"]);
        assert_eq!(
            *session.summary(),
            SummaryStats {
                total_participants: 2,
                total_correct_participants: 1,
            }
        );
        assert_eq!(*seen.borrow(), [(ChangeKind::DatasetInstalled, 2)]);
    }

    #[test]
    fn test_each_mutation_recomputes_once_and_notifies_once() {
        let mut session = ReportSession::new();
        session.install_dataset(scenario_dataset());
        let seen = recording(&mut session);
        let before = session.recomputations();

        session.set_filter("profileStatus", "AllGood").unwrap();
        assert_eq!(active_names(&session), ["Ann"]);

        session.set_filter("profileStatus", "All").unwrap();
        session.set_search_term("bo");
        assert_eq!(active_names(&session), ["Bob"]);

        assert_eq!(session.recomputations(), before + 3);
        assert_eq!(
            *seen.borrow(),
            [
                (ChangeKind::CriteriaChanged, 1),
                (ChangeKind::CriteriaChanged, 2),
                (ChangeKind::CriteriaChanged, 1),
            ]
        );
    }

    #[test]
    fn test_summary_ignores_filters() {
        let mut session = ReportSession::new();
        session.install_dataset(scenario_dataset());

        session.set_search_term("nobody");
        assert!(session.active_subset().is_empty());
        assert_eq!(session.summary().total_participants, 2);
        assert_eq!(session.summary().total_correct_participants, 1);
    }

    #[test]
    fn test_rejected_filter_changes_nothing() {
        let mut session = ReportSession::new();
        session.install_dataset(scenario_dataset());
        let seen = recording(&mut session);
        let before = session.recomputations();

        assert!(session.set_filter("badgesCompleted", "Maybe").is_err());

        assert_eq!(session.recomputations(), before);
        assert_eq!(session.generation(), 0);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_criteria_survive_dataset_replacement() {
        let mut session = ReportSession::new();
        session.set_filter("redemptionStatus", "No").unwrap();
        assert!(session.active_subset().is_empty());

        session.install_dataset(scenario_dataset());
        assert_eq!(active_names(&session), ["Bob"]);
    }

    #[test]
    fn test_reset_filters() {
        let mut session = ReportSession::new();
        session.install_dataset(scenario_dataset());
        session.set_search_term("ann");
        session.reset_filters();

        assert!(session.criteria().is_match_all());
        assert_eq!(session.active_subset().len(), 2);
    }

    #[tokio::test]
    async fn test_load_installs_parsed_report() {
        let mut session = ReportSession::new();
        let seen = recording(&mut session);

        session
            .load(&StaticSource(Ok(REPORT_CSV)), &ReportParser::new())
            .await
            .unwrap();

        assert_eq!(session.dataset().len(), 2);
        assert_eq!(session.summary().total_correct_participants, 1);
        assert_eq!(*seen.borrow(), [(ChangeKind::DatasetInstalled, 2)]);
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_previous_dataset() {
        let mut session = ReportSession::new();
        session.install_dataset(scenario_dataset());
        let seen = recording(&mut session);

        let fetch_error = AppError::FetchError("connection refused".to_string());
        let err = session
            .load(&StaticSource(Err(fetch_error.clone())), &ReportParser::new())
            .await
            .unwrap_err();

        assert_eq!(err, fetch_error);
        assert_eq!(session.last_error(), Some(&fetch_error));
        assert_eq!(session.dataset().len(), 2);
        assert_eq!(*seen.borrow(), [(ChangeKind::LoadFailed, 2)]);
    }

    #[tokio::test]
    async fn test_parse_error_leaves_session_empty() {
        let mut session = ReportSession::new();

        let err = session
            .load(&StaticSource(Ok("")), &ReportParser::new())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ParseError(_)));
        assert!(session.dataset().is_empty());
        assert!(session.active_subset().is_empty());
        assert_eq!(*session.summary(), SummaryStats::default());
    }

    #[tokio::test]
    async fn test_successful_load_clears_previous_error() {
        let mut session = ReportSession::new();
        let _ = session
            .load(&StaticSource(Ok("")), &ReportParser::new())
            .await;
        assert!(session.last_error().is_some());

        session
            .load(&StaticSource(Ok(REPORT_CSV)), &ReportParser::new())
            .await
            .unwrap();
        assert!(session.last_error().is_none());
    }
}
