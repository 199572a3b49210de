use std::io::{BufRead, Write};

use tracing::{debug, info};

use crate::application::{ChangeKind, ReportSession};
use crate::domain::error::{AppError, Result};
use crate::domain::report::FilterField;
use crate::infrastructure::config::ViewConfig;
use crate::interfaces::view::{TextTableView, ViewModel};

/// One line typed at the filter prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlCommand {
    /// Replace the search term; empty clears it
    Search(String),
    Filter { field: String, value: String },
    Reset,
    Show,
    Json,
    Help,
    Quit,
}

impl ControlCommand {
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        let (command, rest) = line
            .split_once(char::is_whitespace)
            .map(|(command, rest)| (command, rest.trim()))
            .unwrap_or((line, ""));

        match command {
            "search" | "s" => Ok(ControlCommand::Search(rest.to_string())),
            "filter" | "f" => {
                let (field, value) = rest.split_once(char::is_whitespace).ok_or_else(|| {
                    AppError::ValidationError("usage: filter <field> <value>".to_string())
                })?;
                Ok(ControlCommand::Filter {
                    field: field.to_string(),
                    value: value.trim().to_string(),
                })
            }
            "reset" => Ok(ControlCommand::Reset),
            "show" => Ok(ControlCommand::Show),
            "json" => Ok(ControlCommand::Json),
            "help" | "?" => Ok(ControlCommand::Help),
            "quit" | "exit" | "q" => Ok(ControlCommand::Quit),
            "" => Err(AppError::ValidationError("empty command".to_string())),
            other => Err(AppError::ValidationError(format!(
                "unknown command '{}', type 'help'",
                other
            ))),
        }
    }
}

fn write_help(out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "Commands:")?;
    writeln!(out, "  search <text>           filter by user name (no text clears)")?;
    for field in FilterField::ALL {
        writeln!(
            out,
            "  filter {:<17}select one of: {}",
            field.name(),
            field.options().join(", ")
        )?;
    }
    writeln!(out, "  reset                   clear search and filters")?;
    writeln!(out, "  show                    print the table")?;
    writeln!(out, "  json                    print the view as JSON")?;
    writeln!(out, "  quit")
}

/// Drive a session from line input until `quit` or end of input.
/// Each accepted line is fully applied before the next is read.
pub fn run_console<R: BufRead, W: Write>(
    session: &mut ReportSession,
    view: &ViewConfig,
    input: R,
    mut out: W,
) -> Result<()> {
    write_help(&mut out)?;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match ControlCommand::parse(&line) {
            Ok(command) => command,
            Err(err) => {
                writeln!(out, "{}", err)?;
                continue;
            }
        };
        debug!(?command, "Console command");

        match command {
            ControlCommand::Search(term) => session.set_search_term(term),
            ControlCommand::Filter { field, value } => {
                if let Err(err) = session.set_filter(&field, &value) {
                    writeln!(out, "{}", err)?;
                }
            }
            ControlCommand::Reset => session.reset_filters(),
            ControlCommand::Show => {
                TextTableView::new(&mut out, view.clone())
                    .render(&session.snapshot(ChangeKind::CriteriaChanged))?;
            }
            ControlCommand::Json => {
                let model = ViewModel::from_snapshot(view, &session.snapshot(ChangeKind::CriteriaChanged));
                let json = serde_json::to_string_pretty(&model)
                    .map_err(|e| AppError::Internal(format!("Failed to serialize view: {}", e)))?;
                writeln!(out, "{}", json)?;
            }
            ControlCommand::Help => write_help(&mut out)?,
            ControlCommand::Quit => break,
        }
    }

    info!(generation = session.generation(), "Console closed");
    Ok(())
}
