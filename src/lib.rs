//! Filterable progress report over a Study Jams participant CSV.
//!
//! The report is fetched once, parsed into an immutable [`Dataset`], and
//! held by a [`ReportSession`] together with the user's [`FilterCriteria`].
//! Every criteria change recomputes the active subset in full and notifies
//! the registered observers.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

use std::io;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

pub use crate::application::{
    compute_active_subset, compute_summary, ActiveSubset, ChangeKind, ReportObserver,
    ReportSession, ReportSnapshot,
};
pub use crate::domain::error::{AppError, Result};
pub use crate::domain::report::{
    Dataset, FilterCriteria, FilterField, ProfileStatus, ProfileStatusFilter, Record,
    SummaryStats, YesNoFilter,
};
pub use crate::infrastructure::config::AppConfig;
pub use crate::infrastructure::csv::ReportParser;
pub use crate::infrastructure::report_source::ReportSource;

use crate::interfaces::console::run_console;
use crate::interfaces::view::TextTableView;

/// Load configuration, fetch the report once, then serve filter commands from stdin
pub fn run() -> Result<()> {
    let config = AppConfig::load()?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .with_writer(io::stderr)
        .try_init();

    let source = infrastructure::report_source::from_config(&config.source)?;
    let parser = config.parser.build_parser();

    let mut session = ReportSession::new();
    session.subscribe(TextTableView::new(io::stdout(), config.view.clone()));

    info!(source = %source.describe(), "Loading report");
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    if let Err(err) = runtime.block_on(session.load(source.as_ref(), &parser)) {
        // The session keeps an empty dataset; the table shows the error and no rows
        warn!(error = %err, "Continuing without report data");
    }

    let stdin = io::stdin();
    run_console(&mut session, &config.view, stdin.lock(), io::stdout())
}
