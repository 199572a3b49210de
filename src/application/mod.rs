pub mod use_cases;

pub use use_cases::filter_state::{FilterPredicateSet, RecomputeRequest};
pub use use_cases::query_engine::{compute_active_subset, ActiveSubset};
pub use use_cases::report_session::{ChangeKind, ReportObserver, ReportSession, ReportSnapshot};
pub use use_cases::summary_aggregator::compute_summary;
