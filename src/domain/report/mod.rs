// ============================================================
// REPORT DOMAIN LAYER
// ============================================================
// Participant records, filter criteria and summary values
// No I/O, no async

mod dataset;
mod filter;
mod record;
mod schema;
mod summary;

pub use dataset::{Dataset, FieldCoercionWarning};
pub use filter::{FilterCriteria, FilterField, ProfileStatusFilter, YesNoFilter};
pub use record::{Record, RecordField};
pub use schema::{columns, ProfileStatus, COUNT_COLUMNS, REPORT_COLUMNS};
pub use summary::SummaryStats;
