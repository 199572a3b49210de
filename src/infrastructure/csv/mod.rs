// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// Report decoding and delimited-text parsing

mod report_parser;

pub use report_parser::{decode_utf8, ReportParser};
