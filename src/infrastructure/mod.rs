pub mod config;
pub mod csv;
pub mod report_source;
