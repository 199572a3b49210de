pub mod filter_state;
pub mod query_engine;
pub mod report_session;
pub mod summary_aggregator;
