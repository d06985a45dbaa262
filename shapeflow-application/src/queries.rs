pub mod alert_queries;
pub mod filter_queries;
pub mod report_queries;
