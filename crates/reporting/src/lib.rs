//! Search keyword performance reporting: renders the ranked revenue ledger
//! and publishes it to object storage.

#![warn(clippy::unwrap_used)]

pub mod publisher;
pub mod report;

pub use publisher::{PublishReceipt, ReportPublisher};
pub use report::{format_revenue, KeywordPerformanceReport, ReportRow, REPORT_HEADER};
