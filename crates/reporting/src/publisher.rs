//! Uploads a rendered report to object storage.

use std::sync::Arc;

use searchrev_core::config::ReportConfig;
use searchrev_core::{SearchRevError, SearchRevResult};
use searchrev_storage::{ObjectLocation, ObjectStore};
use serde::Serialize;
use tracing::{error, info};

use crate::report::KeywordPerformanceReport;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishReceipt {
    pub destination: String,
    pub bytes: usize,
}

pub struct ReportPublisher<S> {
    store: Arc<S>,
    config: ReportConfig,
}

impl<S: ObjectStore> ReportPublisher<S> {
    pub fn new(store: Arc<S>, config: ReportConfig) -> Self {
        Self { store, config }
    }

    /// Where `report` lands inside `bucket`.
    pub fn destination(&self, report: &KeywordPerformanceReport, bucket: &str) -> ObjectLocation {
        ObjectLocation::new(
            bucket,
            format!("{}{}", self.config.output_prefix, report.file_name(&self.config)),
        )
    }

    pub async fn publish(
        &self,
        report: &KeywordPerformanceReport,
        bucket: &str,
    ) -> SearchRevResult<PublishReceipt> {
        let destination = self.destination(report, bucket);
        let body = report.render().into_bytes();
        let bytes = body.len();

        match self.store.put_object(&destination, body).await {
            Ok(()) => {
                info!(
                    destination = %destination,
                    rows = report.rows.len(),
                    bytes,
                    "Keyword performance report published"
                );
                Ok(PublishReceipt {
                    destination: destination.to_string(),
                    bytes,
                })
            }
            Err(e) => {
                error!(destination = %destination, code = e.code(), error = %e, "Report upload failed");
                Err(SearchRevError::downstream(destination.to_string(), e))
            }
        }
    }
}
