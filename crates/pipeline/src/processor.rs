//! Hit processor: runs one attribution pass per input and turns the result
//! into a per-input outcome. A failing input never stops the batch.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use searchrev_attribution::{AttributionEngine, AttributionOutput};
use searchrev_core::config::{AppConfig, AttributionConfig};
use searchrev_core::{decode_records, SearchRevError, SearchRevResult};
use searchrev_reporting::{KeywordPerformanceReport, ReportPublisher};
use searchrev_storage::{ObjectLocation, ObjectStore};
use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::event::InputEvent;

/// Result of one attribution run over one input.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub location: String,
    pub output: AttributionOutput,
}

impl RunSummary {
    pub fn revenue_found(&self) -> bool {
        self.output.revenue_found()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeStatus {
    Published { destination: String, bytes: usize },
    NoRevenueData,
    Failed {
        error: String,
        /// The computed report when only the upload failed.
        #[serde(skip_serializing_if = "Option::is_none")]
        unpublished: Option<KeywordPerformanceReport>,
    },
}

/// Outcome reported back for one input of a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputOutcome {
    pub bucket: String,
    pub key: String,
    #[serde(flatten)]
    pub status: OutcomeStatus,
}

pub struct HitProcessor<S> {
    store: Arc<S>,
    attribution: AttributionConfig,
    publisher: ReportPublisher<S>,
    report_date: Option<NaiveDate>,
}

impl<S: ObjectStore> HitProcessor<S> {
    pub fn new(store: Arc<S>, config: &AppConfig) -> Self {
        Self {
            publisher: ReportPublisher::new(store.clone(), config.report.clone()),
            store,
            attribution: config.attribution.clone(),
            report_date: None,
        }
    }

    /// Stamp reports with a fixed date instead of today's (UTC).
    pub fn with_report_date(mut self, date: NaiveDate) -> Self {
        self.report_date = Some(date);
        self
    }

    /// Fetch `location` and run a fresh attribution engine over it.
    pub async fn calculate_revenue(&self, location: &ObjectLocation) -> SearchRevResult<RunSummary> {
        let run_id = Uuid::new_v4();
        info!(run_id = %run_id, location = %location, "Processing hit-level input");

        let body = self
            .store
            .get_object(location)
            .await
            .map_err(|e| SearchRevError::upstream(location.to_string(), e))?;
        let body =
            String::from_utf8(body).map_err(|e| SearchRevError::upstream(location.to_string(), e))?;

        let mut engine = AttributionEngine::new(&self.attribution);
        engine.ingest_all(decode_records(&body));

        Ok(RunSummary {
            run_id,
            location: location.to_string(),
            output: engine.finish(),
        })
    }

    /// Calculate revenue for one input and publish its report next to it.
    /// A failed upload still hands back the computed report.
    pub async fn process_input(&self, location: &ObjectLocation) -> InputOutcome {
        InputOutcome {
            bucket: location.bucket.clone(),
            key: location.key.clone(),
            status: self.run(location).await,
        }
    }

    async fn run(&self, location: &ObjectLocation) -> OutcomeStatus {
        let summary = match self.calculate_revenue(location).await {
            Ok(summary) => summary,
            Err(e) => return failed(location, e, None),
        };
        if !summary.revenue_found() {
            info!(run_id = %summary.run_id, location = %location, "No revenue data found");
            return OutcomeStatus::NoRevenueData;
        }

        let report = KeywordPerformanceReport::from_ranked(&summary.output.ranked, self.report_date());
        match self.publisher.publish(&report, &location.bucket).await {
            Ok(receipt) => OutcomeStatus::Published {
                destination: receipt.destination,
                bytes: receipt.bytes,
            },
            Err(e) => failed(location, e, Some(report)),
        }
    }

    /// Process every input of `event` in order.
    pub async fn handle_event(&self, event: &InputEvent) -> Vec<InputOutcome> {
        info!(inputs = event.records.len(), "Incoming event");

        let mut outcomes = Vec::with_capacity(event.records.len());
        for record in &event.records {
            outcomes.push(self.process_input(&record.location()).await);
        }
        outcomes
    }

    fn report_date(&self) -> NaiveDate {
        self.report_date.unwrap_or_else(|| Utc::now().date_naive())
    }
}

fn failed(
    location: &ObjectLocation,
    err: SearchRevError,
    unpublished: Option<KeywordPerformanceReport>,
) -> OutcomeStatus {
    error!(location = %location, error = %err, "Input processing failed");
    OutcomeStatus::Failed {
        error: err.to_string(),
        unpublished,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use searchrev_storage::{InMemoryStore, StorageError};

    const HEADER: &str = "hit_time_gmt\tdate_time\tuser_agent\tip\tevent_list\tgeo_city\tgeo_region\tgeo_country\tpagename\tpage_url\tproduct_list\treferrer";
    const BUCKET: &str = "acs-hit-level-data-store1";

    fn line(ts: &str, ip: &str, event: &str, products: &str, referrer: &str) -> String {
        format!("{ts}\t2009-09-27 06:34:40\tMozilla\t{ip}\t{event}\tSalem\tOR\tUS\tPage\thttp://www.esshopzilla.com\t{products}\t{referrer}")
    }

    fn purchase_body() -> String {
        [
            HEADER.to_string(),
            line("100", "1.1.1.1", "", "", "http://www.bing.com/search?q=Zune&go=&form=QBLH"),
            line("200", "1.1.1.1", "1", "Electronics;Zune - 32GB;1;250;", "https://www.esshopzilla.com/checkout/?a=confirm"),
        ]
        .join("\n")
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2009, 9, 27).unwrap()
    }

    fn processor(store: Arc<InMemoryStore>) -> HitProcessor<InMemoryStore> {
        HitProcessor::new(store, &AppConfig::default()).with_report_date(date())
    }

    /// Readable store whose writes always fail.
    struct ReadOnlyStore(InMemoryStore);

    impl ObjectStore for ReadOnlyStore {
        async fn get_object(&self, location: &ObjectLocation) -> Result<Vec<u8>, StorageError> {
            self.0.get_object(location).await
        }

        async fn put_object(&self, location: &ObjectLocation, _body: Vec<u8>) -> Result<(), StorageError> {
            Err(StorageError::NoSuchBucket(location.bucket.clone()))
        }
    }

    #[tokio::test]
    async fn test_publishes_report_next_to_input() {
        let input = ObjectLocation::new(BUCKET, "hit-level-data/data.tsv");
        let store = Arc::new(InMemoryStore::new().with_object(input.clone(), purchase_body()));
        let outcome = processor(store.clone()).process_input(&input).await;

        assert_eq!(outcome.key, "hit-level-data/data.tsv");
        assert_eq!(
            outcome.status,
            OutcomeStatus::Published {
                destination: format!(
                    "{BUCKET}/hit-level-data/output/2009-09-27_SearchKeywordPerformance.tab"
                ),
                bytes: 64,
            }
        );
        let body = store
            .object(&ObjectLocation::new(
                BUCKET,
                "hit-level-data/output/2009-09-27_SearchKeywordPerformance.tab",
            ))
            .unwrap();
        assert_eq!(
            String::from_utf8(body).unwrap(),
            "Search Engine Domain\tSearch Keyword\tRevenue\nbing.com\tzune\t250.0\n"
        );
    }

    #[tokio::test]
    async fn test_no_revenue_writes_nothing() {
        let input = ObjectLocation::new(BUCKET, "hit-level-data/data.tsv");
        let body = [
            HEADER.to_string(),
            line("100", "1.1.1.1", "", "", "http://www.bing.com/search?q=Zune&go="),
        ]
        .join("\n");
        let store = Arc::new(InMemoryStore::new().with_object(input.clone(), body));

        let summary = processor(store.clone()).calculate_revenue(&input).await.unwrap();
        assert!(!summary.revenue_found());
        assert_eq!(summary.output.pending_visitors, 1);

        let outcome = processor(store.clone()).process_input(&input).await;
        assert_eq!(outcome.status, OutcomeStatus::NoRevenueData);
        assert_eq!(store.keys(BUCKET), vec!["hit-level-data/data.tsv"]);
    }

    #[tokio::test]
    async fn test_unreadable_input_fails_only_itself() {
        let good = ObjectLocation::new(BUCKET, "hit-level-data/data.tsv");
        let store = Arc::new(
            InMemoryStore::new()
                .with_object(good.clone(), purchase_body())
                .with_object(ObjectLocation::new(BUCKET, "binary.tsv"), vec![0xffu8, 0xfe, 0x00]),
        );
        let event = InputEvent::from_locations(vec![
            ObjectLocation::new(BUCKET, "missing.tsv"),
            ObjectLocation::new(BUCKET, "binary.tsv"),
            good,
        ]);

        let outcomes = processor(store).handle_event(&event).await;
        assert_eq!(outcomes.len(), 3);
        match &outcomes[0].status {
            OutcomeStatus::Failed { error, unpublished } => {
                assert!(error.starts_with("Upstream unavailable"));
                assert!(error.contains("NoSuchKey"));
                assert!(unpublished.is_none());
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(matches!(outcomes[1].status, OutcomeStatus::Failed { .. }));
        assert!(matches!(outcomes[2].status, OutcomeStatus::Published { .. }));
    }

    #[tokio::test]
    async fn test_rejected_upload_is_reported_with_cause() {
        let input = ObjectLocation::new(BUCKET, "hit-level-data/data.tsv");
        let store = Arc::new(ReadOnlyStore(
            InMemoryStore::new().with_object(input.clone(), purchase_body()),
        ));
        let processor = HitProcessor::new(store, &AppConfig::default()).with_report_date(date());

        let summary = processor.calculate_revenue(&input).await.unwrap();
        assert!(summary.revenue_found());

        let outcome = processor.process_input(&input).await;
        match outcome.status {
            OutcomeStatus::Failed { error, unpublished } => {
                assert!(error.starts_with("Downstream unavailable"));
                assert!(error.contains("NoSuchBucket"));

                let report = unpublished.unwrap();
                assert_eq!(report.generated_on, date());
                assert_eq!(
                    report.render(),
                    "Search Engine Domain\tSearch Keyword\tRevenue\nbing.com\tzune\t250.0\n"
                );
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failed_upload_serializes_the_report() {
        let input = ObjectLocation::new(BUCKET, "hit-level-data/data.tsv");
        let store = Arc::new(ReadOnlyStore(
            InMemoryStore::new().with_object(input.clone(), purchase_body()),
        ));
        let processor = HitProcessor::new(store, &AppConfig::default()).with_report_date(date());

        let json = serde_json::to_value(processor.process_input(&input).await).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["unpublished"]["rows"][0]["search_domain"], "bing.com");
        assert_eq!(json["unpublished"]["rows"][0]["revenue"], 250.0);
    }

    #[test]
    fn test_outcome_serializes_flat() {
        let outcome = InputOutcome {
            bucket: BUCKET.into(),
            key: "hit-level-data/data.tsv".into(),
            status: OutcomeStatus::NoRevenueData,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "no_revenue_data");
        assert_eq!(json["key"], "hit-level-data/data.tsv");
    }
}
