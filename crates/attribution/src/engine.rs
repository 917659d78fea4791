//! Attribution engine: the single-pass state machine over one hit stream.
//!
//! External search referrals open (or extend) a visitor's session of pending
//! referrals. A completed purchase on the target site credits its revenue to
//! the visitor's most recent pending referral and consumes it. Anything that
//! cannot be interpreted is diverted to the malformed sink and the stream
//! carries on.
//!
//! One engine owns the state of one run; build a fresh engine per input.

use searchrev_core::config::AttributionConfig;
use searchrev_core::{AttributionKey, Hit, HitRecord};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::keyword::KeywordExtractor;
use crate::ledger::{LedgerEntry, RevenueLedger};
use crate::malformed::{MalformedHit, MalformedRecord, MalformedSink};
use crate::referrer::ReferrerClassifier;
use crate::revenue::parse_revenue;
use crate::session::SessionStore;

/// What a single hit did to the engine state.
#[derive(Debug, Clone, PartialEq)]
pub enum HitOutcome {
    /// First pending referral for the visitor.
    ReferralOpened,
    /// Another referral for a visitor that already had pending ones.
    ReferralQueued,
    /// A purchase was credited to the visitor's latest referral.
    Attributed { key: AttributionKey, revenue: f64 },
    /// Nothing to do: no pending referral, or not a purchase.
    Ignored,
    /// The record went to the malformed sink.
    Diverted(MalformedRecord),
}

/// Everything a finished run hands to the report writer.
#[derive(Debug, Clone, Serialize)]
pub struct AttributionOutput {
    /// Ledger entries by descending revenue.
    pub ranked: Vec<LedgerEntry>,
    pub malformed: Vec<MalformedHit>,
    pub hits_processed: u64,
    pub pending_visitors: usize,
    pub pending_referrals: usize,
}

impl AttributionOutput {
    pub fn revenue_found(&self) -> bool {
        !self.ranked.is_empty()
    }
}

pub struct AttributionEngine {
    classifier: ReferrerClassifier,
    extractor: KeywordExtractor,
    purchase_event_code: String,
    sessions: SessionStore,
    ledger: RevenueLedger,
    malformed: MalformedSink,
    hits_processed: u64,
}

impl AttributionEngine {
    pub fn new(config: &AttributionConfig) -> Self {
        Self {
            classifier: ReferrerClassifier::new(config.target_site.clone()),
            extractor: KeywordExtractor::from_config(config),
            purchase_event_code: config.purchase_event_code.clone(),
            sessions: SessionStore::new(),
            ledger: RevenueLedger::new(),
            malformed: MalformedSink::new(),
            hits_processed: 0,
        }
    }

    /// Apply one record. Never fails: a record that cannot be interpreted
    /// is diverted to the malformed sink.
    pub fn ingest(&mut self, record: HitRecord) -> HitOutcome {
        self.hits_processed += 1;
        metrics::counter!("attribution.hits").increment(1);

        match self.step(&record) {
            Ok(outcome) => outcome,
            Err(reason) => {
                warn!(
                    line = record.line,
                    kind = reason.kind(),
                    reason = %reason,
                    "Hit diverted to malformed sink"
                );
                metrics::counter!("attribution.malformed").increment(1);
                self.malformed.push(record, &reason);
                HitOutcome::Diverted(reason)
            }
        }
    }

    /// Apply every record in stream order.
    pub fn ingest_all<I>(&mut self, records: I)
    where
        I: IntoIterator<Item = HitRecord>,
    {
        for record in records {
            self.ingest(record);
        }
    }

    fn step(&mut self, record: &HitRecord) -> Result<HitOutcome, MalformedRecord> {
        let hit = Hit::from_record(record)?;
        let referrer = self.classifier.classify(hit.referrer_url)?;

        if !referrer.internal {
            let keyword = self.extractor.extract(&referrer.domain, hit.referrer_url)?;
            let search_domain = referrer.search_domain();

            if self.sessions.contains(hit.visitor_id) {
                // Unknown engines are still queued here, under the unset keyword.
                let key = match keyword {
                    Some(keyword) => AttributionKey::new(search_domain, keyword),
                    None => AttributionKey::unset(search_domain),
                };
                self.sessions.record(hit.visitor_id, hit.timestamp, key);
                return Ok(HitOutcome::ReferralQueued);
            }

            let keyword = keyword.ok_or(MalformedRecord::UnknownEngine {
                domain: search_domain.clone(),
            })?;
            self.sessions.record(
                hit.visitor_id,
                hit.timestamp,
                AttributionKey::new(search_domain, keyword),
            );
            return Ok(HitOutcome::ReferralOpened);
        }

        let is_purchase = hit.event_code == self.purchase_event_code;
        if !self.sessions.contains(hit.visitor_id) {
            if is_purchase {
                debug!(
                    visitor = hit.visitor_id,
                    line = record.line,
                    "Purchase without a pending referral, skipped"
                );
            }
            return Ok(HitOutcome::Ignored);
        }
        if !is_purchase {
            return Ok(HitOutcome::Ignored);
        }

        // Parse before touching the session so a bad purchase leaves it intact.
        let revenue = parse_revenue(hit.product_list)?;
        let Some((_, key)) = self.sessions.take_latest(hit.visitor_id) else {
            return Ok(HitOutcome::Ignored);
        };

        let total = self.ledger.credit(key.clone(), revenue);
        metrics::counter!("attribution.purchases_attributed").increment(1);
        debug!(
            visitor = hit.visitor_id,
            key = %key,
            revenue,
            total,
            "Purchase attributed"
        );

        Ok(HitOutcome::Attributed { key, revenue })
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn ledger(&self) -> &RevenueLedger {
        &self.ledger
    }

    pub fn malformed(&self) -> &MalformedSink {
        &self.malformed
    }

    pub fn hits_processed(&self) -> u64 {
        self.hits_processed
    }

    pub fn revenue_found(&self) -> bool {
        !self.ledger.is_empty()
    }

    /// End the run and hand over the ranked ledger and diverted records.
    pub fn finish(self) -> AttributionOutput {
        let output = AttributionOutput {
            pending_visitors: self.sessions.visitor_count(),
            pending_referrals: self.sessions.pending_count(),
            hits_processed: self.hits_processed,
            malformed: self.malformed.into_hits(),
            ranked: self.ledger.into_ranked(),
        };

        info!(
            hits = output.hits_processed,
            attributed_keys = output.ranked.len(),
            malformed = output.malformed.len(),
            pending_visitors = output.pending_visitors,
            "Attribution run finished"
        );
        output
    }
}
