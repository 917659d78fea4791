//! Malformed hits: records the engine could not interpret. They are kept
//! for operator visibility and never retried.

use searchrev_core::{HitRecord, HitShapeError};
use serde::Serialize;
use thiserror::Error;

use crate::keyword::KeywordError;
use crate::referrer::ReferrerError;
use crate::revenue::RevenueError;

/// Why a hit was diverted instead of processed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedRecord {
    #[error("record shape: {0}")]
    Shape(#[from] HitShapeError),

    #[error("unclassifiable referrer: {0}")]
    Referrer(#[from] ReferrerError),

    #[error("keyword extraction: {0}")]
    Keyword(#[from] KeywordError),

    #[error("referrer `{domain}` is not a known search engine")]
    UnknownEngine { domain: String },

    #[error("purchase revenue: {0}")]
    Revenue(#[from] RevenueError),
}

impl MalformedRecord {
    /// Short machine-readable label, used for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Shape(_) => "shape",
            Self::Referrer(_) => "referrer",
            Self::Keyword(_) => "keyword",
            Self::UnknownEngine { .. } => "unknown_engine",
            Self::Revenue(_) => "revenue",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MalformedHit {
    pub record: HitRecord,
    pub reason: String,
}

/// Append-only list of diverted records, in the order they were seen.
#[derive(Debug, Default)]
pub struct MalformedSink {
    hits: Vec<MalformedHit>,
}

impl MalformedSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: HitRecord, reason: &MalformedRecord) {
        self.hits.push(MalformedHit {
            record,
            reason: reason.to_string(),
        });
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MalformedHit> {
        self.hits.iter()
    }

    pub fn into_hits(self) -> Vec<MalformedHit> {
        self.hits
    }
}
