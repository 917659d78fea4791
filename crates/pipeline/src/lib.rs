//! Per-input processing: fetch a hit-level export, run attribution over it,
//! and publish the keyword performance report.

#![warn(clippy::unwrap_used)]

pub mod event;
pub mod processor;

pub use event::{EventRecord, InputEvent};
pub use processor::{HitProcessor, InputOutcome, OutcomeStatus, RunSummary};
