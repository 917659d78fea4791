//! Search revenue attribution: replays hit-level records per visitor and
//! credits completed purchases to the search referral that preceded them.
//!
//! # Modules
//!
//! - [`referrer`]: Splits a referrer URL into domain and suffix, internal or external
//! - [`keyword`]: Pulls the search keyword out of a search-engine referrer
//! - [`revenue`]: Sums the prices of a product list, all-or-nothing
//! - [`session`]: Pending, not-yet-attributed referrals per visitor
//! - [`ledger`]: Cumulative revenue per (search domain, keyword)
//! - [`malformed`]: Records that could not be interpreted, and why
//! - [`engine`]: The per-hit state machine tying the above together

#![warn(clippy::unwrap_used)]

pub mod engine;
pub mod keyword;
pub mod ledger;
pub mod malformed;
pub mod referrer;
pub mod revenue;
pub mod session;

pub use engine::{AttributionEngine, AttributionOutput, HitOutcome};
pub use keyword::{KeywordError, KeywordExtractor};
pub use ledger::{LedgerEntry, RevenueLedger};
pub use malformed::{MalformedHit, MalformedRecord, MalformedSink};
pub use referrer::{Referrer, ReferrerClassifier, ReferrerError};
pub use revenue::{parse_revenue, RevenueError};
pub use session::{Session, SessionStore};
