#![warn(clippy::unwrap_used)]

pub mod config;
pub mod error;
pub mod hit;
pub mod types;

pub use config::AppConfig;
pub use error::{SearchRevError, SearchRevResult};
pub use hit::{decode_records, Hit, HitRecord, HitShapeError};
pub use types::AttributionKey;
