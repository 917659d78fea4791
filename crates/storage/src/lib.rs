//! Object storage for hit-level inputs and published reports.
//!
//! [`ObjectStore`] is the seam between the pipeline and wherever the files
//! live. [`LocalFsStore`] maps buckets to directories; [`InMemoryStore`]
//! backs tests and dry runs.

#![warn(clippy::unwrap_used)]

pub mod local;
pub mod location;
pub mod memory;

use std::future::Future;

use thiserror::Error;

pub use local::LocalFsStore;
pub use location::ObjectLocation;
pub use memory::InMemoryStore;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("NoSuchBucket: the specified bucket does not exist: {0}")]
    NoSuchBucket(String),

    #[error("NoSuchKey: the specified key does not exist: {0}")]
    NoSuchKey(String),

    #[error("InvalidKey: {0}")]
    InvalidKey(String),

    #[error("IO error on {location}: {source}")]
    Io {
        location: String,
        source: std::io::Error,
    },
}

impl StorageError {
    /// Stable error code, in the style object stores report them.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoSuchBucket(_) => "NoSuchBucket",
            Self::NoSuchKey(_) => "NoSuchKey",
            Self::InvalidKey(_) => "InvalidKey",
            Self::Io { .. } => "InternalError",
        }
    }
}

/// Read and write whole objects by bucket and key.
pub trait ObjectStore: Send + Sync {
    fn get_object(
        &self,
        location: &ObjectLocation,
    ) -> impl Future<Output = Result<Vec<u8>, StorageError>> + Send;

    fn put_object(
        &self,
        location: &ObjectLocation,
        body: Vec<u8>,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;
}
