//! Local filesystem object store: `<root>/<bucket>/<key>`.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use searchrev_core::config::StorageConfig;
use tracing::{debug, error};

use crate::{ObjectLocation, ObjectStore, StorageError};

/// Buckets are directories directly under `root` and must exist before
/// anything is written to them; directories inside a bucket are created
/// on demand.
#[derive(Debug, Clone)]
pub struct LocalFsStore {
    root: PathBuf,
}

impl LocalFsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(&config.root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn bucket_dir(&self, location: &ObjectLocation) -> Result<PathBuf, StorageError> {
        let bucket = Path::new(&location.bucket);
        if !is_plain_relative(bucket) || bucket.components().count() != 1 {
            return Err(StorageError::InvalidKey(location.to_string()));
        }
        Ok(self.root.join(bucket))
    }

    fn object_path(&self, location: &ObjectLocation) -> Result<(PathBuf, PathBuf), StorageError> {
        let bucket_dir = self.bucket_dir(location)?;
        let key = Path::new(&location.key);
        if !is_plain_relative(key) {
            return Err(StorageError::InvalidKey(location.to_string()));
        }
        let path = bucket_dir.join(key);
        Ok((bucket_dir, path))
    }

    async fn ensure_bucket(&self, bucket_dir: &Path, location: &ObjectLocation) -> Result<(), StorageError> {
        match tokio::fs::metadata(bucket_dir).await {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(StorageError::NoSuchBucket(location.bucket.clone())),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StorageError::NoSuchBucket(location.bucket.clone()))
            }
            Err(e) => Err(io_error(location, e)),
        }
    }
}

/// True when every component is a normal path segment (no `..`, no root).
fn is_plain_relative(path: &Path) -> bool {
    path.components().next().is_some()
        && path.components().all(|c| matches!(c, Component::Normal(_)))
}

fn io_error(location: &ObjectLocation, source: std::io::Error) -> StorageError {
    StorageError::Io {
        location: location.to_string(),
        source,
    }
}

impl ObjectStore for LocalFsStore {
    async fn get_object(&self, location: &ObjectLocation) -> Result<Vec<u8>, StorageError> {
        metrics::counter!("storage.get").increment(1);
        let result = async {
            let (bucket_dir, path) = self.object_path(location)?;
            self.ensure_bucket(&bucket_dir, location).await?;
            tokio::fs::read(&path).await.map_err(|e| match e.kind() {
                ErrorKind::NotFound => StorageError::NoSuchKey(location.key.clone()),
                _ => io_error(location, e),
            })
        }
        .await;

        match &result {
            Ok(body) => debug!(location = %location, bytes = body.len(), "Object read"),
            Err(e) => {
                metrics::counter!("storage.errors").increment(1);
                error!(location = %location, code = e.code(), error = %e, "Object read failed");
            }
        }
        result
    }

    async fn put_object(&self, location: &ObjectLocation, body: Vec<u8>) -> Result<(), StorageError> {
        metrics::counter!("storage.put").increment(1);
        let bytes = body.len();
        let result = async {
            let (bucket_dir, path) = self.object_path(location)?;
            self.ensure_bucket(&bucket_dir, location).await?;
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| io_error(location, e))?;
            }
            tokio::fs::write(&path, body)
                .await
                .map_err(|e| io_error(location, e))
        }
        .await;

        match &result {
            Ok(()) => debug!(location = %location, bytes, "Object written"),
            Err(e) => {
                metrics::counter!("storage.errors").increment(1);
                error!(location = %location, code = e.code(), error = %e, "Object write failed");
            }
        }
        result
    }
}
