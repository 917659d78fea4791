//! In-process object store backed by DashMap.

use dashmap::{DashMap, DashSet};

use crate::{ObjectLocation, ObjectStore, StorageError};

/// Objects live in memory; buckets must be created before writing to them.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    buckets: DashSet<String>,
    objects: DashMap<ObjectLocation, Vec<u8>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_bucket(&self, bucket: impl Into<String>) {
        self.buckets.insert(bucket.into());
    }

    /// Seed an object, creating its bucket.
    pub fn with_object(self, location: ObjectLocation, body: impl Into<Vec<u8>>) -> Self {
        self.create_bucket(location.bucket.clone());
        self.objects.insert(location, body.into());
        self
    }

    pub fn object(&self, location: &ObjectLocation) -> Option<Vec<u8>> {
        self.objects.get(location).map(|body| body.value().clone())
    }

    /// Keys currently stored in `bucket`, sorted.
    pub fn keys(&self, bucket: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .objects
            .iter()
            .filter(|entry| entry.key().bucket == bucket)
            .map(|entry| entry.key().key.clone())
            .collect();
        keys.sort();
        keys
    }
}

impl ObjectStore for InMemoryStore {
    async fn get_object(&self, location: &ObjectLocation) -> Result<Vec<u8>, StorageError> {
        metrics::counter!("storage.get").increment(1);
        if !self.buckets.contains(&location.bucket) {
            metrics::counter!("storage.errors").increment(1);
            return Err(StorageError::NoSuchBucket(location.bucket.clone()));
        }
        self.object(location).ok_or_else(|| {
            metrics::counter!("storage.errors").increment(1);
            StorageError::NoSuchKey(location.key.clone())
        })
    }

    async fn put_object(&self, location: &ObjectLocation, body: Vec<u8>) -> Result<(), StorageError> {
        metrics::counter!("storage.put").increment(1);
        if !self.buckets.contains(&location.bucket) {
            metrics::counter!("storage.errors").increment(1);
            return Err(StorageError::NoSuchBucket(location.bucket.clone()));
        }
        self.objects.insert(location.clone(), body);
        Ok(())
    }
}
