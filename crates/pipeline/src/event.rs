//! Storage notification payload listing the inputs of one batch.

use searchrev_storage::ObjectLocation;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<EventRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(rename = "eventSource", default, skip_serializing_if = "Option::is_none")]
    pub event_source: Option<String>,
    #[serde(rename = "eventName", default, skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
    pub s3: StorageEntity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageEntity {
    pub bucket: BucketRef,
    pub object: ObjectRef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketRef {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectRef {
    pub key: String,
}

impl EventRecord {
    pub fn location(&self) -> ObjectLocation {
        ObjectLocation::new(&self.s3.bucket.name, &self.s3.object.key)
    }
}

impl InputEvent {
    pub fn from_locations(locations: impl IntoIterator<Item = ObjectLocation>) -> Self {
        let records = locations
            .into_iter()
            .map(|location| EventRecord {
                event_source: None,
                event_name: None,
                s3: StorageEntity {
                    bucket: BucketRef {
                        name: location.bucket,
                    },
                    object: ObjectRef { key: location.key },
                },
            })
            .collect();
        Self { records }
    }

    pub fn locations(&self) -> Vec<ObjectLocation> {
        self.records.iter().map(EventRecord::location).collect()
    }
}
