//! Contract of the remote record store the property editor persists through.
//! Records are generic "add-in data" entries: an opaque JSON string tagged with
//! the add-in's identity and a visibility scope.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Identity of a parent entity (a device).
    EntityId
);
string_id!(
    /// Identifier assigned by the remote store when a record is created.
    RecordId
);
string_id!(GroupId);

/// Failure reported by a remote collaborator. The payload is whatever the
/// remote side said; it is shown to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct RemoteError {
    pub message: String,
}

impl RemoteError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Search for the add-in data records of one device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFilter {
    pub add_in_id: String,
    pub device_id: EntityId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: RecordId,
    pub add_in_id: String,
    pub groups: Vec<GroupId>,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    pub add_in_id: String,
    pub groups: Vec<GroupId>,
    pub data: String,
}

/// Generic create/read/delete over add-in data records. There is no update
/// primitive: replacing a payload means deleting the old record and creating
/// a new one.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn query(&self, filter: &RecordFilter) -> Result<Vec<StoredRecord>, RemoteError>;

    async fn create(&self, record: NewRecord) -> Result<RecordId, RemoteError>;

    async fn delete(&self, add_in_id: &str, id: &RecordId) -> Result<(), RemoteError>;
}

#[async_trait]
impl<S: RecordStore + ?Sized> RecordStore for std::sync::Arc<S> {
    async fn query(&self, filter: &RecordFilter) -> Result<Vec<StoredRecord>, RemoteError> {
        (**self).query(filter).await
    }

    async fn create(&self, record: NewRecord) -> Result<RecordId, RemoteError> {
        (**self).create(record).await
    }

    async fn delete(&self, add_in_id: &str, id: &RecordId) -> Result<(), RemoteError> {
        (**self).delete(add_in_id, id).await
    }
}
