use crate::remote::{EntityId, RecordId, RemoteError};
use std::fmt;

/// Which half of the delete-then-create replacement failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStage {
    Delete,
    Create,
}

impl fmt::Display for WriteStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteStage::Delete => f.write_str("deleting the previous record"),
            WriteStage::Create => f.write_str("creating the replacement record"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PropertyError {
    #[error("querying properties failed: {0}")]
    RemoteQuery(#[source] RemoteError),

    #[error("{stage} failed: {source}")]
    RemoteWrite {
        stage: WriteStage,
        /// Whether the previous record is already gone when this error is returned.
        previous_removed: bool,
        #[source]
        source: RemoteError,
    },

    #[error("record {record_id} holds an unreadable payload: {source}")]
    Decode {
        record_id: RecordId,
        #[source]
        source: serde_json::Error,
    },

    #[error("encoding properties failed: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("device {parent} has {count} property records, expected at most one")]
    DuplicateRecords { parent: EntityId, count: usize },

    #[error("listing devices failed: {0}")]
    DirectoryListing(#[source] RemoteError),
}

impl PropertyError {
    /// True when the failed operation left the previous record deleted, so it
    /// must no longer be referenced.
    pub fn previous_record_removed(&self) -> bool {
        matches!(
            self,
            PropertyError::RemoteWrite {
                previous_removed: true,
                ..
            }
        )
    }
}
