use crate::{
    payload::EntityRef,
    remote::{EntityId, NewRecord, RecordFilter, RecordId, RecordStore, RemoteError, StoredRecord},
};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// One call received by a [`MemoryRecordStore`], in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Query(EntityId),
    Create(String),
    Delete(RecordId),
}

#[derive(Debug, Default)]
struct Inner {
    records: Vec<StoredRecord>,
    next_id: u64,
    calls: Vec<StoreCall>,
    fail_query: Option<String>,
    fail_create: Option<String>,
    fail_delete: Option<String>,
}

/// In-process record store. Keeps a log of every call and can be told to fail
/// a given operation until [`MemoryRecordStore::heal`] is called.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    inner: Mutex<Inner>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert a record as-is, bypassing the call log. Useful for seeding
    /// duplicates or unreadable payloads.
    pub fn insert_raw(&self, record: StoredRecord) {
        self.lock().records.push(record);
    }

    pub fn records(&self) -> Vec<StoredRecord> {
        self.lock().records.clone()
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    pub fn fail_query(&self, message: impl Into<String>) {
        self.lock().fail_query = Some(message.into());
    }

    pub fn fail_create(&self, message: impl Into<String>) {
        self.lock().fail_create = Some(message.into());
    }

    pub fn fail_delete(&self, message: impl Into<String>) {
        self.lock().fail_delete = Some(message.into());
    }

    pub fn heal(&self) {
        let mut inner = self.lock();
        inner.fail_query = None;
        inner.fail_create = None;
        inner.fail_delete = None;
    }
}

/// The part of a payload the device filter looks at.
#[derive(Deserialize)]
struct DeviceOnly {
    #[serde(default)]
    device: EntityRef,
}

/// Server-side `device.id = "<id>"` filter: only the device reference is read,
/// so a record with unreadable properties still matches its device.
pub(crate) fn record_matches(record: &StoredRecord, filter: &RecordFilter) -> bool {
    record.add_in_id == filter.add_in_id
        && serde_json::from_str::<DeviceOnly>(&record.data)
            .is_ok_and(|payload| payload.device.id == filter.device_id.as_str())
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn query(&self, filter: &RecordFilter) -> Result<Vec<StoredRecord>, RemoteError> {
        let mut inner = self.lock();
        inner.calls.push(StoreCall::Query(filter.device_id.clone()));
        if let Some(message) = &inner.fail_query {
            return Err(RemoteError::new(message.clone()));
        }
        Ok(inner
            .records
            .iter()
            .filter(|r| record_matches(r, filter))
            .cloned()
            .collect())
    }

    async fn create(&self, record: NewRecord) -> Result<RecordId, RemoteError> {
        let mut inner = self.lock();
        inner.calls.push(StoreCall::Create(record.data.clone()));
        if let Some(message) = &inner.fail_create {
            return Err(RemoteError::new(message.clone()));
        }
        inner.next_id += 1;
        let id = RecordId::new(format!("rec-{}", inner.next_id));
        inner.records.push(StoredRecord {
            id: id.clone(),
            add_in_id: record.add_in_id,
            groups: record.groups,
            data: record.data,
        });
        Ok(id)
    }

    async fn delete(&self, add_in_id: &str, id: &RecordId) -> Result<(), RemoteError> {
        let mut inner = self.lock();
        inner.calls.push(StoreCall::Delete(id.clone()));
        if let Some(message) = &inner.fail_delete {
            return Err(RemoteError::new(message.clone()));
        }
        let before = inner.records.len();
        inner
            .records
            .retain(|r| !(r.id == *id && r.add_in_id == add_in_id));
        if inner.records.len() == before {
            return Err(RemoteError::new(format!("record {id} not found")));
        }
        Ok(())
    }
}
