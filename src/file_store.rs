use crate::{
    memory::record_matches,
    remote::{NewRecord, RecordFilter, RecordId, RecordStore, RemoteError, StoredRecord},
};
use anyhow::Context;
use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard, PoisonError},
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct FileContents {
    next_id: u64,
    records: Vec<StoredRecord>,
}

/// Record store persisted as a single JSON document on disk. Every create and
/// delete rewrites the whole file.
#[derive(Debug)]
pub struct JsonFileRecordStore {
    path: PathBuf,
    contents: Mutex<FileContents>,
}

impl JsonFileRecordStore {
    /// Open `path`, starting empty if the file does not exist yet.
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let contents = if path.exists() {
            let text = fs::read_to_string(path).with_context(|| format!("reading {path:?}"))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {path:?}"))?
        } else {
            FileContents::default()
        };
        Ok(Self {
            path: path.to_path_buf(),
            contents: Mutex::new(contents),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> Vec<StoredRecord> {
        self.lock().records.clone()
    }

    fn lock(&self) -> MutexGuard<'_, FileContents> {
        self.contents.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self, contents: &FileContents) -> anyhow::Result<()> {
        let text = serde_json::to_string_pretty(contents).context("serializing records")?;
        fs::write(&self.path, text).with_context(|| format!("writing {:?}", self.path))?;
        Ok(())
    }
}

fn remote_error(err: anyhow::Error) -> RemoteError {
    RemoteError::new(format!("{err:#}"))
}

#[async_trait]
impl RecordStore for JsonFileRecordStore {
    async fn query(&self, filter: &RecordFilter) -> Result<Vec<StoredRecord>, RemoteError> {
        Ok(self
            .lock()
            .records
            .iter()
            .filter(|r| record_matches(r, filter))
            .cloned()
            .collect())
    }

    async fn create(&self, record: NewRecord) -> Result<RecordId, RemoteError> {
        let mut contents = self.lock();
        let mut next = contents.clone();
        next.next_id += 1;
        let id = RecordId::new(format!("rec-{}", next.next_id));
        next.records.push(StoredRecord {
            id: id.clone(),
            add_in_id: record.add_in_id,
            groups: record.groups,
            data: record.data,
        });
        self.write(&next).map_err(remote_error)?;
        *contents = next;
        debug!("created record {id} in {:?}", self.path);
        Ok(id)
    }

    async fn delete(&self, add_in_id: &str, id: &RecordId) -> Result<(), RemoteError> {
        let mut contents = self.lock();
        let mut next = contents.clone();
        next.records
            .retain(|r| !(r.id == *id && r.add_in_id == add_in_id));
        if next.records.len() == contents.records.len() {
            return Err(RemoteError::new(format!("record {id} not found")));
        }
        self.write(&next).map_err(remote_error)?;
        *contents = next;
        debug!("deleted record {id} from {:?}", self.path);
        Ok(())
    }
}
