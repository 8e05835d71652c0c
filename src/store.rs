use crate::{
    config::{DuplicatePolicy, EditorConfig},
    error::{PropertyError, WriteStage},
    payload::PropertySet,
    remote::{EntityId, GroupId, NewRecord, RecordFilter, RecordId, RecordStore},
    row::{Row, properties_from_rows, rows_from_properties},
};
use log::{debug, warn};

/// Result of [`PropertyStore::load`]: the record backing the rows (if any) and
/// the editable rows, always ending with one placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loaded {
    pub record_id: Option<RecordId>,
    pub rows: Vec<Row>,
}

/// Translates between one remote add-in data record per device and an
/// editable row list.
#[derive(Debug, Clone)]
pub struct PropertyStore<S> {
    remote: S,
    add_in_id: String,
    group: GroupId,
    duplicate_policy: DuplicatePolicy,
}

impl<S: RecordStore> PropertyStore<S> {
    pub fn new(remote: S, config: &EditorConfig) -> Self {
        Self {
            remote,
            add_in_id: config.add_in_id.clone(),
            group: config.group(),
            duplicate_policy: config.duplicate_policy,
        }
    }

    pub fn remote(&self) -> &S {
        &self.remote
    }

    pub async fn load(&self, parent: &EntityId) -> Result<Loaded, PropertyError> {
        let filter = RecordFilter {
            add_in_id: self.add_in_id.clone(),
            device_id: parent.clone(),
        };
        let mut records = self
            .remote
            .query(&filter)
            .await
            .map_err(PropertyError::RemoteQuery)?;

        if records.len() > 1 {
            match self.duplicate_policy {
                DuplicatePolicy::Reject => {
                    return Err(PropertyError::DuplicateRecords {
                        parent: parent.clone(),
                        count: records.len(),
                    });
                }
                DuplicatePolicy::UseFirst => {
                    warn!(
                        "device {parent} has {} property records, using {}",
                        records.len(),
                        records[0].id
                    );
                }
            }
        }

        if records.is_empty() {
            debug!("device {parent} has no property record");
            return Ok(Loaded {
                record_id: None,
                rows: rows_from_properties(&Default::default()),
            });
        }

        let record = records.swap_remove(0);
        let set = PropertySet::parse(&record.data).map_err(|source| PropertyError::Decode {
            record_id: record.id.clone(),
            source,
        })?;
        debug!(
            "loaded {} properties for device {parent} from record {}",
            set.properties.len(),
            record.id
        );
        Ok(Loaded {
            record_id: Some(record.id),
            rows: rows_from_properties(&set.properties),
        })
    }

    /// Persist `rows` as the device's only property record.
    ///
    /// The record format has no partial update, so the previous record is
    /// deleted first and a new one created. A failed delete aborts before the
    /// create. A failed create after a successful delete leaves the device with
    /// no record at all; nothing is rolled back.
    pub async fn replace(
        &self,
        parent: &EntityId,
        old_record_id: Option<&RecordId>,
        rows: &[Row],
    ) -> Result<RecordId, PropertyError> {
        let set = PropertySet::new(parent, properties_from_rows(rows));
        let data = set.to_json().map_err(PropertyError::Encode)?;

        if let Some(old) = old_record_id {
            self.remote
                .delete(&self.add_in_id, old)
                .await
                .map_err(|source| PropertyError::RemoteWrite {
                    stage: WriteStage::Delete,
                    previous_removed: false,
                    source,
                })?;
            debug!("deleted property record {old} of device {parent}");
        }

        let record = NewRecord {
            add_in_id: self.add_in_id.clone(),
            groups: vec![self.group.clone()],
            data,
        };
        let id = self
            .remote
            .create(record)
            .await
            .map_err(|source| PropertyError::RemoteWrite {
                stage: WriteStage::Create,
                previous_removed: old_record_id.is_some(),
                source,
            })?;
        debug!(
            "saved {} properties for device {parent} as record {id}",
            set.properties.len()
        );
        Ok(id)
    }
}
