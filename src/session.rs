use crate::{
    banner::ErrorBanner,
    error::PropertyError,
    host::{HostState, PageState},
    remote::{EntityId, RecordId, RecordStore},
    row::{Row, properties_from_rows, rows_from_properties},
    statics,
    store::PropertyStore,
};
use log::{debug, error, warn};
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Unselected,
    Loading,
    Ready,
    Error,
}

/// Owned copy of the session state for a UI layer to render from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub selected: Option<EntityId>,
    pub record_id: Option<RecordId>,
    pub rows: Vec<Row>,
    pub phase: Phase,
    pub error: Option<String>,
}

/// Editable property rows of the selected device, kept in sync with the
/// remote store. Failures never escape: they are logged and shown on the
/// error banner.
#[derive(Debug)]
pub struct EditSession<S> {
    store: PropertyStore<S>,
    selected: Option<EntityId>,
    record_id: Option<RecordId>,
    rows: Vec<Row>,
    phase: Phase,
    banner: ErrorBanner,
}

impl<S: RecordStore> EditSession<S> {
    pub fn new(store: PropertyStore<S>, error_visible_for: Duration) -> Self {
        Self {
            store,
            selected: None,
            record_id: None,
            rows: Vec::new(),
            phase: Phase::Unselected,
            banner: ErrorBanner::new(error_visible_for),
        }
    }

    pub fn store(&self) -> &PropertyStore<S> {
        &self.store
    }

    pub fn selected(&self) -> Option<&EntityId> {
        self.selected.as_ref()
    }

    pub fn record_id(&self) -> Option<&RecordId> {
        self.record_id.as_ref()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn banner(&self) -> &ErrorBanner {
        &self.banner
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            selected: self.selected.clone(),
            record_id: self.record_id.clone(),
            rows: self.rows.clone(),
            phase: self.phase,
            error: self.banner.visible_message().map(str::to_string),
        }
    }

    /// Edit a row's key in place. Nothing is persisted until one of the row
    /// operations runs.
    pub fn set_key(&mut self, index: usize, key: impl Into<String>) -> bool {
        match self.rows.get_mut(index) {
            Some(row) => {
                row.key = key.into();
                true
            }
            None => false,
        }
    }

    pub fn set_value(&mut self, index: usize, value: impl Into<String>) -> bool {
        match self.rows.get_mut(index) {
            Some(row) => {
                row.value = value.into();
                true
            }
            None => false,
        }
    }

    /// Switch to another device. Selecting the current device, nothing, or an
    /// empty id is a no-op.
    pub async fn select<H: HostState + ?Sized>(&mut self, parent: Option<EntityId>, host: &mut H) {
        let Some(parent) = parent.filter(|p| !p.as_str().is_empty()) else {
            return;
        };
        if self.selected.as_ref() == Some(&parent) {
            return;
        }

        host.set_page_state(PageState {
            device: Some(parent.clone()),
        });

        self.selected = Some(parent.clone());
        self.record_id = None;
        self.rows.clear();
        self.phase = Phase::Loading;

        match self.store.load(&parent).await {
            Ok(loaded) => {
                self.record_id = loaded.record_id;
                self.rows = loaded.rows;
                self.phase = Phase::Ready;
            }
            Err(err) => self.fail(statics::EN_ERR_LOAD, err),
        }
    }

    /// Drop a row and save the rest. The trailing placeholder cannot be removed;
    /// a saved row whose key was cleared still can.
    pub async fn remove_row(&mut self, index: usize) {
        if !self.check_index(index) {
            return;
        }
        if index == self.rows.len() - 1 && self.rows[index].is_placeholder() {
            warn!("refusing to remove the placeholder row");
            return;
        }
        let row = self.rows.remove(index);
        debug!("removing property {:?}", row.key);
        self.persist().await;
    }

    /// Save a changed value of an already persisted row.
    pub async fn edit_row(&mut self, index: usize) {
        if !self.check_index(index) {
            return;
        }
        let row = &self.rows[index];
        if !row.is_saved || row.is_placeholder() {
            return;
        }
        self.persist().await;
    }

    /// Save after a row was added or changed, then normalize the list so every
    /// row is saved and a single placeholder trails it.
    pub async fn add_or_edit_row(&mut self, index: usize) {
        if !self.check_index(index) || self.rows[index].is_placeholder() {
            return;
        }
        if self.persist().await {
            self.rows = rows_from_properties(&properties_from_rows(&self.rows));
        }
    }

    fn check_index(&self, index: usize) -> bool {
        if self.selected.is_none() {
            debug!("ignoring row operation without a selected device");
            return false;
        }
        if index >= self.rows.len() {
            warn!("row index {index} out of range ({} rows)", self.rows.len());
            return false;
        }
        true
    }

    async fn persist(&mut self) -> bool {
        let Some(parent) = self.selected.clone() else {
            return false;
        };
        match self
            .store
            .replace(&parent, self.record_id.as_ref(), &self.rows)
            .await
        {
            Ok(id) => {
                self.record_id = Some(id);
                self.phase = Phase::Ready;
                true
            }
            Err(err) => {
                if err.previous_record_removed() {
                    self.record_id = None;
                }
                self.fail(statics::EN_ERR_SAVE, err);
                false
            }
        }
    }

    pub(crate) fn fail(&mut self, context: &str, err: PropertyError) {
        error!("{context}: {err}");
        self.phase = Phase::Error;
        self.banner.raise(format!("{context}: {err}"));
    }

    /// Surface a failure that happened outside the session's own operations.
    pub(crate) fn raise(&mut self, context: &str, err: PropertyError) {
        error!("{context}: {err}");
        self.banner.raise(format!("{context}: {err}"));
    }
}
