//! Collaborators supplied by the host application: page state, group scope and
//! the device directory that feeds the selector.

use crate::remote::{EntityId, GroupId, RemoteError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, PoisonError};

/// Navigable page state the host keeps across reloads.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<EntityId>,
}

pub trait HostState {
    fn group_filter(&self) -> Vec<GroupId>;

    fn page_state(&self) -> PageState;

    fn set_page_state(&mut self, state: PageState);
}

/// Host stand-in that keeps everything in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    pub groups: Vec<GroupId>,
    pub state: PageState,
    /// Every state written through [`HostState::set_page_state`].
    pub history: Vec<PageState>,
}

impl HostState for MemoryHost {
    fn group_filter(&self) -> Vec<GroupId> {
        self.groups.clone()
    }

    fn page_state(&self) -> PageState {
        self.state.clone()
    }

    fn set_page_state(&mut self, state: PageState) {
        self.history.push(state.clone());
        self.state = state;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: EntityId,
    pub name: String,
    /// End of the device's active period; `None` while it is in service.
    #[serde(default)]
    pub active_to: Option<DateTime<Utc>>,
}

impl Device {
    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        self.active_to.is_none_or(|to| to > at)
    }
}

/// Devices in any of `groups` that are still active at `active_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceQuery {
    pub groups: Vec<GroupId>,
    pub results_limit: usize,
    pub active_at: DateTime<Utc>,
}

#[async_trait]
pub trait DeviceDirectory: Send + Sync {
    async fn list_devices(&self, query: &DeviceQuery) -> Result<Vec<Device>, RemoteError>;
}

/// Fixed device list; optionally fails every listing.
#[derive(Debug, Default)]
pub struct StaticDeviceDirectory {
    devices: Vec<Device>,
    failure: Mutex<Option<String>>,
    queries: Mutex<Vec<DeviceQuery>>,
}

impl StaticDeviceDirectory {
    pub fn new(devices: Vec<Device>) -> Self {
        Self {
            devices,
            ..Self::default()
        }
    }

    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.lock().unwrap_or_else(PoisonError::into_inner) = Some(message.into());
    }

    pub fn queries(&self) -> Vec<DeviceQuery> {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl DeviceDirectory for StaticDeviceDirectory {
    async fn list_devices(&self, query: &DeviceQuery) -> Result<Vec<Device>, RemoteError> {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(query.clone());
        if let Some(message) = self.failure.lock().unwrap_or_else(PoisonError::into_inner).clone() {
            return Err(RemoteError::new(message));
        }
        Ok(self
            .devices
            .iter()
            .filter(|d| d.is_active_at(query.active_at))
            .take(query.results_limit)
            .cloned()
            .collect())
    }
}
