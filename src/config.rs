use crate::{remote::GroupId, statics};
use anyhow::Context;
use serde::Deserialize;
use std::{fs, path::Path, time::Duration};

/// What to do when more than one add-in data record points at the same device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Fail the load; the device must be cleaned up before it can be edited.
    #[default]
    Reject,
    /// Log a warning and use the first record returned by the store.
    UseFirst,
}

/// Editor settings. Every field has a default, so a partial JSON file is fine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub add_in_id: String,
    pub group_id: String,
    pub error_visible_ms: u64,
    pub device_results_limit: usize,
    pub duplicate_policy: DuplicatePolicy,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            add_in_id: statics::DEFAULT_ADD_IN_ID.to_string(),
            group_id: statics::DEFAULT_GROUP_ID.to_string(),
            error_visible_ms: statics::DEFAULT_ERROR_VISIBLE_MS,
            device_results_limit: statics::DEFAULT_DEVICE_RESULTS_LIMIT,
            duplicate_policy: DuplicatePolicy::default(),
        }
    }
}

impl EditorConfig {
    pub fn load_path(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path).with_context(|| format!("reading {path:?}"))?;
        Self::from_json(&text).with_context(|| format!("parsing {path:?}"))
    }

    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn error_visible_for(&self) -> Duration {
        Duration::from_millis(self.error_visible_ms)
    }

    pub fn group(&self) -> GroupId {
        GroupId::new(self.group_id.clone())
    }
}
