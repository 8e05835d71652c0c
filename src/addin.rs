use crate::{
    config::EditorConfig,
    error::PropertyError,
    host::{Device, DeviceDirectory, DeviceQuery, HostState},
    remote::RecordStore,
    session::EditSession,
    statics,
    store::PropertyStore,
};
use chrono::Utc;
use log::info;

/// Host lifecycle glue: owns the edit session and the device list shown in
/// the selector.
#[derive(Debug)]
pub struct AddIn<S, D> {
    session: EditSession<S>,
    directory: D,
    devices: Vec<Device>,
    results_limit: usize,
}

impl<S: RecordStore, D: DeviceDirectory> AddIn<S, D> {
    /// Called once when the host first loads the add-in.
    pub fn initialize(remote: S, directory: D, config: &EditorConfig) -> Self {
        let store = PropertyStore::new(remote, config);
        info!("add-in {} initialized", config.add_in_id);
        Self {
            session: EditSession::new(store, config.error_visible_for()),
            directory,
            devices: Vec::new(),
            results_limit: config.device_results_limit,
        }
    }

    /// Called every time the add-in gains focus or the host's group filter
    /// changes: refresh the list of currently active devices and restore the
    /// remembered selection.
    pub async fn focus<H: HostState + ?Sized>(&mut self, host: &mut H) {
        let query = DeviceQuery {
            groups: host.group_filter(),
            results_limit: self.results_limit,
            active_at: Utc::now(),
        };
        let mut devices = match self.directory.list_devices(&query).await {
            Ok(devices) => devices,
            Err(err) => {
                self.session
                    .raise(statics::EN_ERR_DEVICES, PropertyError::DirectoryListing(err));
                return;
            }
        };
        devices.sort_by(|a, b| a.name.cmp(&b.name));
        self.devices = devices;

        let remembered = host.page_state().device;
        self.session.select(remembered, host).await;
    }

    /// Called when the user navigates away. Every edit is already persisted.
    pub fn blur(&mut self) {}

    pub fn directory(&self) -> &D {
        &self.directory
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn session(&self) -> &EditSession<S> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut EditSession<S> {
        &mut self.session
    }
}
