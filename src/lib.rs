//! Core library for devprops, a per-device custom property editor.
//! Keeps an editable key/value row list in sync with a single add-in data
//! record per device on a remote record store that only supports whole-record
//! create and delete.

mod addin;
mod banner;
mod config;
mod error;
mod file_store;
pub mod host;
mod memory;
mod payload;
pub mod remote;
mod row;
mod session;
pub mod statics;
mod store;

pub use addin::AddIn;
pub use banner::ErrorBanner;
pub use config::{DuplicatePolicy, EditorConfig};
pub use error::{PropertyError, WriteStage};
pub use file_store::JsonFileRecordStore;
pub use memory::{MemoryRecordStore, StoreCall};
pub use payload::{EntityRef, PropertySet};
pub use remote::{EntityId, RecordId, RecordStore, RemoteError};
pub use row::{Row, properties_from_rows, rows_from_properties};
pub use session::{EditSession, Phase, SessionSnapshot};
pub use store::{Loaded, PropertyStore};
