//! Storage layer for the assistant
//!
//! Each collection lives in its own JSON file inside the data directory and
//! is owned by one [`RecordStore`]. [`Storage`] opens all four.

pub mod file_io;
pub mod record_store;

pub use file_io::{read_json, write_json_atomic};
pub use record_store::{load_collection, save_collection, RecordStore};

use crate::audit::AuditLogger;
use crate::config::{AssistantPaths, Settings};
use crate::error::AssistantResult;
use crate::models::EntityKind;

/// Main storage coordinator that provides access to every collection
#[derive(Debug)]
pub struct Storage {
    paths: AssistantPaths,
    pub notes: RecordStore,
    pub tasks: RecordStore,
    pub contacts: RecordStore,
    pub finance: RecordStore,
}

impl Storage {
    /// Open every collection, creating directories as needed
    ///
    /// A collection file that exists but cannot be parsed fails the whole open.
    pub fn open(paths: AssistantPaths, settings: &Settings) -> AssistantResult<Self> {
        paths.ensure_directories()?;

        let audit = settings
            .audit_enabled
            .then(|| AuditLogger::new(paths.audit_log()));
        let delimiter = settings.csv_delimiter_byte()?;

        let open = |kind: EntityKind| -> AssistantResult<RecordStore> {
            let store = RecordStore::open(kind.name(), paths.collection_file(kind))?
                .with_csv_delimiter(delimiter);
            Ok(match &audit {
                Some(logger) => store.with_audit(logger.clone()),
                None => store,
            })
        };

        Ok(Self {
            notes: open(EntityKind::Notes)?,
            tasks: open(EntityKind::Tasks)?,
            contacts: open(EntityKind::Contacts)?,
            finance: open(EntityKind::Finance)?,
            paths,
        })
    }

    pub fn paths(&self) -> &AssistantPaths {
        &self.paths
    }

    pub fn store(&self, kind: EntityKind) -> &RecordStore {
        match kind {
            EntityKind::Notes => &self.notes,
            EntityKind::Tasks => &self.tasks,
            EntityKind::Contacts => &self.contacts,
            EntityKind::Finance => &self.finance,
        }
    }

    pub fn store_mut(&mut self, kind: EntityKind) -> &mut RecordStore {
        match kind {
            EntityKind::Notes => &mut self.notes,
            EntityKind::Tasks => &mut self.tasks,
            EntityKind::Contacts => &mut self.contacts,
            EntityKind::Finance => &mut self.finance,
        }
    }
}
