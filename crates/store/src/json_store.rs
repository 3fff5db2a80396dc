// crates/store/src/json_store.rs
//! JSON-file-backed item store

use crate::error::{StoreFileError, StoreFileResult};
use crate::record::{item_to_record, record_to_item, TaskRecord};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tasklink_core::{AppId, Item, MappedId};
use tasklink_sync_engine::{ItemStore, StoreError, StoreResult};
use tempfile::NamedTempFile;

/// Task store persisted as a JSON file
///
/// Items live in memory between `open` and `commit`; `commit` rewrites the
/// whole file atomically through a temporary file in the same directory,
/// so a crash never leaves a half-written store behind.
#[derive(Debug)]
pub struct JsonItemStore {
    path: PathBuf,
    items: Vec<Item>,
    next_id: u32,
}

impl JsonItemStore {
    /// Opens the store file, or starts empty when none exists
    pub fn open(path: impl Into<PathBuf>) -> StoreFileResult<Self> {
        let path = path.into();

        let contents = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("No task store at {}, starting empty", path.display());
                return Ok(Self {
                    path,
                    items: Vec::new(),
                    next_id: 1,
                });
            }
            Err(e) => {
                return Err(StoreFileError::Read {
                    path,
                    source: e,
                })
            }
        };

        let records: Vec<TaskRecord> =
            serde_json::from_str(&contents).map_err(|e| StoreFileError::Parse {
                path: path.clone(),
                source: e,
            })?;
        let items = records
            .iter()
            .map(record_to_item)
            .collect::<StoreFileResult<Vec<_>>>()?;

        let next_id = items
            .iter()
            .map(|i| i.mapped_id.as_u32())
            .max()
            .unwrap_or(0)
            + 1;

        log::debug!("Loaded {} tasks from {}", items.len(), path.display());
        Ok(Self {
            path,
            items,
            next_id,
        })
    }

    /// Returns the backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Inserts a locally authored task as-is
    ///
    /// Unlike [`ItemStore::add`], which is the acceptance path for items
    /// arriving from the other side and assigns an identifier, this stores
    /// the item untouched: a fresh task keeps the unmapped sentinel until
    /// a sync cycle binds it.
    pub fn insert(&mut self, item: Item) -> StoreResult<()> {
        if self.find_by_app_id(item.app_id.as_str()).is_some() {
            return Err(StoreError::Rejected {
                app_id: item.app_id.to_string(),
                reason: "duplicate app id".to_string(),
            });
        }
        self.next_id = self.next_id.max(item.mapped_id.as_u32() + 1);
        self.items.push(item);
        Ok(())
    }

    /// Number of tasks held
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true when the store holds no tasks
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn write_atomic(&self) -> StoreFileResult<()> {
        let records: Vec<TaskRecord> = self.items.iter().map(item_to_record).collect();
        let json = serde_json::to_string_pretty(&records)?;

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|e| StoreFileError::Write {
                path: self.path.clone(),
                source: e,
            })?;
        }

        let mut temp = NamedTempFile::new_in(dir).map_err(|e| StoreFileError::Write {
            path: self.path.clone(),
            source: e,
        })?;
        temp.write_all(json.as_bytes())
            .map_err(|e| StoreFileError::Write {
                path: self.path.clone(),
                source: e,
            })?;
        temp.flush().map_err(|e| StoreFileError::Write {
            path: self.path.clone(),
            source: e,
        })?;
        temp.persist(&self.path).map_err(|e| StoreFileError::Write {
            path: self.path.clone(),
            source: e.error,
        })?;

        log::debug!("Wrote {} tasks to {}", records.len(), self.path.display());
        Ok(())
    }
}

impl ItemStore for JsonItemStore {
    fn items(&self) -> StoreResult<Vec<Item>> {
        Ok(self.items.clone())
    }

    fn add(&mut self, item: &Item) -> StoreResult<MappedId> {
        let mut accepted = item.clone();
        if accepted.app_id.as_str().is_empty() {
            accepted.app_id = AppId::generate();
        }
        if self.find_by_app_id(accepted.app_id.as_str()).is_some() {
            return Err(StoreError::Rejected {
                app_id: accepted.app_id.to_string(),
                reason: "duplicate app id".to_string(),
            });
        }

        let assigned = MappedId::new(self.next_id);
        self.next_id += 1;
        accepted.mapped_id = assigned;
        self.items.push(accepted);

        Ok(assigned)
    }

    fn find_by_mapped_id(&self, id: MappedId) -> Option<Item> {
        self.items.iter().find(|i| i.mapped_id == id).cloned()
    }

    fn find_by_app_id(&self, app_id: &str) -> Option<Item> {
        self.items
            .iter()
            .find(|i| i.app_id.as_str() == app_id)
            .cloned()
    }

    fn overwrite(&mut self, item: &Item) -> StoreResult<bool> {
        match self
            .items
            .iter_mut()
            .find(|i| i.mapped_id == item.mapped_id)
        {
            Some(existing) => {
                let app_id = existing.app_id.clone();
                *existing = item.clone();
                existing.app_id = app_id;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn remove(&mut self, id: MappedId) -> StoreResult<bool> {
        let before = self.items.len();
        self.items.retain(|i| i.mapped_id != id);
        Ok(self.items.len() < before)
    }

    fn set_mapped_id(&mut self, app_id: &str, id: MappedId) -> StoreResult<bool> {
        match self.items.iter_mut().find(|i| i.app_id.as_str() == app_id) {
            Some(item) => {
                item.mapped_id = id;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn commit(&mut self) -> StoreResult<()> {
        self.write_atomic().map_err(|e| match e {
            StoreFileError::Write { source, .. } | StoreFileError::Read { source, .. } => {
                StoreError::Io(source)
            }
            other => StoreError::Backend(other.to_string()),
        })
    }
}
