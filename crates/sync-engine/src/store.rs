// crates/sync-engine/src/store.rs
//! Item store contract and in-memory reference implementation

use tasklink_core::{Item, MappedId};
use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors a store collaborator can report
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying I/O failure
    #[error("Store I/O failure: {0}")]
    Io(#[from] std::io::Error),

    /// The store refused to accept an item
    #[error("Store rejected item {app_id}: {reason}")]
    Rejected { app_id: String, reason: String },

    /// Backend-specific failure
    #[error("{0}")]
    Backend(String),
}

/// Contract every item store collaborator satisfies
///
/// The sync core snapshots items through `items`, pushes changes through
/// `add`/`overwrite`/`remove`, and binds externally assigned identifiers
/// through `set_mapped_id`. Durability is the collaborator's concern:
/// `commit` persists whatever the backend persists.
pub trait ItemStore {
    /// Enumerates every item currently in the store
    fn items(&self) -> StoreResult<Vec<Item>>;

    /// Accepts a new item and returns the identifier this store assigned
    fn add(&mut self, item: &Item) -> StoreResult<MappedId>;

    /// Looks up an item by its external identifier
    fn find_by_mapped_id(&self, id: MappedId) -> Option<Item>;

    /// Looks up an item by its local identifier
    fn find_by_app_id(&self, app_id: &str) -> Option<Item>;

    /// Replaces the item whose mapped id matches; false when absent
    fn overwrite(&mut self, item: &Item) -> StoreResult<bool>;

    /// Removes the item with the given mapped id; false when absent
    fn remove(&mut self, id: MappedId) -> StoreResult<bool>;

    /// Sets the mapped id on the item with the given app id; false when absent
    fn set_mapped_id(&mut self, app_id: &str, id: MappedId) -> StoreResult<bool>;

    /// Persists the store's current contents
    fn commit(&mut self) -> StoreResult<()>;
}

/// In-memory store assigning sequential non-zero identifiers
///
/// The reference collaborator: used throughout the test suites and usable
/// as a scratch store. Accepted items are acknowledged with ids counting up
/// from a configurable starting point.
#[derive(Debug)]
pub struct MemoryStore {
    items: Vec<Item>,
    next_id: u32,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Creates an empty store assigning ids from 1
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Creates an empty store whose first accepted item gets `first_id`
    pub fn starting_at(first_id: u32) -> Self {
        Self {
            items: Vec::new(),
            next_id: first_id.max(1),
        }
    }

    /// Creates a store preloaded with items, continuing ids after the
    /// highest mapped id present
    pub fn with_items(items: Vec<Item>) -> Self {
        let next_id = items
            .iter()
            .map(|i| i.mapped_id.as_u32())
            .max()
            .unwrap_or(0)
            + 1;
        Self { items, next_id }
    }

    /// Number of items held
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true when the store holds no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl ItemStore for MemoryStore {
    fn items(&self) -> StoreResult<Vec<Item>> {
        Ok(self.items.clone())
    }

    fn add(&mut self, item: &Item) -> StoreResult<MappedId> {
        if self.find_by_app_id(item.app_id.as_str()).is_some() {
            return Err(StoreError::Rejected {
                app_id: item.app_id.to_string(),
                reason: "duplicate app id".to_string(),
            });
        }

        let assigned = MappedId::new(self.next_id);
        self.next_id += 1;

        let mut accepted = item.clone();
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
                // The counterpart keeps its own local identity.
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
        Ok(())
    }
}
