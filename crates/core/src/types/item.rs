// crates/core/src/types/item.rs
//! Task item and its two identifier spaces

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier assigned by the local store
///
/// An `AppId` is unique per item and survives across cycles; before an item
/// has been accepted by the external system it is the only identity the item
/// has.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppId(String);

impl AppId {
    /// Creates an AppId from an existing identifier string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh random AppId
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AppId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier assigned by the external system once an item is accepted there
///
/// The raw value `0` is the [`MappedId::UNMAPPED`] sentinel: it exactly
/// characterizes "never pushed to / acknowledged by the external system".
/// Once bound to a non-zero value the mapping is immutable.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct MappedId(u32);

impl MappedId {
    /// Sentinel for "not yet known to the external system"
    pub const UNMAPPED: Self = Self(0);

    /// Creates a mapped id from its raw value
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier value
    pub fn as_u32(&self) -> u32 {
        self.0
    }

    /// Returns true if this is the unmapped sentinel
    pub fn is_unmapped(&self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for MappedId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One unit of task data
///
/// `created_at` and `modified_at` drive the new/modified classification
/// against the last-sync cutoff; the remaining fields are payload the sync
/// core carries but never inspects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub app_id: AppId,
    pub mapped_id: MappedId,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub summary: String,
    pub notes: String,
    pub category: String,
    pub priority: u8,
    pub completed: bool,
    pub start_date: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub completed_date: Option<DateTime<Utc>>,
}

impl Item {
    /// Creates an unmapped item stamped with the current time
    pub fn new(app_id: AppId, summary: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            app_id,
            mapped_id: MappedId::UNMAPPED,
            created_at: now,
            modified_at: now,
            summary: summary.into(),
            notes: String::new(),
            category: String::new(),
            priority: 3,
            completed: false,
            start_date: None,
            due_date: None,
            completed_date: None,
        }
    }

    /// Returns true once the external system has acknowledged this item
    pub fn is_mapped(&self) -> bool {
        !self.mapped_id.is_unmapped()
    }

    /// Updates the modification timestamp to now
    pub fn touch(&mut self) {
        self.modified_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_id_generate_unique() {
        let a = AppId::generate();
        let b = AppId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_app_id_from_string() {
        let id = AppId::new("task-17");
        assert_eq!(id.as_str(), "task-17");
        assert_eq!(id.to_string(), "task-17");
    }

    #[test]
    fn test_mapped_id_sentinel() {
        assert!(MappedId::UNMAPPED.is_unmapped());
        assert!(MappedId::default().is_unmapped());
        assert!(!MappedId::new(42).is_unmapped());
        assert_eq!(MappedId::new(42).as_u32(), 42);
    }

    #[test]
    fn test_new_item_is_unmapped() {
        let item = Item::new(AppId::generate(), "buy milk");
        assert!(!item.is_mapped());
        assert_eq!(item.created_at, item.modified_at);
        assert!(item.start_date.is_none());
    }

    #[test]
    fn test_touch_advances_modified() {
        let mut item = Item::new(AppId::generate(), "water plants");
        let before = item.modified_at;
        std::thread::sleep(std::time::Duration::from_millis(5));
        item.touch();
        assert!(item.modified_at > before);
        assert!(item.created_at < item.modified_at);
    }

    #[test]
    fn test_item_serde_roundtrip() {
        let mut item = Item::new(AppId::new("task-1"), "file taxes");
        item.mapped_id = MappedId::new(7);
        item.due_date = Some(Utc::now());

        let json = serde_json::to_string(&item).unwrap();
        let back: Item = serde_json::from_str(&json).unwrap();
        assert_eq!(item, back);
    }
}
