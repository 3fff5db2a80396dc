// crates/sync-engine/src/types.rs
//! Delta classification result

use serde::Serialize;
use tasklink_core::{Item, MappedId};

/// The new/modified/deleted classification produced once per cycle
///
/// Disjointness invariant: no item occurs in both `new_items` and
/// `modified_items` (the first requires an unmapped item, the second a
/// mapped one), and every id in `deleted_ids` appeared in the ledger while
/// matching no current item.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeltaResult {
    /// Items created after the cutoff that the external system has never seen
    pub new_items: Vec<Item>,
    /// Mapped items modified after the cutoff
    pub modified_items: Vec<Item>,
    /// Previously known identifiers absent from the current snapshot
    pub deleted_ids: Vec<MappedId>,
}

impl DeltaResult {
    /// Returns true when nothing changed since the cutoff
    pub fn is_empty(&self) -> bool {
        self.new_items.is_empty() && self.modified_items.is_empty() && self.deleted_ids.is_empty()
    }

    /// Total number of classified entries
    pub fn len(&self) -> usize {
        self.new_items.len() + self.modified_items.len() + self.deleted_ids.len()
    }
}
