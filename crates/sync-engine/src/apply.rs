// crates/sync-engine/src/apply.rs
//! Apply layer: pushing a computed delta into a store
//!
//! One policy for all three operations: a hard store failure aborts the
//! remainder of that batch and reports which item failed; a missing target
//! (only possible for modify and delete) is skipped, counted, and logged.
//! Side effects already applied are never rolled back.

use crate::error::{SyncError, SyncResult};
use crate::store::ItemStore;
use serde::Serialize;
use tasklink_core::{AppId, Item, MappedId};

/// Outcome counts for a modify or delete batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ApplyStats {
    /// Entries applied to the store
    pub applied: usize,
    /// Entries whose target was not present in the store
    pub skipped: usize,
}

/// Outcome of an add batch
///
/// Additions are the one operation whose partial successes carry an
/// obligation: every accepted item has been assigned an identifier that
/// must still be bound locally, even when a later item aborted the batch.
/// The report therefore carries both.
#[derive(Debug, Default)]
pub struct AddReport {
    /// Identifier the store assigned for each accepted item, in order
    pub accepted: Vec<(AppId, MappedId)>,
    /// The failure that aborted the batch, if any
    pub failure: Option<SyncError>,
}

/// Pushes new items into the store in sequence
///
/// The batch aborts on the first failure and the report names which item
/// failed; items accepted before that point stay accepted and their
/// assigned identifiers are returned so the caller can bind them.
pub fn add_items(store: &mut dyn ItemStore, items: &[Item]) -> AddReport {
    let mut report = AddReport::default();

    for item in items {
        match store.add(item) {
            Ok(assigned) => {
                log::debug!("Added item {} as external id {}", item.app_id, assigned);
                report.accepted.push((item.app_id.clone(), assigned));
            }
            Err(e) => {
                report.failure = Some(SyncError::Apply {
                    operation: "add",
                    item: item.app_id.to_string(),
                    source: e,
                });
                break;
            }
        }
    }

    report
}

/// Overwrites the store counterpart of each modified item
///
/// Counterparts are located by mapped id; an item with no counterpart is
/// counted as skipped and the batch continues.
pub fn modify_items(store: &mut dyn ItemStore, items: &[Item]) -> SyncResult<ApplyStats> {
    let mut stats = ApplyStats::default();

    for item in items {
        let found = store.overwrite(item).map_err(|e| SyncError::Apply {
            operation: "modify",
            item: item.app_id.to_string(),
            source: e,
        })?;
        if found {
            stats.applied += 1;
        } else {
            log::warn!(
                "No counterpart with external id {} for item {}; modification skipped",
                item.mapped_id,
                item.app_id
            );
            stats.skipped += 1;
        }
    }

    Ok(stats)
}

/// Removes every store record whose mapped id is listed
///
/// Unmatched identifiers are counted as skipped and the batch continues.
pub fn delete_items(store: &mut dyn ItemStore, ids: &[MappedId]) -> SyncResult<ApplyStats> {
    let mut stats = ApplyStats::default();

    for id in ids {
        let found = store.remove(*id).map_err(|e| SyncError::Apply {
            operation: "delete",
            item: id.to_string(),
            source: e,
        })?;
        if found {
            stats.applied += 1;
        } else {
            log::warn!("No record with external id {} to delete; skipped", id);
            stats.skipped += 1;
        }
    }

    Ok(stats)
}
