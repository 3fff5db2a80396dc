// crates/sync-engine/src/delta.rs
//! New/modified/deleted classification

use crate::types::DeltaResult;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tasklink_core::{Item, MappedId};

/// Classifies a snapshot of items against the last-sync cutoff and the
/// ledger of previously known identifiers.
///
/// A pure function of its three inputs; nothing is cached between calls
/// and the ledger set is never mutated. Classification per item:
///
/// - unmapped and created after the cutoff → new
/// - mapped and modified after the cutoff → modified
/// - otherwise unchanged (in neither list)
///
/// The two conditions are mutually exclusive by construction, so no item
/// lands in both lists. Every ledger id matching no current item's mapped
/// id is reported deleted; this is the reconstruction of delete events the
/// external store cannot report natively.
pub fn compute_delta(
    items: &[Item],
    last_sync: DateTime<Utc>,
    ledger_ids: &HashSet<MappedId>,
) -> DeltaResult {
    let mut delta = DeltaResult::default();
    let mut current_ids: HashSet<MappedId> = HashSet::new();

    for item in items {
        if item.is_mapped() {
            current_ids.insert(item.mapped_id);
            if item.modified_at > last_sync {
                delta.modified_items.push(item.clone());
            }
        } else if item.created_at > last_sync {
            delta.new_items.push(item.clone());
        }
    }

    delta.deleted_ids = ledger_ids
        .iter()
        .filter(|id| !current_ids.contains(id))
        .copied()
        .collect();
    // Set iteration order is arbitrary; keep the output deterministic.
    delta.deleted_ids.sort_unstable();

    delta
}
