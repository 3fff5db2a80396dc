// crates/sync-engine/src/mapper.rs
//! Identifier binding between the two identifier spaces

use crate::error::{SyncError, SyncResult};
use crate::store::ItemStore;
use tasklink_core::{AppId, MappedId};

/// Binds an externally assigned identifier onto a local item
///
/// Invoked once per item, after the external collaborator has accepted an
/// addition and returned the identifier it assigned. The item is located by
/// its `AppId`; a missing item is a hard [`SyncError::IdentityNotFound`]
/// rather than a silent no-op, because a stale or already-removed local
/// item would otherwise desynchronize the two identifier spaces. A mapped
/// id, once set, is never re-bound.
pub fn bind_id(store: &mut dyn ItemStore, app_id: &AppId, assigned: MappedId) -> SyncResult<()> {
    if assigned.is_unmapped() {
        return Err(SyncError::InvalidAssignment {
            app_id: app_id.to_string(),
        });
    }

    let item = store
        .find_by_app_id(app_id.as_str())
        .ok_or_else(|| SyncError::IdentityNotFound {
            app_id: app_id.to_string(),
        })?;

    if item.is_mapped() {
        return Err(SyncError::AlreadyBound {
            app_id: app_id.to_string(),
            mapped_id: item.mapped_id,
        });
    }

    let updated = store.set_mapped_id(app_id.as_str(), assigned)?;
    if !updated {
        return Err(SyncError::IdentityNotFound {
            app_id: app_id.to_string(),
        });
    }

    log::debug!("Bound local item {} to external id {}", app_id, assigned);
    Ok(())
}
