// crates/sync-engine/src/engine.rs
//! Cycle orchestration
//!
//! One cycle is a single linear sequence with no rollback: load ledger →
//! snapshot → compute delta → apply additions/modifications/deletions →
//! bind returned identifiers → save ledger. An apply failure abandons the
//! remaining apply work but the ledger is still rewritten from whatever
//! mapped-id state exists at that point, and nothing already pushed is
//! undone. Fully synchronous; exclusive access to both stores is assumed
//! for the duration of the cycle.

use crate::apply::{self, ApplyStats};
use crate::delta::compute_delta;
use crate::error::{SyncError, SyncResult};
use crate::ledger::{LedgerStatus, SyncLedger};
use crate::mapper;
use crate::store::ItemStore;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use tasklink_core::{AppId, MappedId};

/// Configuration for the sync engine
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Where the identifier ledger lives
    pub ledger_path: PathBuf,
}

/// What one cycle did
#[derive(Debug)]
pub struct CycleReport {
    /// Items classified as new
    pub new_items: usize,
    /// Items classified as modified
    pub modified_items: usize,
    /// Identifiers classified as deleted
    pub deleted_ids: usize,
    /// Identifier bindings established this cycle
    pub bound: Vec<(AppId, MappedId)>,
    /// Modify-batch outcome
    pub modifications: ApplyStats,
    /// Delete-batch outcome
    pub deletions: ApplyStats,
    /// How the ledger load went
    pub ledger_status: LedgerStatus,
    /// Number of identifiers written back to the ledger
    pub ledger_saved: usize,
    /// The failure that abandoned the apply phase, if any
    pub apply_failure: Option<SyncError>,
}

impl CycleReport {
    /// Returns true when every apply batch ran to completion
    pub fn is_clean(&self) -> bool {
        self.apply_failure.is_none()
    }
}

impl fmt::Display for CycleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} new, {} modified ({} applied, {} skipped), {} deleted ({} applied, {} skipped), ledger {} ids",
            self.new_items,
            self.modified_items,
            self.modifications.applied,
            self.modifications.skipped,
            self.deleted_ids,
            self.deletions.applied,
            self.deletions.skipped,
            self.ledger_saved,
        )?;
        if let Some(failure) = &self.apply_failure {
            write!(f, "; aborted: {failure}")?;
        }
        Ok(())
    }
}

/// Runs complete reconciliation cycles between a local collection and an
/// external store
pub struct SyncEngine {
    config: SyncConfig,
}

impl SyncEngine {
    /// Creates a new sync engine
    pub fn new(config: SyncConfig) -> Self {
        Self { config }
    }

    /// Executes one reconciliation cycle
    ///
    /// Items in `local` created or modified after `last_sync` are pushed to
    /// `external`; identifiers present in the ledger but absent from the
    /// local snapshot are deleted from `external`. Identifiers `external`
    /// assigns for additions are bound back onto the local items, and the
    /// ledger is rewritten unconditionally at cycle end.
    ///
    /// Returns `Err` only for failures that stop the cycle outright: an
    /// unreadable local snapshot, a ledger that cannot be written, or a
    /// commit failure. Apply failures are carried in the report instead,
    /// because the cycle still completes its bookkeeping after them.
    pub fn run_cycle(
        &self,
        local: &mut dyn ItemStore,
        external: &mut dyn ItemStore,
        last_sync: DateTime<Utc>,
    ) -> SyncResult<CycleReport> {
        let ledger = SyncLedger::new(&self.config.ledger_path);
        let restored = ledger.load();

        let snapshot = local.items()?;
        log::info!(
            "Cycle start: {} local items, {} ledger ids, cutoff {}",
            snapshot.len(),
            restored.ids.len(),
            last_sync
        );

        let delta = compute_delta(&snapshot, last_sync, &restored.ids);

        // Bind every identifier the external store assigned, even when the
        // add batch aborted partway: those side effects exist and must be
        // reflected locally and in the ledger.
        let add_report = apply::add_items(external, &delta.new_items);
        let mut apply_failure = add_report.failure;
        let mut bound = Vec::new();
        for (app_id, assigned) in add_report.accepted {
            match mapper::bind_id(local, &app_id, assigned) {
                Ok(()) => bound.push((app_id, assigned)),
                Err(e) => {
                    if apply_failure.is_none() {
                        apply_failure = Some(e);
                    }
                    break;
                }
            }
        }

        let mut modifications = ApplyStats::default();
        if apply_failure.is_none() {
            match apply::modify_items(external, &delta.modified_items) {
                Ok(stats) => modifications = stats,
                Err(e) => apply_failure = Some(e),
            }
        }

        let mut deletions = ApplyStats::default();
        if apply_failure.is_none() {
            match apply::delete_items(external, &delta.deleted_ids) {
                Ok(stats) => deletions = stats,
                Err(e) => apply_failure = Some(e),
            }
        }

        if let Some(failure) = &apply_failure {
            log::warn!("Apply phase abandoned: {failure}");
        }

        // The current mapped-id set: everything the snapshot already knew
        // plus the bindings established this cycle. Deleted ids are absent
        // from the snapshot by definition, so nothing needs removing.
        let mut current: HashSet<MappedId> = snapshot
            .iter()
            .filter(|i| i.is_mapped())
            .map(|i| i.mapped_id)
            .collect();
        current.extend(bound.iter().map(|(_, id)| *id));

        // Rewritten unconditionally, apply failure or not; attempt the
        // commits even when the save fails so neither store loses work.
        let saved = ledger.save(&current);
        let local_commit = local.commit();
        let external_commit = external.commit();
        saved?;
        local_commit?;
        external_commit?;

        let report = CycleReport {
            new_items: delta.new_items.len(),
            modified_items: delta.modified_items.len(),
            deleted_ids: delta.deleted_ids.len(),
            bound,
            modifications,
            deletions,
            ledger_status: restored.status,
            ledger_saved: current.len(),
            apply_failure,
        };
        log::info!("Cycle end: {report}");

        Ok(report)
    }
}
