// crates/sync-engine/tests/cycle_tests.rs
//! Integration tests for full reconciliation cycles

use chrono::{Duration, Utc};
use std::collections::HashSet;
use tasklink_core::{AppId, Item, MappedId};
use tasklink_sync_engine::{
    compute_delta, ItemStore, LedgerStatus, MemoryStore, SyncConfig, SyncEngine, SyncLedger,
};
use tempfile::TempDir;

fn engine_in(dir: &TempDir) -> SyncEngine {
    SyncEngine::new(SyncConfig {
        ledger_path: dir.path().join("sync.ledger"),
    })
}

fn fresh_item(app_id: &str) -> Item {
    Item::new(AppId::new(app_id), app_id)
}

#[test]
fn test_accepted_id_is_bound_and_ledgered() {
    let dir = TempDir::new().unwrap();
    let engine = engine_in(&dir);

    let mut local = MemoryStore::with_items(vec![fresh_item("task-1")]);
    // External side hands out ids from 42.
    let mut external = MemoryStore::starting_at(42);

    let report = engine
        .run_cycle(&mut local, &mut external, Utc::now() - Duration::hours(1))
        .unwrap();

    assert_eq!(
        report.bound,
        vec![(AppId::new("task-1"), MappedId::new(42))]
    );
    assert_eq!(
        local.find_by_app_id("task-1").unwrap().mapped_id,
        MappedId::new(42)
    );

    let snapshot = SyncLedger::new(dir.path().join("sync.ledger")).load();
    assert!(snapshot.ids.contains(&MappedId::new(42)));
}

#[test]
fn test_three_cycle_lifecycle() {
    let dir = TempDir::new().unwrap();
    let engine = engine_in(&dir);

    let mut local = MemoryStore::with_items(vec![fresh_item("a"), fresh_item("b")]);
    let mut external = MemoryStore::new();

    // Cycle 1: both items are new.
    let cutoff1 = Utc::now() - Duration::hours(1);
    let report = engine.run_cycle(&mut local, &mut external, cutoff1).unwrap();
    assert_eq!(report.new_items, 2);
    assert_eq!(report.ledger_status, LedgerStatus::Missing);
    assert_eq!(external.len(), 2);

    // Cycle 2: "a" is revised.
    let cutoff2 = Utc::now();
    let mut revised = local.find_by_app_id("a").unwrap();
    revised.summary = "a, revised".to_string();
    revised.modified_at = cutoff2 + Duration::seconds(5);
    local.overwrite(&revised).unwrap();

    let report = engine.run_cycle(&mut local, &mut external, cutoff2).unwrap();
    assert_eq!(report.new_items, 0);
    assert_eq!(report.modified_items, 1);
    assert_eq!(report.modifications.applied, 1);
    assert_eq!(report.ledger_status, LedgerStatus::Complete);
    assert_eq!(
        external
            .find_by_mapped_id(revised.mapped_id)
            .unwrap()
            .summary,
        "a, revised"
    );

    // Cycle 3: "b" disappears locally.
    let cutoff3 = Utc::now();
    let b_id = local.find_by_app_id("b").unwrap().mapped_id;
    local.remove(b_id).unwrap();

    let report = engine.run_cycle(&mut local, &mut external, cutoff3).unwrap();
    assert_eq!(report.deleted_ids, 1);
    assert_eq!(report.deletions.applied, 1);
    assert!(external.find_by_mapped_id(b_id).is_none());
    assert_eq!(report.ledger_saved, 1);
}

#[test]
fn test_truncated_ledger_under_reports_deletions_without_failing() {
    let dir = TempDir::new().unwrap();
    let ledger_path = dir.path().join("sync.ledger");
    let engine = SyncEngine::new(SyncConfig {
        ledger_path: ledger_path.clone(),
    });

    let mut local = MemoryStore::with_items(vec![fresh_item("a"), fresh_item("b")]);
    let mut external = MemoryStore::new();
    engine
        .run_cycle(&mut local, &mut external, Utc::now() - Duration::hours(1))
        .unwrap();

    // Simulate a crash mid-save: rewrite the ledger declaring both ids but
    // holding only one of them.
    let full = SyncLedger::new(&ledger_path).load();
    assert_eq!(full.ids.len(), 2);
    let kept = *full.ids.iter().min().unwrap();
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&2u32.to_ne_bytes());
    bytes.extend_from_slice(&kept.as_u32().to_ne_bytes());
    std::fs::write(&ledger_path, &bytes).unwrap();

    // Delete everything locally; only the id that survived truncation can
    // be detected this cycle.
    for item in local.items().unwrap() {
        local.remove(item.mapped_id).unwrap();
    }

    let report = engine
        .run_cycle(&mut local, &mut external, Utc::now())
        .unwrap();

    assert_eq!(
        report.ledger_status,
        LedgerStatus::Truncated {
            declared: 2,
            read: 1
        }
    );
    assert_eq!(report.deleted_ids, 1);
    assert!(report.is_clean());
}

#[test]
fn test_cycle_never_spuriously_deletes_present_items() {
    let dir = TempDir::new().unwrap();
    let engine = engine_in(&dir);

    let mut local = MemoryStore::with_items(vec![fresh_item("a"), fresh_item("b")]);
    let mut external = MemoryStore::new();
    engine
        .run_cycle(&mut local, &mut external, Utc::now() - Duration::hours(1))
        .unwrap();

    // Nothing was deleted locally, so repeated cycles must never report a
    // deletion regardless of cutoff.
    for _ in 0..3 {
        let report = engine
            .run_cycle(&mut local, &mut external, Utc::now())
            .unwrap();
        assert_eq!(report.deleted_ids, 0);
    }
    assert_eq!(external.len(), 2);
}

#[test]
fn test_delta_matches_ledger_contract_across_stores() {
    // The delta the engine acts on is exactly what the pure function
    // produces from the same inputs.
    let t = Utc::now();
    let mut mapped = fresh_item("m");
    mapped.mapped_id = MappedId::new(10);
    mapped.created_at = t - Duration::days(1);
    mapped.modified_at = t - Duration::days(1);

    let items = vec![mapped];
    let ledger: HashSet<MappedId> = [10, 20, 30].iter().map(|&i| MappedId::new(i)).collect();

    let delta = compute_delta(&items, t, &ledger);
    assert_eq!(
        delta.deleted_ids,
        vec![MappedId::new(20), MappedId::new(30)]
    );
    assert!(delta.new_items.is_empty());
    assert!(delta.modified_items.is_empty());
}
