// crates/sync-engine/src/lib.rs
//! Delta-reconciliation engine
//!
//! This crate is the synchronization core: it determines which items in a
//! local collection are new, modified, or deleted since the last completed
//! cycle, and maintains the binding between local `AppId`s and the
//! identifiers the external system assigns.
//!
//! The external store cannot report changes or deletions itself, so the
//! engine reconstructs them from item timestamps and a persisted ledger of
//! the identifiers known at the end of the previous cycle.
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashSet;
//! use tasklink_sync_engine::compute_delta;
//!
//! let delta = compute_delta(&[], chrono::Utc::now(), &HashSet::new());
//! assert!(delta.is_empty());
//! ```

mod apply;
mod delta;
mod engine;
mod error;
mod ledger;
mod mapper;
mod store;
mod types;

pub use apply::{add_items, delete_items, modify_items, AddReport, ApplyStats};
pub use delta::compute_delta;
pub use engine::{CycleReport, SyncConfig, SyncEngine};
pub use error::{SyncError, SyncResult};
pub use ledger::{LedgerSnapshot, LedgerStatus, SyncLedger};
pub use mapper::bind_id;
pub use store::{ItemStore, MemoryStore, StoreError, StoreResult};
pub use types::DeltaResult;
