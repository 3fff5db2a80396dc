// crates/store/src/lib.rs
//! File-backed task store
//!
//! A task collection persisted as a JSON file of [`TaskRecord`]s. The
//! on-disk record format uses epoch-seconds timestamps with `0` meaning
//! "unset"; [`record_to_item`]/[`item_to_record`] translate between that
//! representation and the in-memory [`tasklink_core::Item`] field by field.
//!
//! [`JsonItemStore`] implements the sync engine's `ItemStore` contract and
//! owns its durability: `commit` rewrites the file atomically through a
//! temporary file in the same directory.

mod error;
mod json_store;
mod record;

pub use error::{StoreFileError, StoreFileResult};
pub use json_store::JsonItemStore;
pub use record::{item_to_record, record_to_item, TaskRecord};
