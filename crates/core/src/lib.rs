// crates/core/src/lib.rs
//! Core domain types for Tasklink
//!
//! This crate holds the types shared by every other crate: the [`Item`]
//! that is synchronized, the two identifier spaces ([`AppId`] assigned by
//! the local store, [`MappedId`] assigned by the external system), and the
//! error severity taxonomy used to classify failures across the workspace.

pub mod error;
pub mod types;

pub use error::{ErrorSeverity, Severity};
pub use types::{AppId, Item, MappedId};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_exports_accessible() {
        let item = Item::new(AppId::generate(), "exported");
        assert_eq!(item.mapped_id, MappedId::UNMAPPED);
        assert!(ErrorSeverity::Recoverable < ErrorSeverity::Fatal);
    }
}
