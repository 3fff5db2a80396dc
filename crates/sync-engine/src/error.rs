// crates/sync-engine/src/error.rs
//! Error types for sync operations

use crate::store::StoreError;
use std::path::PathBuf;
use tasklink_core::{ErrorSeverity, MappedId, Severity};
use thiserror::Error;

/// Result type for sync operations
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur during a synchronization cycle
#[derive(Debug, Error)]
pub enum SyncError {
    /// Could not open or write the ledger destination
    #[error("Failed to write ledger at {path}: {source}")]
    LedgerWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The item store reported a failure
    #[error("Item store error: {0}")]
    Store(#[from] StoreError),

    /// An apply batch failed at a specific item
    #[error("Failed to {operation} item {item}: {source}")]
    Apply {
        operation: &'static str,
        item: String,
        #[source]
        source: StoreError,
    },

    /// No item with the given AppId exists in the store
    #[error("No item with app id {app_id} in the store")]
    IdentityNotFound { app_id: String },

    /// The item already carries an external identifier
    #[error("Item {app_id} is already bound to external id {mapped_id}")]
    AlreadyBound { app_id: String, mapped_id: MappedId },

    /// The unmapped sentinel is not a bindable identifier
    #[error("Cannot bind the unmapped sentinel onto item {app_id}")]
    InvalidAssignment { app_id: String },
}

impl Severity for SyncError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            // A short ledger is absorbed by the next load; a failed save
            // only delays deletion detection by one cycle.
            Self::LedgerWrite { .. } => ErrorSeverity::Recoverable,

            // The cycle abandons the remaining batch but still completes.
            Self::Apply { .. }
            | Self::IdentityNotFound { .. }
            | Self::AlreadyBound { .. }
            | Self::InvalidAssignment { .. } => ErrorSeverity::Degraded,

            // The store being unreachable stops the cycle outright.
            Self::Store(_) => ErrorSeverity::Fatal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_not_found_display() {
        let err = SyncError::IdentityNotFound {
            app_id: "task-9".to_string(),
        };
        assert!(err.to_string().contains("task-9"));
    }

    #[test]
    fn test_already_bound_display() {
        let err = SyncError::AlreadyBound {
            app_id: "task-3".to_string(),
            mapped_id: MappedId::new(12),
        };
        let msg = err.to_string();
        assert!(msg.contains("task-3"));
        assert!(msg.contains("12"));
    }

    #[test]
    fn test_apply_names_operation_and_item() {
        let err = SyncError::Apply {
            operation: "add",
            item: "task-1".to_string(),
            source: StoreError::Backend("disk on fire".to_string()),
        };
        let msg = err.to_string();
        assert!(msg.contains("add"));
        assert!(msg.contains("task-1"));
    }

    #[test]
    fn test_severity_tiers() {
        let write = SyncError::LedgerWrite {
            path: PathBuf::from("/tmp/x.ledger"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(write.severity(), ErrorSeverity::Recoverable);

        let store = SyncError::Store(StoreError::Backend("gone".to_string()));
        assert!(store.is_fatal());

        let apply = SyncError::Apply {
            operation: "delete",
            item: "4".to_string(),
            source: StoreError::Backend("gone".to_string()),
        };
        assert_eq!(apply.severity(), ErrorSeverity::Degraded);
    }
}
