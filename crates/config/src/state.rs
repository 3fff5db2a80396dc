// crates/config/src/state.rs
//! Persisted run state
//!
//! The last-sync cutoff lives outside the config proper because it changes
//! on every clean cycle while the config changes essentially never.

use crate::error::{ConfigError, ConfigResult};
use crate::persistence::{ensure_directory_exists, write_atomic};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// State carried between invocations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunState {
    /// When the last clean cycle started; `None` means never synced
    pub last_sync: Option<DateTime<Utc>>,
}

impl RunState {
    /// The cutoff to classify against: the last sync, or the epoch when no
    /// cycle has completed yet (so every item counts as changed)
    pub fn cutoff(&self) -> DateTime<Utc> {
        self.last_sync.unwrap_or(DateTime::UNIX_EPOCH)
    }
}

/// Handles run state file persistence
pub struct StatePersistence {
    state_path: PathBuf,
}

impl StatePersistence {
    /// Creates a new persistence handler for the given state file path
    pub fn new(state_path: PathBuf) -> Self {
        Self { state_path }
    }

    /// Returns the state file path
    pub fn path(&self) -> &Path {
        &self.state_path
    }

    /// Loads the run state; a missing file means never synced
    pub fn load(&self) -> ConfigResult<RunState> {
        if !self.state_path.exists() {
            log::info!(
                "No run state at {}, treating as never synced",
                self.state_path.display()
            );
            return Ok(RunState::default());
        }

        let contents =
            fs::read_to_string(&self.state_path).map_err(|e| ConfigError::ReadError {
                path: self.state_path.clone(),
                source: e,
            })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: self.state_path.clone(),
            source: e,
        })
    }

    /// Saves the run state atomically
    pub fn save(&self, state: &RunState) -> ConfigResult<()> {
        if let Some(parent) = self.state_path.parent() {
            ensure_directory_exists(parent)?;
        }

        let toml_string = toml::to_string_pretty(state)?;
        write_atomic(&self.state_path, &toml_string)?;

        log::debug!("Run state saved to {}", self.state_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_state_means_never_synced() {
        let dir = TempDir::new().unwrap();
        let persistence = StatePersistence::new(dir.path().join("state.toml"));

        let state = persistence.load().unwrap();
        assert!(state.last_sync.is_none());
        assert_eq!(state.cutoff(), DateTime::UNIX_EPOCH);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let persistence = StatePersistence::new(dir.path().join("state.toml"));

        let state = RunState {
            last_sync: Some(Utc::now()),
        };
        persistence.save(&state).unwrap();

        let loaded = persistence.load().unwrap();
        assert_eq!(loaded, state);
        assert_eq!(loaded.cutoff(), state.last_sync.unwrap());
    }

    #[test]
    fn test_garbled_state_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.toml");
        fs::write(&path, "last_sync = \"not a time\"").unwrap();

        let err = StatePersistence::new(path).load().unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }
}
