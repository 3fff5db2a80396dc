// crates/config/src/settings.rs
//! Application configuration

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the stores, the ledger, and the run state live
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The local task collection
    pub local_store_path: PathBuf,
    /// The external store counterpart
    pub external_store_path: PathBuf,
    /// The identifier ledger used for deletion detection
    pub ledger_path: PathBuf,
    /// The persisted last-sync cutoff
    pub state_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = data_dir();
        Self {
            local_store_path: data_dir.join("tasks.json"),
            external_store_path: data_dir.join("external.json"),
            ledger_path: data_dir.join("tasklink.ledger"),
            state_path: data_dir.join("state.toml"),
        }
    }
}

impl Config {
    /// Checks the configuration for values that cannot work
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        for (name, path) in [
            ("local_store_path", &self.local_store_path),
            ("external_store_path", &self.external_store_path),
            ("ledger_path", &self.ledger_path),
            ("state_path", &self.state_path),
        ] {
            if path.as_os_str().is_empty() {
                errors.push(format!("{name} must not be empty"));
            }
        }

        if self.local_store_path == self.external_store_path {
            errors.push(
                "local_store_path and external_store_path must not point at the same file"
                    .to_string(),
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Default location of the config file itself
pub fn default_config_path() -> PathBuf {
    match ProjectDirs::from("org", "tasklink", "tasklink") {
        Some(dirs) => dirs.config_dir().join("config.toml"),
        None => PathBuf::from("tasklink.toml"),
    }
}

fn data_dir() -> PathBuf {
    match ProjectDirs::from("org", "tasklink", "tasklink") {
        Some(dirs) => dirs.data_dir().to_path_buf(),
        None => PathBuf::from("."),
    }
}
