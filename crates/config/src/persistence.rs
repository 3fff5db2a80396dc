// crates/config/src/persistence.rs
//! File system persistence for configuration
//!
//! Reads and writes the config file with atomic writes (no partial or
//! corrupted files), directory creation, and graceful handling of a
//! missing file. All failure paths are Results; nothing panics.

use crate::error::{ConfigError, ConfigResult};
use crate::settings::Config;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Handles configuration file persistence
pub struct ConfigPersistence {
    config_path: PathBuf,
}

impl ConfigPersistence {
    /// Creates a new persistence handler for the given config file path
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// Returns the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Loads configuration from file
    ///
    /// A missing file yields the defaults; an empty or unparseable file is
    /// an error rather than a silent reset, so a corrupted config never
    /// points the cycle at the wrong stores.
    pub fn load(&self) -> ConfigResult<Config> {
        if !self.config_path.exists() {
            log::info!(
                "Config file not found at {}, using defaults",
                self.config_path.display()
            );
            return Ok(Config::default());
        }

        let contents =
            fs::read_to_string(&self.config_path).map_err(|e| ConfigError::ReadError {
                path: self.config_path.clone(),
                source: e,
            })?;

        if contents.trim().is_empty() {
            return Err(ConfigError::ReadError {
                path: self.config_path.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "Config file is empty or contains only whitespace",
                ),
            });
        }

        let config: Config =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
                path: self.config_path.clone(),
                source: e,
            })?;

        if let Err(errors) = config.validate() {
            return Err(ConfigError::ValidationError(errors.join("; ")));
        }

        Ok(config)
    }

    /// Saves configuration to file atomically
    pub fn save(&self, config: &Config) -> ConfigResult<()> {
        if let Err(errors) = config.validate() {
            return Err(ConfigError::ValidationError(errors.join("; ")));
        }

        if let Some(parent) = self.config_path.parent() {
            ensure_directory_exists(parent)?;
        }

        let toml_string = toml::to_string_pretty(config)?;
        write_atomic(&self.config_path, &toml_string)?;

        log::info!("Config saved to {}", self.config_path.display());
        Ok(())
    }
}

pub(crate) fn ensure_directory_exists(path: &Path) -> ConfigResult<()> {
    if !path.as_os_str().is_empty() && !path.exists() {
        fs::create_dir_all(path).map_err(|e| ConfigError::DirectoryCreationError {
            path: path.to_path_buf(),
            source: e,
        })?;
        log::debug!("Created directory: {}", path.display());
    }
    Ok(())
}

pub(crate) fn write_atomic(target: &Path, content: &str) -> ConfigResult<()> {
    let dir = target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut temp_file = NamedTempFile::new_in(dir).map_err(ConfigError::IoError)?;
    temp_file
        .write_all(content.as_bytes())
        .map_err(ConfigError::IoError)?;
    temp_file.flush().map_err(ConfigError::IoError)?;
    temp_file
        .persist(target)
        .map_err(|e| ConfigError::WriteError {
            path: target.to_path_buf(),
            source: e.error,
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_dir() -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("config.toml");
        (temp_dir, config_path)
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        let (_temp_dir, config_path) = setup_test_dir();
        let persistence = ConfigPersistence::new(config_path);

        let config = persistence.load().expect("Should load default config");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let (temp_dir, config_path) = setup_test_dir();
        let persistence = ConfigPersistence::new(config_path);

        let config = Config {
            ledger_path: temp_dir.path().join("my.ledger"),
            ..Config::default()
        };

        persistence.save(&config).expect("Should save config");
        let loaded = persistence.load().expect("Should load config");
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_save_creates_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("subdir").join("config.toml");
        let persistence = ConfigPersistence::new(config_path.clone());

        persistence
            .save(&Config::default())
            .expect("Should create directory and save");
        assert!(config_path.exists());
    }

    #[test]
    fn test_empty_file_is_error() {
        let (_temp_dir, config_path) = setup_test_dir();
        fs::write(&config_path, "   \n").expect("Should write file");

        let persistence = ConfigPersistence::new(config_path);
        assert!(matches!(
            persistence.load().unwrap_err(),
            ConfigError::ReadError { .. }
        ));
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let (_temp_dir, config_path) = setup_test_dir();
        fs::write(&config_path, "this is not valid TOML {{{").expect("Should write file");

        let persistence = ConfigPersistence::new(config_path);
        assert!(matches!(
            persistence.load().unwrap_err(),
            ConfigError::ParseError { .. }
        ));
    }

    #[test]
    fn test_invalid_values_rejected_on_save_and_load() {
        let (_temp_dir, config_path) = setup_test_dir();
        let persistence = ConfigPersistence::new(config_path.clone());

        let bad = Config {
            local_store_path: PathBuf::from("x.json"),
            external_store_path: PathBuf::from("x.json"),
            ..Config::default()
        };
        assert!(matches!(
            persistence.save(&bad).unwrap_err(),
            ConfigError::ValidationError(_)
        ));

        fs::write(
            &config_path,
            "local_store_path = \"x.json\"\nexternal_store_path = \"x.json\"\n",
        )
        .expect("Should write file");
        assert!(matches!(
            persistence.load().unwrap_err(),
            ConfigError::ValidationError(_)
        ));
    }
}
