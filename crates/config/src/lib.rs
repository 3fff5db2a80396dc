// crates/config/src/lib.rs
//! Configuration and run state for Tasklink
//!
//! Two small TOML files: the configuration proper (where the task stores
//! and the ledger live) and the run state (the last-sync cutoff advanced
//! after each clean cycle). Both load to sensible defaults when missing
//! and are written atomically through a temporary file.

mod error;
mod persistence;
mod settings;
mod state;

pub use error::{ConfigError, ConfigResult};
pub use persistence::ConfigPersistence;
pub use settings::{default_config_path, Config};
pub use state::{RunState, StatePersistence};
