// crates/cli/src/commands.rs
//! Subcommand implementations

use anyhow::{anyhow, bail, Context, Result};
use chrono::Utc;
use std::path::PathBuf;
use tasklink_config::{default_config_path, Config, ConfigPersistence, RunState, StatePersistence};
use tasklink_core::{AppId, Item};
use tasklink_store::JsonItemStore;
use tasklink_sync_engine::{compute_delta, ItemStore, SyncConfig, SyncEngine, SyncLedger};

fn resolve_config_path(override_path: Option<PathBuf>) -> PathBuf {
    override_path.unwrap_or_else(default_config_path)
}

fn load_config(override_path: Option<PathBuf>) -> Result<Config> {
    let path = resolve_config_path(override_path);
    ConfigPersistence::new(path)
        .load()
        .context("Failed to load configuration")
}

/// Writes a default config file, refusing to clobber an existing one
pub fn init(override_path: Option<PathBuf>) -> Result<()> {
    let path = resolve_config_path(override_path);
    if path.exists() {
        bail!("Config already exists at {}", path.display());
    }

    ConfigPersistence::new(path.clone())
        .save(&Config::default())
        .context("Failed to write default config")?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

/// Adds a locally authored task; it stays unmapped until the next sync
pub fn add(override_path: Option<PathBuf>, matches: &clap::ArgMatches) -> Result<()> {
    let config = load_config(override_path)?;
    let mut local = JsonItemStore::open(&config.local_store_path)
        .context("Failed to open local task store")?;

    let summary = matches
        .get_one::<String>("summary")
        .ok_or_else(|| anyhow!("Summary is required"))?;

    let mut item = Item::new(AppId::generate(), summary.clone());
    if let Some(notes) = matches.get_one::<String>("notes") {
        item.notes = notes.clone();
    }
    if let Some(category) = matches.get_one::<String>("category") {
        item.category = category.clone();
    }
    if let Some(priority) = matches.get_one::<u8>("priority") {
        item.priority = *priority;
    }

    let app_id = item.app_id.clone();
    local.insert(item).context("Failed to add task")?;
    local.commit().context("Failed to save local task store")?;

    println!("Added task {app_id}: {summary}");
    Ok(())
}

/// Previews the delta a sync would act on, without touching either store
pub fn status(override_path: Option<PathBuf>, json: bool) -> Result<()> {
    let config = load_config(override_path)?;
    let local = JsonItemStore::open(&config.local_store_path)
        .context("Failed to open local task store")?;
    let state = StatePersistence::new(config.state_path.clone())
        .load()
        .context("Failed to load run state")?;
    let ledger = SyncLedger::new(&config.ledger_path).load();

    let items = local.items().context("Failed to enumerate local tasks")?;
    let delta = compute_delta(&items, state.cutoff(), &ledger.ids);

    if json {
        println!("{}", serde_json::to_string_pretty(&delta)?);
        return Ok(());
    }

    match state.last_sync {
        Some(t) => println!("Last synced {t}"),
        None => println!("Never synced"),
    }
    println!(
        "{} new, {} modified, {} deleted",
        delta.new_items.len(),
        delta.modified_items.len(),
        delta.deleted_ids.len()
    );
    for item in &delta.new_items {
        println!("  new:      {} ({})", item.summary, item.app_id);
    }
    for item in &delta.modified_items {
        println!("  modified: {} ({})", item.summary, item.app_id);
    }
    for id in &delta.deleted_ids {
        println!("  deleted:  external id {id}");
    }
    if ledger.status.is_partial() {
        println!("note: the ledger was truncated; deletions may be under-reported");
    }

    Ok(())
}

/// Runs one full reconciliation cycle and advances the cutoff if it was clean
pub fn sync(override_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(override_path)?;
    let mut local = JsonItemStore::open(&config.local_store_path)
        .context("Failed to open local task store")?;
    let mut external = JsonItemStore::open(&config.external_store_path)
        .context("Failed to open external task store")?;

    let state_persistence = StatePersistence::new(config.state_path.clone());
    let state = state_persistence
        .load()
        .context("Failed to load run state")?;

    let engine = SyncEngine::new(SyncConfig {
        ledger_path: config.ledger_path.clone(),
    });

    // Items changing while the cycle runs are picked up next time.
    let started = Utc::now();
    let report = engine
        .run_cycle(&mut local, &mut external, state.cutoff())
        .context("Sync cycle failed")?;

    println!("{report}");

    if report.is_clean() {
        state_persistence
            .save(&RunState {
                last_sync: Some(started),
            })
            .context("Failed to record last-sync time")?;
        Ok(())
    } else {
        // Cutoff stays put so the abandoned work is retried next run.
        bail!("Sync did not complete cleanly; last-sync cutoff left unchanged");
    }
}
