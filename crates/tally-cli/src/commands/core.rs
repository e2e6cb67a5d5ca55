//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `load_engine` - Build the analytics engine from config
//! - `scope_for` - Map `--user` to a ledger scope
//! - `cmd_init` - Initialize the database

use std::path::Path;

use anyhow::{Context, Result};
use tally_core::{AnalyticsConfig, AnalyticsEngine, Database, UserScope};
use tracing::debug;

/// Open (creating if needed) the ledger database
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .with_context(|| format!("Database path is not valid UTF-8: {}", db_path.display()))?;
    Database::new(path_str).context("Failed to open database")
}

/// Build an analytics engine from the resolved configuration
pub fn load_engine(config_path: Option<&Path>) -> Result<AnalyticsEngine> {
    let config = AnalyticsConfig::load(config_path).context("Failed to load analytics config")?;
    debug!(?config, "Loaded analytics config");
    Ok(AnalyticsEngine::new(config))
}

/// Open the database and build the engine together
pub fn open_with_engine(
    db_path: &Path,
    config_path: Option<&Path>,
) -> Result<(Database, AnalyticsEngine)> {
    Ok((open_db(db_path)?, load_engine(config_path)?))
}

/// Scope for a `--user` value (`None` = every record)
pub fn scope_for(user: Option<&str>) -> UserScope {
    UserScope::from(user.map(str::to_string))
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    open_db(db_path)?;

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Import transactions: tally import --file ledger.csv");
    println!("  2. Set a budget: tally budget set groceries 300");
    println!("  3. See where the money goes: tally summary");

    Ok(())
}
