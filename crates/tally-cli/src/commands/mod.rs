//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `budget` - Category listing and budget limit commands (set, remove, list)
//! - `core` - Init and shared utilities (open_db, engine setup, scope)
//! - `import` - Ledger CSV import
//! - `reports` - Analytics commands (summary, forecast, recurring, alerts, report)

pub mod budget;
pub mod core;
pub mod import;
pub mod reports;

// Re-export command functions for main.rs
pub use budget::*;
pub use core::*;
pub use import::*;
pub use reports::*;

use anyhow::Result;
use serde::Serialize;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Print a value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
