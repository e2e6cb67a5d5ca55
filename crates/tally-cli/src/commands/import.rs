//! Import command implementation

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use tally_core::{db::Database, import::import_csv};

pub fn cmd_import(db: &Database, file: &Path, owner: Option<&str>) -> Result<()> {
    println!("📥 Importing {}...", file.display());

    let csv_file =
        File::open(file).with_context(|| format!("Failed to open file: {}", file.display()))?;
    let summary = import_csv(db, csv_file, owner)
        .with_context(|| format!("Failed to import {}", file.display()))?;

    println!();
    println!("✅ Import complete!");
    println!("   Imported: {}", summary.imported);
    println!("   Skipped (duplicates): {}", summary.duplicates);

    Ok(())
}
