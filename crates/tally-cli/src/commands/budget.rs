//! Category and budget limit command implementations

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use tally_core::db::Database;

use super::{print_json, truncate};

pub fn cmd_budget_set(
    db: &Database,
    category: &str,
    limit: Decimal,
    owner: Option<&str>,
) -> Result<()> {
    db.set_budget_limit(category, owner, limit)
        .with_context(|| format!("Failed to set budget for '{}'", category))?;
    println!("✅ Budget for {} set to ${}", category.trim(), limit);
    Ok(())
}

pub fn cmd_budget_remove(db: &Database, category: &str, owner: Option<&str>) -> Result<()> {
    db.remove_budget_limit(category, owner)
        .with_context(|| format!("Failed to remove budget for '{}'", category))?;
    println!("🗑️  Removed budget for {}", category.trim());
    Ok(())
}

pub fn cmd_budget_list(db: &Database, owner: Option<&str>, json: bool) -> Result<()> {
    let limits = db.list_budget_limits(owner)?;
    if json {
        return print_json(&limits);
    }

    if limits.is_empty() {
        println!("No budget limits set. Add one with: tally budget set <category> <limit>");
        return Ok(());
    }

    println!();
    println!("💰 Budget limits ({})", limits.len());
    println!("   ─────────────────────────────────────────────");
    for limit in limits.iter() {
        println!(
            "   {:<24} ${:>12.2}",
            truncate(&limit.category, 24),
            limit.limit
        );
    }

    Ok(())
}

pub fn cmd_categories(db: &Database, owner: Option<&str>, json: bool) -> Result<()> {
    let categories = db.list_categories(owner)?;
    if json {
        return print_json(&categories);
    }

    if categories.is_empty() {
        println!("No categories yet. Import a ledger with: tally import --file ledger.csv");
        return Ok(());
    }

    let limits = db.list_budget_limits(owner)?;

    println!();
    println!("🏷️  Categories ({})", categories.len());
    println!("   ─────────────────────────────────────────────");
    for category in &categories {
        match limits.get(&category.name) {
            Some(limit) => println!(
                "   {:<24} limit ${:.2}",
                truncate(&category.name, 24),
                limit
            ),
            None => println!("   {}", truncate(&category.name, 24)),
        }
    }

    Ok(())
}
