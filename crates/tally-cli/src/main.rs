//! Tally CLI - Spending analytics
//!
//! Usage:
//!   tally init                      Initialize database
//!   tally import --file ledger.csv  Import transactions
//!   tally summary                   Spending breakdown
//!   tally report                    Full analytics report (JSON)

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let scope = commands::scope_for(cli.user.as_deref());
    let owner = cli.user.as_deref();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Import { file } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_import(&db, &file, owner)
        }
        Commands::Summary => {
            let (db, engine) = commands::open_with_engine(&cli.db, cli.config.as_deref())?;
            commands::cmd_summary(&db, &engine, &scope, cli.json)
        }
        Commands::Forecast { window } => {
            let (db, engine) = commands::open_with_engine(&cli.db, cli.config.as_deref())?;
            commands::cmd_forecast(&db, &engine, &scope, window, cli.json)
        }
        Commands::Recurring => {
            let (db, engine) = commands::open_with_engine(&cli.db, cli.config.as_deref())?;
            commands::cmd_recurring(&db, &engine, &scope, cli.json)
        }
        Commands::Categories => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_categories(&db, owner, cli.json)
        }
        Commands::Budget { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                BudgetAction::Set { category, limit } => {
                    commands::cmd_budget_set(&db, &category, limit, owner)
                }
                BudgetAction::Remove { category } => {
                    commands::cmd_budget_remove(&db, &category, owner)
                }
                BudgetAction::List => commands::cmd_budget_list(&db, owner, cli.json),
            }
        }
        Commands::Alerts => {
            let (db, engine) = commands::open_with_engine(&cli.db, cli.config.as_deref())?;
            commands::cmd_alerts(&db, &engine, &scope, cli.json)
        }
        Commands::Report => {
            let (db, engine) = commands::open_with_engine(&cli.db, cli.config.as_deref())?;
            commands::cmd_report(&db, &engine, &scope)
        }
    }
}
