//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

/// Tally - Spending analytics over your ledger
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Spending summaries, forecasts, recurring charges and budget alerts", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "tally.db", global = true)]
    pub db: PathBuf,

    /// Analytics config file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Restrict to one user's records (all records when omitted)
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Import transactions from a ledger CSV
    ///
    /// Expected columns: date,description,amount,type,category
    Import {
        /// CSV file to import
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Income, expenses and spending breakdowns
    Summary,

    /// Predict next month's expenses
    Forecast {
        /// Months to average (defaults to the configured window)
        #[arg(short, long)]
        window: Option<NonZeroUsize>,
    },

    /// Find charges that repeat roughly monthly
    Recurring,

    /// List categories and their budget limits
    Categories,

    /// Manage budget limits
    Budget {
        #[command(subcommand)]
        action: BudgetAction,
    },

    /// Show categories over their budget limit
    Alerts,

    /// Full analytics report as JSON
    Report,
}

#[derive(Subcommand)]
pub enum BudgetAction {
    /// Set a category's spending limit
    Set {
        /// Category name
        category: String,

        /// Limit amount
        limit: Decimal,
    },

    /// Remove a category's spending limit
    Remove {
        /// Category name
        category: String,
    },

    /// List budget limits
    List,
}
