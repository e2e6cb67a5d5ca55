//! Tally Core Library
//!
//! Shared functionality for the Tally spending analytics tool:
//! - Ledger model (transactions, categories, budget limits)
//! - SQLite ledger store with per-user scoping
//! - CSV ledger import with duplicate detection
//! - Analytics: aggregation, forecasting, recurrence detection, budget alerts
//! - Layered configuration

pub mod analytics;
pub mod config;
pub mod db;
pub mod error;
pub mod import;
pub mod ledger;
pub mod models;

#[cfg(test)]
mod test_utils;

pub use analytics::AnalyticsEngine;
pub use config::AnalyticsConfig;
pub use db::{Database, TransactionInsertResult};
pub use error::{Error, Result};
pub use import::{import_csv, parse_csv, ImportSummary};
pub use ledger::{BudgetLimitSource, InMemoryLedger, LedgerStore};
pub use models::{
    AnalyticsReport, BudgetAlert, BudgetLimit, BudgetLimits, Forecast, RecurrenceCandidate,
    SpendingAnalysis, SpendingReport, Transaction, TransactionKind, UserScope,
};
