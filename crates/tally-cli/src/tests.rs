//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::io::Write;
use std::num::NonZeroUsize;
use std::str::FromStr;

use rust_decimal::Decimal;
use tally_core::db::Database;
use tally_core::{AnalyticsEngine, BudgetAlert, LedgerStore, UserScope};
use tempfile::NamedTempFile;

use crate::commands::{self, truncate};

const LEDGER_CSV: &str = "date,description,amount,type,category
2024-01-01,Salary,3000,income,salary
2024-01-03,Rent,1000,expense,rent
2024-01-12,Market,350,expense,groceries
2024-02-03,Rent,1000,expense,rent
";

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn csv_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn setup_test_db() -> Database {
    let db = Database::in_memory().unwrap();
    let file = csv_file(LEDGER_CSV);
    commands::cmd_import(&db, file.path(), None).unwrap();
    db
}

// ========== Core Command Tests ==========

#[test]
fn test_cmd_init_creates_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tally.db");

    commands::cmd_init(&path).unwrap();
    assert!(path.exists());

    let conn = rusqlite::Connection::open(&path).unwrap();
    let tables: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('categories', 'transactions', 'budget_limits')",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(tables, 3);
}

#[test]
fn test_scope_for() {
    assert_eq!(commands::scope_for(None), UserScope::All);
    assert_eq!(
        commands::scope_for(Some("ana")),
        UserScope::Owner("ana".to_string())
    );
}

#[test]
fn test_load_engine_from_file() {
    let mut config = NamedTempFile::new().unwrap();
    writeln!(config, "forecast_window = 6").unwrap();

    let engine = commands::load_engine(Some(config.path())).unwrap();
    assert_eq!(engine.config().forecast_window.get(), 6);
}

#[test]
fn test_load_engine_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let result = commands::load_engine(Some(&dir.path().join("missing.toml")));
    assert!(result.is_err());
}

// ========== Import Command Tests ==========

#[test]
fn test_cmd_import() {
    let db = setup_test_db();
    assert_eq!(db.transaction_count(&UserScope::All).unwrap(), 4);

    // Importing the same file again adds nothing
    let file = csv_file(LEDGER_CSV);
    commands::cmd_import(&db, file.path(), None).unwrap();
    assert_eq!(db.transaction_count(&UserScope::All).unwrap(), 4);
}

#[test]
fn test_cmd_import_for_user() {
    let db = Database::in_memory().unwrap();
    let file = csv_file(LEDGER_CSV);
    commands::cmd_import(&db, file.path(), Some("ana")).unwrap();

    let ana = UserScope::Owner("ana".to_string());
    assert_eq!(db.fetch_transactions(&ana).unwrap().len(), 4);
    let ben = UserScope::Owner("ben".to_string());
    assert!(db.fetch_transactions(&ben).unwrap().is_empty());
}

#[test]
fn test_cmd_import_missing_file() {
    let db = Database::in_memory().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let result = commands::cmd_import(&db, &dir.path().join("nope.csv"), None);
    assert!(result.is_err());
}

#[test]
fn test_cmd_import_bad_row_imports_nothing() {
    let db = Database::in_memory().unwrap();
    let file = csv_file("date,amount,type,category\n2024-01-01,10,expense,a\n2024-01-02,10,refund,b\n");

    assert!(commands::cmd_import(&db, file.path(), None).is_err());
    assert_eq!(db.transaction_count(&UserScope::All).unwrap(), 0);
}

// ========== Budget Command Tests ==========

#[test]
fn test_cmd_budget_set_and_list() {
    let db = setup_test_db();
    commands::cmd_budget_set(&db, "groceries", dec("300"), None).unwrap();
    commands::cmd_budget_set(&db, "rent", dec("2500"), None).unwrap();

    let limits = db.list_budget_limits(None).unwrap();
    assert_eq!(limits.len(), 2);
    assert_eq!(limits.get("groceries"), Some(dec("300")));

    assert!(commands::cmd_budget_list(&db, None, false).is_ok());
    assert!(commands::cmd_budget_list(&db, None, true).is_ok());
}

#[test]
fn test_cmd_budget_set_negative_fails() {
    let db = setup_test_db();
    assert!(commands::cmd_budget_set(&db, "rent", dec("-5"), None).is_err());
}

#[test]
fn test_cmd_budget_remove() {
    let db = setup_test_db();
    commands::cmd_budget_set(&db, "groceries", dec("300"), None).unwrap();

    commands::cmd_budget_remove(&db, "groceries", None).unwrap();
    assert!(db.list_budget_limits(None).unwrap().is_empty());

    // Nothing left to remove
    assert!(commands::cmd_budget_remove(&db, "groceries", None).is_err());
}

#[test]
fn test_cmd_categories() {
    let db = setup_test_db();
    commands::cmd_budget_set(&db, "groceries", dec("300"), None).unwrap();

    assert!(commands::cmd_categories(&db, None, false).is_ok());
    assert!(commands::cmd_categories(&db, None, true).is_ok());

    let names: Vec<String> = db
        .list_categories(None)
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["groceries", "rent", "salary"]);

    // Another user's view starts empty
    assert!(db.list_categories(Some("ana")).unwrap().is_empty());
    assert!(commands::cmd_categories(&db, Some("ana"), false).is_ok());
}

// ========== Report Command Tests ==========

#[test]
fn test_report_commands_run() {
    let db = setup_test_db();
    commands::cmd_budget_set(&db, "groceries", dec("300"), None).unwrap();
    let engine = AnalyticsEngine::default();
    let scope = UserScope::All;

    for json in [false, true] {
        assert!(commands::cmd_summary(&db, &engine, &scope, json).is_ok());
        assert!(commands::cmd_forecast(&db, &engine, &scope, None, json).is_ok());
        assert!(commands::cmd_recurring(&db, &engine, &scope, json).is_ok());
        assert!(commands::cmd_alerts(&db, &engine, &scope, json).is_ok());
    }
    assert!(commands::cmd_report(&db, &engine, &scope).is_ok());
}

#[test]
fn test_cmd_forecast_window_override() {
    let db = setup_test_db();
    let engine = AnalyticsEngine::default();
    let result = commands::cmd_forecast(
        &db,
        &engine,
        &UserScope::All,
        NonZeroUsize::new(1),
        false,
    );
    assert!(result.is_ok());
}

#[test]
fn test_render_summary_no_data() {
    let engine = AnalyticsEngine::default();
    let output = commands::render_summary(&engine.analyze(&[]));
    assert!(output.contains("No data available for analysis"));
}

#[test]
fn test_render_summary_lists_categories() {
    let db = setup_test_db();
    let engine = AnalyticsEngine::default();
    let transactions = db.fetch_transactions(&UserScope::All).unwrap();

    let output = commands::render_summary(&engine.analyze(&transactions));
    assert!(output.contains("Spending Summary"));
    assert!(output.contains("rent"));
    assert!(output.contains("groceries"));
    assert!(output.contains("2024-02"));
}

#[test]
fn test_render_forecast() {
    let db = setup_test_db();
    let engine = AnalyticsEngine::default();
    let transactions = db.fetch_transactions(&UserScope::All).unwrap();

    // January 1350, February 1000
    let output = commands::render_forecast(&engine.forecast(&transactions));
    assert!(output.contains("1175.00"));
    assert!(output.contains("rolling_mean_3"));
}

#[test]
fn test_render_alerts() {
    assert!(commands::render_alerts(&[]).contains("within budget"));

    let alerts = vec![BudgetAlert {
        category: "groceries".to_string(),
        limit: dec("300"),
        spent: dec("350.00"),
        over_by: dec("50.00"),
    }];
    let output = commands::render_alerts(&alerts);
    assert!(output.contains("groceries"));
    assert!(output.contains("over by $50.00"));
}

#[test]
fn test_render_recurring_empty() {
    assert!(commands::render_recurring(&[]).contains("No recurring charges"));
}

// ========== Utility Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a very long category name", 10), "a very ...");
    assert_eq!(truncate("épicerie fine", 8), "épice...");
}
