//! SQLite ledger store with connection pooling
//!
//! This module is organized by domain:
//! - `categories` - Category lookup/creation and budget limits
//! - `transactions` - Transaction inserts and ledger snapshots
//!
//! Every row carries an optional `owner`. A [`UserScope::All`] query sees all
//! transactions and the unowned budget limits; [`UserScope::Owner`] sees only
//! that owner's rows.
//!
//! [`UserScope::All`]: crate::models::UserScope::All
//! [`UserScope::Owner`]: crate::models::UserScope::Owner

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tracing::info;

use crate::error::Result;

mod categories;
mod transactions;

pub use transactions::TransactionInsertResult;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Database wrapper with connection pooling
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    /// Path to the database file
    db_path: String,
}

impl Database {
    /// Open (or create) a database file and run migrations
    pub fn new(path: &str) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path).with_init(|conn| {
            // Per-connection setting, so it has to run on every pooled connection
            conn.execute_batch("PRAGMA foreign_keys = ON;")
        });

        let pool = Pool::builder().max_size(10).build(manager)?;

        let db = Self {
            pool,
            db_path: path.to_string(),
        };
        db.run_migrations()?;

        info!("Opened ledger database at {}", path);
        Ok(db)
    }

    /// Get the path to the database file
    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Create a throwaway database (for testing)
    ///
    /// Uses a temporary file rather than `:memory:` because every pooled
    /// connection to `:memory:` would see its own empty database.
    pub fn in_memory() -> Result<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "tally_test_{}_{}.db",
            std::process::id(),
            id
        ));

        // Remove any existing file
        let _ = std::fs::remove_file(&path);

        Self::new(&path.to_string_lossy())
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            -- WAL mode: readers don't block writers
            PRAGMA journal_mode = WAL;

            -- Synchronous NORMAL: good balance of safety and performance
            PRAGMA synchronous = NORMAL;

            -- Categories (identity for aggregation is the name)
            CREATE TABLE IF NOT EXISTS categories (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                owner TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_categories_name ON categories(name);

            -- Transactions
            -- Amounts are stored as decimal text to keep exact cents
            CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY,
                category_id INTEGER NOT NULL REFERENCES categories(id),
                owner TEXT,
                kind TEXT NOT NULL CHECK (kind IN ('income', 'expense')),
                amount TEXT NOT NULL,
                date DATE NOT NULL,
                description TEXT,
                import_hash TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            -- Import hashes are unique per owner; NULL owners share one namespace
            CREATE UNIQUE INDEX IF NOT EXISTS idx_transactions_owner_hash
                ON transactions(COALESCE(owner, ''), import_hash);
            CREATE INDEX IF NOT EXISTS idx_transactions_owner ON transactions(owner);
            CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);

            -- Budget limits (one per category and owner)
            CREATE TABLE IF NOT EXISTS budget_limits (
                id INTEGER PRIMARY KEY,
                category_id INTEGER NOT NULL REFERENCES categories(id),
                owner TEXT,
                amount TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_budget_limits_owner ON budget_limits(owner);
            "#,
        )?;

        Ok(())
    }
}

/// Parse a decimal stored as text
pub(crate) fn parse_amount(s: &str) -> Result<rust_decimal::Decimal> {
    use std::str::FromStr;
    rust_decimal::Decimal::from_str(s)
        .map_err(|e| crate::error::Error::InvalidData(format!("Bad stored amount '{}': {}", s, e)))
}
