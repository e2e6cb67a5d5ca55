//! Transaction operations

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};
use tracing::debug;

use super::{parse_amount, Database};
use crate::error::{Error, Result};
use crate::ledger::LedgerStore;
use crate::models::{NewTransaction, Transaction, UserScope, MAX_AMOUNT};

/// Result of inserting a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionInsertResult {
    /// Transaction was inserted successfully, contains new transaction ID
    Inserted(i64),
    /// Transaction was a duplicate, contains existing transaction ID
    Duplicate(i64),
}

impl Database {
    /// Insert a transaction (skips duplicates of the owner's import_hash)
    pub fn insert_transaction(
        &self,
        owner: Option<&str>,
        tx: &NewTransaction,
    ) -> Result<TransactionInsertResult> {
        if tx.amount.abs() > MAX_AMOUNT {
            return Err(Error::InvalidData(format!(
                "Amount {} exceeds the maximum of {}",
                tx.amount, MAX_AMOUNT
            )));
        }

        // Check for duplicate within the owner's records
        let existing: Option<i64> = self
            .conn()?
            .query_row(
                "SELECT id FROM transactions WHERE import_hash = ? AND owner IS ?",
                params![tx.import_hash, owner],
                |row| row.get(0),
            )
            .optional()?;

        if let Some(existing_id) = existing {
            return Ok(TransactionInsertResult::Duplicate(existing_id));
        }

        let category_id = self.upsert_category(&tx.category, owner)?;
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO transactions (category_id, owner, kind, amount, date, description, import_hash)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                category_id,
                owner,
                tx.kind.as_str(),
                tx.amount.to_string(),
                tx.date.to_string(),
                tx.description,
                tx.import_hash,
            ],
        )?;

        Ok(TransactionInsertResult::Inserted(conn.last_insert_rowid()))
    }

    /// Number of transactions visible to a scope
    pub fn transaction_count(&self, scope: &UserScope) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = match scope.owner() {
            None => conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?,
            Some(owner) => conn.query_row(
                "SELECT COUNT(*) FROM transactions WHERE owner = ?",
                params![owner],
                |row| row.get(0),
            )?,
        };
        Ok(count)
    }

    /// Ledger snapshot for a scope, oldest first
    pub fn list_transactions(&self, scope: &UserScope) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;

        // ?1 IS NULL selects every owner
        let mut stmt = conn.prepare(
            r#"
            SELECT t.amount, c.name, t.kind, t.date, t.description
            FROM transactions t
            JOIN categories c ON c.id = t.category_id
            WHERE ?1 IS NULL OR t.owner = ?1
            ORDER BY t.date, t.id
            "#,
        )?;

        let rows = stmt
            .query_map(params![scope.owner()], |row| {
                Ok(RawTransaction {
                    amount: row.get(0)?,
                    category: row.get(1)?,
                    kind: row.get(2)?,
                    date: row.get(3)?,
                    description: row.get(4)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let transactions = rows
            .into_iter()
            .map(RawTransaction::into_transaction)
            .collect::<Result<Vec<_>>>()?;

        debug!(
            count = transactions.len(),
            scope = ?scope,
            "Fetched ledger snapshot"
        );
        Ok(transactions)
    }
}

impl LedgerStore for Database {
    fn fetch_transactions(&self, scope: &UserScope) -> Result<Vec<Transaction>> {
        self.list_transactions(scope)
    }
}

/// Row as stored, before parsing text columns
struct RawTransaction {
    amount: String,
    category: String,
    kind: String,
    date: String,
    description: Option<String>,
}

impl RawTransaction {
    fn into_transaction(self) -> Result<Transaction> {
        Ok(Transaction {
            amount: parse_amount(&self.amount)?,
            kind: self.kind.parse().map_err(Error::InvalidData)?,
            date: NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").map_err(|e| {
                Error::InvalidData(format!("Bad stored date '{}': {}", self.date, e))
            })?,
            category: self.category,
            description: self.description,
        })
    }
}
