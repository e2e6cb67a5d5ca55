//! Category and budget limit operations

use rusqlite::{params, OptionalExtension};
use rust_decimal::Decimal;
use tracing::debug;

use super::{parse_amount, Database};
use crate::error::{Error, Result};
use crate::ledger::BudgetLimitSource;
use crate::models::{BudgetLimits, Category, UserScope};

impl Database {
    /// Find or create a category by name and owner, returning its ID
    pub fn upsert_category(&self, name: &str, owner: Option<&str>) -> Result<i64> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidData("Category name cannot be empty".into()));
        }

        let conn = self.conn()?;

        let existing: Option<i64> = conn
            .query_row(
                "SELECT id FROM categories WHERE name = ? AND owner IS ?",
                params![name, owner],
                |row| row.get(0),
            )
            .optional()?;

        if let Some(id) = existing {
            return Ok(id);
        }

        conn.execute(
            "INSERT INTO categories (name, owner) VALUES (?, ?)",
            params![name, owner],
        )?;

        debug!("Created category {}", name);
        Ok(conn.last_insert_rowid())
    }

    /// List categories visible to an owner (`None` = unowned)
    pub fn list_categories(&self, owner: Option<&str>) -> Result<Vec<Category>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, owner FROM categories WHERE owner IS ? ORDER BY name",
        )?;

        let categories = stmt
            .query_map(params![owner], |row| {
                Ok(Category {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    owner: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(categories)
    }

    /// Set the budget limit for a category, creating the category if needed
    ///
    /// Updating an existing limit keeps its position in the limit order.
    pub fn set_budget_limit(&self, category: &str, owner: Option<&str>, limit: Decimal) -> Result<()> {
        if limit.is_sign_negative() {
            return Err(Error::InvalidData("Budget limit cannot be negative".into()));
        }

        let category_id = self.upsert_category(category, owner)?;
        let conn = self.conn()?;

        let updated = conn.execute(
            "UPDATE budget_limits SET amount = ? WHERE category_id = ? AND owner IS ?",
            params![limit.to_string(), category_id, owner],
        )?;

        if updated == 0 {
            conn.execute(
                "INSERT INTO budget_limits (category_id, owner, amount) VALUES (?, ?, ?)",
                params![category_id, owner, limit.to_string()],
            )?;
        }

        Ok(())
    }

    /// Remove a category's budget limit
    pub fn remove_budget_limit(&self, category: &str, owner: Option<&str>) -> Result<()> {
        let conn = self.conn()?;
        let removed = conn.execute(
            r#"
            DELETE FROM budget_limits
            WHERE owner IS ?1
            AND category_id IN (SELECT id FROM categories WHERE name = ?2 AND owner IS ?1)
            "#,
            params![owner, category.trim()],
        )?;

        if removed == 0 {
            return Err(Error::NotFound(format!(
                "Budget limit for category '{}'",
                category
            )));
        }
        Ok(())
    }

    /// Budget limits for an owner (`None` = unowned), in creation order
    pub fn list_budget_limits(&self, owner: Option<&str>) -> Result<BudgetLimits> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT c.name, b.amount
            FROM budget_limits b
            JOIN categories c ON c.id = b.category_id
            WHERE b.owner IS ?
            ORDER BY b.id
            "#,
        )?;

        let rows = stmt
            .query_map(params![owner], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut limits = BudgetLimits::new();
        for (category, amount) in rows {
            limits.set(category, parse_amount(&amount)?);
        }

        Ok(limits)
    }
}

impl BudgetLimitSource for Database {
    fn limits_for(&self, scope: &UserScope) -> Result<BudgetLimits> {
        self.list_budget_limits(scope.owner())
    }
}
