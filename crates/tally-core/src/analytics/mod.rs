//! Spending analytics engine
//!
//! Pure functions over a borrowed ledger snapshot:
//!
//! - **Aggregator** ([`analyze_spending`]) - totals, category and monthly breakdowns
//! - **Forecaster** ([`forecast_expenses`]) - rolling mean of recent months
//! - **Recurrence Detector** ([`detect_recurring`]) - monthly (category, band) clusters
//! - **Budget Alerts** ([`check_budget_limits`]) - categories over their limit
//! - **Patterns** - top categories, category totals, irregular expenses
//!
//! None of these perform I/O or keep references to their input. Empty or
//! degenerate input yields a sentinel or an empty/zero result, never an error.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tally_core::analytics::AnalyticsEngine;
//!
//! let engine = AnalyticsEngine::new(config);
//! let report = engine.report_for_scope(&db, &db, &UserScope::All)?;
//! ```

pub mod aggregate;
pub mod budget;
pub mod forecast;
pub mod patterns;
pub mod recurring;

pub use aggregate::{analyze_spending, NO_DATA_MESSAGE};
pub use budget::check_budget_limits;
pub use forecast::forecast_expenses;
pub use patterns::{category_totals, irregular_expenses, top_spending_categories};
pub use recurring::detect_recurring;

use tracing::info;

use crate::config::AnalyticsConfig;
use crate::error::Result;
use crate::ledger::{BudgetLimitSource, LedgerStore};
use crate::models::{
    AnalyticsReport, BudgetAlert, BudgetLimits, Forecast, RecurrenceCandidate, SpendingAnalysis,
    Transaction, UserScope,
};

/// Runs every analytics component with one configuration
#[derive(Debug, Clone, Default)]
pub struct AnalyticsEngine {
    config: AnalyticsConfig,
}

impl AnalyticsEngine {
    pub fn new(config: AnalyticsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    pub fn analyze(&self, transactions: &[Transaction]) -> SpendingAnalysis {
        analyze_spending(transactions)
    }

    pub fn forecast(&self, transactions: &[Transaction]) -> Forecast {
        forecast_expenses(transactions, self.config.forecast_window)
    }

    pub fn recurring(&self, transactions: &[Transaction]) -> Vec<RecurrenceCandidate> {
        detect_recurring(transactions, self.config.recurrence_tolerance)
    }

    pub fn alerts(&self, transactions: &[Transaction], limits: &BudgetLimits) -> Vec<BudgetAlert> {
        check_budget_limits(transactions, limits)
    }

    /// Assemble every view into one response object
    pub fn report(&self, transactions: &[Transaction], limits: &BudgetLimits) -> AnalyticsReport {
        AnalyticsReport {
            analysis: self.analyze(transactions),
            forecast: self.forecast(transactions),
            recurring: self.recurring(transactions),
            alerts: self.alerts(transactions, limits),
            top_categories: top_spending_categories(transactions, self.config.top_categories),
            category_totals: category_totals(transactions),
            irregular_expenses: irregular_expenses(
                transactions,
                self.config.irregular_multiplier,
            ),
        }
    }

    /// Fetch a scope's ledger and limits, then assemble the report
    pub fn report_for_scope<S, B>(
        &self,
        store: &S,
        budgets: &B,
        scope: &UserScope,
    ) -> Result<AnalyticsReport>
    where
        S: LedgerStore + ?Sized,
        B: BudgetLimitSource + ?Sized,
    {
        let transactions = store.fetch_transactions(scope)?;
        let limits = budgets.limits_for(scope)?;
        info!(
            transactions = transactions.len(),
            limits = limits.len(),
            "Building analytics report"
        );
        Ok(self.report(&transactions, &limits))
    }
}
