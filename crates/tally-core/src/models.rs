//! Domain models for Tally

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of a money movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction kind: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single ledger record, as handed to the analytics engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Currency units; sign semantics come from `kind`
    pub amount: Decimal,
    /// Category name (identity for aggregation)
    pub category: String,
    pub kind: TransactionKind,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Transaction {
    pub fn new(
        kind: TransactionKind,
        category: impl Into<String>,
        amount: Decimal,
        date: NaiveDate,
    ) -> Self {
        Self {
            amount,
            category: category.into(),
            kind,
            date,
            description: None,
        }
    }

    pub fn expense(category: impl Into<String>, amount: Decimal, date: NaiveDate) -> Self {
        Self::new(TransactionKind::Expense, category, amount, date)
    }

    pub fn income(category: impl Into<String>, amount: Decimal, date: NaiveDate) -> Self {
        Self::new(TransactionKind::Income, category, amount, date)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }
}

/// Largest stored amount: 10 significant digits with 2 decimal places
/// (99,999,999.99). Keeps ledger sums far from `Decimal` overflow.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

/// Decimal places allowed in a stored amount
pub const AMOUNT_DP: u32 = 2;

/// A transaction about to be written to the store
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub description: Option<String>,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub category: String,
    /// Hash for deduplication
    pub import_hash: String,
}

/// A spending category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    /// Owning identity; `None` for shared categories
    pub owner: Option<String>,
}

/// Whose records a query covers
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UserScope {
    /// Every record in the store (unauthenticated/demo mode)
    #[default]
    All,
    /// Records owned by one identity
    Owner(String),
}

impl UserScope {
    pub fn owner(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Owner(name) => Some(name),
        }
    }
}

impl From<Option<String>> for UserScope {
    fn from(owner: Option<String>) -> Self {
        owner.map_or(Self::All, Self::Owner)
    }
}

/// A user-defined spending ceiling for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetLimit {
    pub category: String,
    pub limit: Decimal,
}

/// Category limits in insertion order
///
/// Setting a limit for a category that already has one replaces the amount
/// but keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BudgetLimits {
    limits: Vec<BudgetLimit>,
}

impl BudgetLimits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, category: impl Into<String>, limit: Decimal) {
        let category = category.into();
        match self.limits.iter_mut().find(|l| l.category == category) {
            Some(existing) => existing.limit = limit,
            None => self.limits.push(BudgetLimit { category, limit }),
        }
    }

    pub fn with(mut self, category: impl Into<String>, limit: Decimal) -> Self {
        self.set(category, limit);
        self
    }

    pub fn get(&self, category: &str) -> Option<Decimal> {
        self.limits
            .iter()
            .find(|l| l.category == category)
            .map(|l| l.limit)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BudgetLimit> {
        self.limits.iter()
    }

    pub fn len(&self) -> usize {
        self.limits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.limits.is_empty()
    }
}

impl FromIterator<(String, Decimal)> for BudgetLimits {
    fn from_iter<I: IntoIterator<Item = (String, Decimal)>>(iter: I) -> Self {
        let mut limits = Self::new();
        for (category, limit) in iter {
            limits.set(category, limit);
        }
        limits
    }
}

// ========== Derived views ==========

/// Income/expense totals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendingSummary {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub balance: Decimal,
}

/// Expense total for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySpending {
    pub category: String,
    pub amount: Decimal,
    /// Fraction of total expenses (4 dp)
    pub share: Decimal,
}

/// Expense total for one calendar month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySpending {
    /// `YYYY-MM`
    pub month: String,
    pub amount: Decimal,
    /// Change against the previous month as a fraction (4 dp)
    pub mom_delta: Decimal,
}

/// Aggregated view of a non-empty ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendingReport {
    pub summary: SpendingSummary,
    pub category_spending: Vec<CategorySpending>,
    pub monthly_spending: Vec<MonthlySpending>,
}

/// Aggregator output: a report, or the no-data sentinel for an empty ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpendingAnalysis {
    NoData { error: String },
    Report(SpendingReport),
}

impl SpendingAnalysis {
    pub fn report(&self) -> Option<&SpendingReport> {
        match self {
            Self::Report(report) => Some(report),
            Self::NoData { .. } => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData { .. })
    }
}

/// Next-period expense prediction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Forecast {
    pub predicted_expense: Decimal,
    /// Method label, e.g. `rolling_mean_3`
    pub method: String,
}

/// A (category, amount band) cluster that repeats roughly monthly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceCandidate {
    pub category: String,
    pub amt_band: Decimal,
    pub count: usize,
}

/// A category whose spend exceeded its limit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetAlert {
    pub category: String,
    pub limit: Decimal,
    pub spent: Decimal,
    pub over_by: Decimal,
}

/// Total for one category across both kinds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: Decimal,
}

/// An expense well above the ledger's average expense
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrregularExpense {
    pub date: NaiveDate,
    pub category: String,
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Every analytics view for one ledger snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub analysis: SpendingAnalysis,
    pub forecast: Forecast,
    pub recurring: Vec<RecurrenceCandidate>,
    pub alerts: Vec<BudgetAlert>,
    pub top_categories: Vec<CategorySpending>,
    pub category_totals: Vec<CategoryTotal>,
    pub irregular_expenses: Vec<IrregularExpense>,
}
