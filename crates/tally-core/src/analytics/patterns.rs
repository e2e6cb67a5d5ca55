//! Secondary spending views: top categories, per-category totals across
//! both kinds, and unusually large expenses

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::debug;

use super::aggregate::{category_spending, summarize, MONEY_DP};
use crate::models::{CategorySpending, CategoryTotal, IrregularExpense, Transaction};

/// Default number of top categories reported
pub const DEFAULT_TOP_CATEGORIES: usize = 3;

/// Default multiple of the mean expense above which a charge is irregular
pub const DEFAULT_IRREGULAR_MULTIPLIER: Decimal = Decimal::from_parts(15, 0, 0, false, 1);

/// The `n` largest expense categories
pub fn top_spending_categories(transactions: &[Transaction], n: usize) -> Vec<CategorySpending> {
    let total_expenses = summarize(transactions).total_expenses;
    let mut rows = category_spending(transactions, total_expenses);
    rows.truncate(n);
    rows
}

/// Sum of every record per category, income and expense alike
pub fn category_totals(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut totals: BTreeMap<&str, Decimal> = BTreeMap::new();
    for tx in transactions {
        *totals.entry(tx.category.as_str()).or_default() += tx.amount;
    }

    totals
        .into_iter()
        .map(|(category, amount)| CategoryTotal {
            category: category.to_string(),
            amount: amount.round_dp(MONEY_DP),
        })
        .collect()
}

/// Expenses strictly above `multiplier` times the mean expense
///
/// Needs at least two expenses to have a meaningful mean; otherwise nothing
/// is flagged. Output is in date order.
pub fn irregular_expenses(
    transactions: &[Transaction],
    multiplier: Decimal,
) -> Vec<IrregularExpense> {
    let expenses: Vec<&Transaction> = transactions.iter().filter(|t| t.is_expense()).collect();
    if expenses.len() < 2 {
        debug!(expenses = expenses.len(), "Too few expenses to flag outliers");
        return Vec::new();
    }

    let total: Decimal = expenses.iter().map(|t| t.amount).sum();
    let mean = total / Decimal::from(expenses.len());
    let threshold = mean * multiplier;

    let mut flagged: Vec<IrregularExpense> = expenses
        .into_iter()
        .filter(|t| t.amount > threshold)
        .map(|t| IrregularExpense {
            date: t.date,
            category: t.category.clone(),
            amount: t.amount.round_dp(MONEY_DP),
            description: t.description.clone(),
        })
        .collect();
    flagged.sort_by(|a, b| a.date.cmp(&b.date));

    debug!(
        flagged = flagged.len(),
        %threshold,
        "Flagged irregular expenses"
    );

    flagged
}
