//! Aggregator: totals, per-category breakdown and month-over-month trend

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::{
    CategorySpending, MonthlySpending, SpendingAnalysis, SpendingReport, SpendingSummary,
    Transaction, TransactionKind,
};

/// Message carried by the no-data sentinel
pub const NO_DATA_MESSAGE: &str = "No data available for analysis";

/// Floor for the share denominator when total expenses are exactly zero
const SHARE_EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 9);

/// Decimal places for money fields
pub(crate) const MONEY_DP: u32 = 2;

/// Decimal places for ratio fields (share, mom_delta)
pub(crate) const RATIO_DP: u32 = 4;

/// Compute summary totals, category spending and monthly spending
///
/// An empty ledger yields [`SpendingAnalysis::NoData`].
pub fn analyze_spending(transactions: &[Transaction]) -> SpendingAnalysis {
    if transactions.is_empty() {
        debug!("No transactions to analyze");
        return SpendingAnalysis::NoData {
            error: NO_DATA_MESSAGE.to_string(),
        };
    }

    let summary = summarize(transactions);
    let category_spending = category_spending(transactions, summary.total_expenses);
    let monthly_spending = monthly_spending(transactions);

    debug!(
        transactions = transactions.len(),
        categories = category_spending.len(),
        months = monthly_spending.len(),
        "Aggregated spending"
    );

    SpendingAnalysis::Report(SpendingReport {
        summary: SpendingSummary {
            total_income: summary.total_income.round_dp(MONEY_DP),
            total_expenses: summary.total_expenses.round_dp(MONEY_DP),
            balance: summary.balance.round_dp(MONEY_DP),
        },
        category_spending,
        monthly_spending,
    })
}

/// Unrounded income/expense totals
pub(crate) fn summarize(transactions: &[Transaction]) -> SpendingSummary {
    let total_of = |kind: TransactionKind| -> Decimal {
        transactions
            .iter()
            .filter(|t| t.kind == kind)
            .map(|t| t.amount)
            .sum()
    };

    let total_income = total_of(TransactionKind::Income);
    let total_expenses = total_of(TransactionKind::Expense);

    SpendingSummary {
        total_income,
        total_expenses,
        balance: total_income - total_expenses,
    }
}

/// Expense totals per category, largest first
///
/// `total_expenses` is the unrounded expense total used as the share
/// denominator.
pub(crate) fn category_spending(
    transactions: &[Transaction],
    total_expenses: Decimal,
) -> Vec<CategorySpending> {
    let mut by_category: BTreeMap<&str, Decimal> = BTreeMap::new();
    for tx in transactions.iter().filter(|t| t.is_expense()) {
        *by_category.entry(tx.category.as_str()).or_default() += tx.amount;
    }

    let denominator = total_expenses.max(SHARE_EPSILON);

    let mut rows: Vec<CategorySpending> = by_category
        .into_iter()
        .map(|(category, amount)| CategorySpending {
            category: category.to_string(),
            amount: amount.round_dp(MONEY_DP),
            share: amount
                .checked_div(denominator)
                .unwrap_or(Decimal::ZERO)
                .round_dp(RATIO_DP),
        })
        .collect();

    // Stable sort keeps name order among equal amounts
    rows.sort_by(|a, b| b.amount.cmp(&a.amount));
    rows
}

/// Unrounded expense totals keyed by `YYYY-MM`, ascending
pub(crate) fn monthly_totals(transactions: &[Transaction]) -> BTreeMap<String, Decimal> {
    let mut by_month: BTreeMap<String, Decimal> = BTreeMap::new();
    for tx in transactions.iter().filter(|t| t.is_expense()) {
        *by_month
            .entry(tx.date.format("%Y-%m").to_string())
            .or_default() += tx.amount;
    }
    by_month
}

/// Expense totals per month with month-over-month deltas
pub(crate) fn monthly_spending(transactions: &[Transaction]) -> Vec<MonthlySpending> {
    let mut previous: Option<Decimal> = None;

    monthly_totals(transactions)
        .into_iter()
        .map(|(month, amount)| {
            let mom_delta = previous.map_or(Decimal::ZERO, |prev| month_delta(prev, amount));
            previous = Some(amount);
            MonthlySpending {
                month,
                amount: amount.round_dp(MONEY_DP),
                mom_delta,
            }
        })
        .collect()
}

/// Fractional change from `previous` to `current`
///
/// A zero previous total saturates to 0 rather than an infinite ratio.
fn month_delta(previous: Decimal, current: Decimal) -> Decimal {
    if previous.is_zero() {
        return Decimal::ZERO;
    }
    (current - previous)
        .checked_div(previous)
        .unwrap_or(Decimal::ZERO)
        .round_dp(RATIO_DP)
}
