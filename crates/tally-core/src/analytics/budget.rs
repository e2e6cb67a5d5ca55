//! Budget alert evaluation

use rust_decimal::Decimal;
use tracing::debug;

use super::aggregate::MONEY_DP;
use crate::models::{BudgetAlert, BudgetLimits, Transaction};

/// Compare per-category expense totals against configured limits
///
/// Only categories present in `limits` are evaluated, in the limits'
/// insertion order. Spending strictly above the limit raises an alert.
pub fn check_budget_limits(transactions: &[Transaction], limits: &BudgetLimits) -> Vec<BudgetAlert> {
    let alerts: Vec<BudgetAlert> = limits
        .iter()
        .filter_map(|budget| {
            let spent: Decimal = transactions
                .iter()
                .filter(|t| t.is_expense() && t.category == budget.category)
                .map(|t| t.amount)
                .sum();

            (spent > budget.limit).then(|| BudgetAlert {
                category: budget.category.clone(),
                limit: budget.limit,
                spent: spent.round_dp(MONEY_DP),
                over_by: (spent - budget.limit).round_dp(MONEY_DP),
            })
        })
        .collect();

    debug!(
        limits = limits.len(),
        alerts = alerts.len(),
        "Evaluated budget limits"
    );

    alerts
}
