//! Analytics command implementations
//!
//! Each command fetches the scope's ledger snapshot, runs one engine view and
//! prints it as a table, or as JSON with `--json`.

use std::num::NonZeroUsize;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use tally_core::analytics::forecast_expenses;
use tally_core::{
    AnalyticsEngine, BudgetAlert, BudgetLimitSource, Database, Forecast, LedgerStore,
    RecurrenceCandidate, SpendingAnalysis, Transaction, UserScope,
};

use super::{print_json, truncate};

const RULE: &str = "   ─────────────────────────────────────────────";

fn fetch(db: &Database, scope: &UserScope) -> Result<Vec<Transaction>> {
    db.fetch_transactions(scope)
        .context("Failed to load transactions")
}

pub fn cmd_summary(
    db: &Database,
    engine: &AnalyticsEngine,
    scope: &UserScope,
    json: bool,
) -> Result<()> {
    let analysis = engine.analyze(&fetch(db, scope)?);
    if json {
        return print_json(&analysis);
    }
    print!("{}", render_summary(&analysis));
    Ok(())
}

pub fn cmd_forecast(
    db: &Database,
    engine: &AnalyticsEngine,
    scope: &UserScope,
    window: Option<NonZeroUsize>,
    json: bool,
) -> Result<()> {
    let transactions = fetch(db, scope)?;
    let forecast = match window {
        Some(window) => forecast_expenses(&transactions, window),
        None => engine.forecast(&transactions),
    };
    if json {
        return print_json(&forecast);
    }
    print!("{}", render_forecast(&forecast));
    Ok(())
}

pub fn cmd_recurring(
    db: &Database,
    engine: &AnalyticsEngine,
    scope: &UserScope,
    json: bool,
) -> Result<()> {
    let recurring = engine.recurring(&fetch(db, scope)?);
    if json {
        return print_json(&recurring);
    }
    print!("{}", render_recurring(&recurring));
    Ok(())
}

pub fn cmd_alerts(
    db: &Database,
    engine: &AnalyticsEngine,
    scope: &UserScope,
    json: bool,
) -> Result<()> {
    let transactions = fetch(db, scope)?;
    let limits = db
        .limits_for(scope)
        .context("Failed to load budget limits")?;
    let alerts = engine.alerts(&transactions, &limits);
    if json {
        return print_json(&alerts);
    }
    print!("{}", render_alerts(&alerts));
    Ok(())
}

/// The full report is always JSON
pub fn cmd_report(db: &Database, engine: &AnalyticsEngine, scope: &UserScope) -> Result<()> {
    let report = engine
        .report_for_scope(db, db, scope)
        .context("Failed to build analytics report")?;
    print_json(&report)
}

pub fn render_summary(analysis: &SpendingAnalysis) -> String {
    let report = match analysis {
        SpendingAnalysis::NoData { error } => return format!("📊 {}\n", error),
        SpendingAnalysis::Report(report) => report,
    };

    let mut out = String::new();
    out.push_str("\n📊 Spending Summary\n");
    out.push_str(RULE);
    out.push('\n');
    out.push_str(&format!(
        "   Income:    ${:>12.2}\n",
        report.summary.total_income
    ));
    out.push_str(&format!(
        "   Expenses:  ${:>12.2}\n",
        report.summary.total_expenses
    ));
    out.push_str(&format!("   Balance:   ${:>12.2}\n", report.summary.balance));

    if !report.category_spending.is_empty() {
        out.push_str("\n   By category\n");
        for row in &report.category_spending {
            out.push_str(&format!(
                "   {:<24} ${:>12.2}  {:>6.1}%\n",
                truncate(&row.category, 24),
                row.amount,
                row.share * Decimal::ONE_HUNDRED
            ));
        }
    }

    if !report.monthly_spending.is_empty() {
        out.push_str("\n   By month\n");
        for row in &report.monthly_spending {
            out.push_str(&format!(
                "   {:<24} ${:>12.2}  {:>+6.1}%\n",
                row.month,
                row.amount,
                row.mom_delta * Decimal::ONE_HUNDRED
            ));
        }
    }

    out
}

pub fn render_forecast(forecast: &Forecast) -> String {
    format!(
        "\n🔮 Next month's expenses: ${:.2} ({})\n",
        forecast.predicted_expense, forecast.method
    )
}

pub fn render_recurring(recurring: &[RecurrenceCandidate]) -> String {
    if recurring.is_empty() {
        return "🔁 No recurring charges found\n".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!("\n🔁 Recurring charges ({})\n", recurring.len()));
    out.push_str(RULE);
    out.push('\n');
    for candidate in recurring {
        out.push_str(&format!(
            "   {:<24} ~${:>10}  x{}\n",
            truncate(&candidate.category, 24),
            candidate.amt_band,
            candidate.count
        ));
    }
    out
}

pub fn render_alerts(alerts: &[BudgetAlert]) -> String {
    if alerts.is_empty() {
        return "✅ All categories are within budget\n".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!("\n⚠️  Over budget ({})\n", alerts.len()));
    out.push_str(RULE);
    out.push('\n');
    for alert in alerts {
        out.push_str(&format!(
            "   {:<24} spent ${:.2} of ${:.2} (over by ${:.2})\n",
            truncate(&alert.category, 24),
            alert.spent,
            alert.limit,
            alert.over_by
        ));
    }
    out
}
