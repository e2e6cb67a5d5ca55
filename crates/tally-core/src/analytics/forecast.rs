//! Forecaster: rolling mean of the most recent monthly expense totals
//!
//! Deliberately naive. A short history shrinks the averaging window instead
//! of rejecting the request, so any ledger gets a forecast.

use std::num::NonZeroUsize;

use rust_decimal::Decimal;
use tracing::debug;

use super::aggregate::{monthly_totals, MONEY_DP};
use crate::models::{Forecast, Transaction};

/// Default number of months averaged
pub const DEFAULT_WINDOW: NonZeroUsize = match NonZeroUsize::new(3) {
    Some(window) => window,
    None => unreachable!(),
};

/// Method label for a window size
pub fn method_label(window: NonZeroUsize) -> String {
    format!("rolling_mean_{}", window)
}

/// Predict next month's expense total
///
/// Averages the last `min(window, months)` monthly totals; no expense
/// history predicts 0.
pub fn forecast_expenses(transactions: &[Transaction], window: NonZeroUsize) -> Forecast {
    let totals: Vec<Decimal> = monthly_totals(transactions).into_values().collect();
    let k = window.get().min(totals.len());

    let predicted = if k == 0 {
        Decimal::ZERO
    } else {
        let recent: Decimal = totals[totals.len() - k..].iter().sum();
        recent / Decimal::from(k)
    };

    debug!(
        months = totals.len(),
        window = window.get(),
        used = k,
        "Forecast next period expense"
    );

    Forecast {
        predicted_expense: predicted.round_dp(MONEY_DP),
        method: method_label(window),
    }
}
