//! Test utilities for tally-core
//!
//! Small fixture builders shared by the unit tests.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::Transaction;

/// Parse a decimal literal
pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// One expense per month for the given totals, starting January 2024
pub fn monthly_expenses(category: &str, totals: &[&str]) -> Vec<Transaction> {
    totals
        .iter()
        .enumerate()
        .map(|(i, amount)| Transaction::expense(category, dec(amount), date(2024, i as u32 + 1, 15)))
        .collect()
}
