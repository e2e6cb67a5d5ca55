//! Recurrence detection
//!
//! Flags (category, amount band) clusters that show up about once a month.
//! This is a loose cadence heuristic: there is no phase alignment or
//! interval variance check, and nearby charges of unrelated merchants in the
//! same band are merged.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use crate::models::{RecurrenceCandidate, Transaction};

/// Width of an amount band in currency units
pub const BAND_WIDTH: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// Minimum average occurrences per month to count as recurring
pub const MIN_AVG_PER_MONTH: f64 = 0.8;

/// Days per month used for span estimation
const DAYS_PER_MONTH: f64 = 30.0;

/// Lower edge of the band containing `amount`
pub fn amount_band(amount: Decimal) -> Decimal {
    (amount / BAND_WIDTH).floor() * BAND_WIDTH
}

#[derive(Debug)]
struct Cluster {
    count: usize,
    earliest: NaiveDate,
    latest: NaiveDate,
}

impl Cluster {
    fn new(date: NaiveDate) -> Self {
        Self {
            count: 1,
            earliest: date,
            latest: date,
        }
    }

    fn add(&mut self, date: NaiveDate) {
        self.count += 1;
        self.earliest = self.earliest.min(date);
        self.latest = self.latest.max(date);
    }

    /// Months covered, never less than one
    fn months_span(&self) -> f64 {
        let days = (self.latest - self.earliest).num_days() as f64;
        (days / DAYS_PER_MONTH).max(1.0)
    }

    fn avg_per_month(&self) -> f64 {
        self.count as f64 / self.months_span()
    }
}

/// Find expense clusters that recur on a roughly monthly cadence
///
/// `tolerance` is accepted for configuration compatibility but does not
/// change banding yet. A one-off charge qualifies (one occurrence over a
/// floored one-month span is an average of 1.0).
///
/// Results are sorted by count descending, then category, then band.
pub fn detect_recurring(
    transactions: &[Transaction],
    tolerance: Decimal,
) -> Vec<RecurrenceCandidate> {
    let mut clusters: BTreeMap<(&str, Decimal), Cluster> = BTreeMap::new();

    for tx in transactions.iter().filter(|t| t.is_expense()) {
        let key = (tx.category.as_str(), amount_band(tx.amount));
        clusters
            .entry(key)
            .and_modify(|c| c.add(tx.date))
            .or_insert_with(|| Cluster::new(tx.date));
    }

    let mut candidates: Vec<RecurrenceCandidate> = clusters
        .into_iter()
        .filter(|(_, cluster)| cluster.avg_per_month() >= MIN_AVG_PER_MONTH)
        .map(|((category, band), cluster)| RecurrenceCandidate {
            category: category.to_string(),
            amt_band: band,
            count: cluster.count,
        })
        .collect();

    // Clusters come out in (category, band) order; stable sort preserves it
    candidates.sort_by(|a, b| b.count.cmp(&a.count));

    debug!(
        candidates = candidates.len(),
        %tolerance,
        "Detected recurring charges"
    );

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{date, dec};

    fn no_tolerance() -> Decimal {
        Decimal::ZERO
    }

    #[test]
    fn test_amount_band() {
        assert_eq!(amount_band(dec("49.99")), dec("45"));
        assert_eq!(amount_band(dec("50.00")), dec("50"));
        assert_eq!(amount_band(dec("54.99")), dec("50"));
        assert_eq!(amount_band(dec("1000")), dec("1000"));
        assert_eq!(amount_band(dec("3.20")), Decimal::ZERO);
    }

    #[test]
    fn test_monthly_rent_is_recurring() {
        let ledger = vec![
            Transaction::expense("rent", dec("1000"), date(2024, 1, 1)),
            Transaction::expense("rent", dec("1000"), date(2024, 2, 1)),
            Transaction::expense("rent", dec("1000"), date(2024, 3, 1)),
            Transaction::expense("rent", dec("1000"), date(2024, 4, 1)),
        ];

        let found = detect_recurring(&ledger, no_tolerance());
        assert_eq!(
            found,
            vec![RecurrenceCandidate {
                category: "rent".to_string(),
                amt_band: dec("1000"),
                count: 4,
            }]
        );
    }

    #[test]
    fn test_single_occurrence_qualifies() {
        // Known weakness of the heuristic: span floors to one month
        let ledger = vec![Transaction::expense("gadgets", dec("349"), date(2024, 6, 2))];

        let found = detect_recurring(&ledger, no_tolerance());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].category, "gadgets");
        assert_eq!(found[0].amt_band, dec("345"));
        assert_eq!(found[0].count, 1);
    }

    #[test]
    fn test_sparse_cluster_is_not_recurring() {
        // 2 occurrences across ~6 months: 2 / 6.07 < 0.8
        let ledger = vec![
            Transaction::expense("insurance", dec("400"), date(2024, 1, 1)),
            Transaction::expense("insurance", dec("400"), date(2024, 7, 1)),
        ];
        assert!(detect_recurring(&ledger, no_tolerance()).is_empty());
    }

    #[test]
    fn test_near_equal_amounts_share_a_band() {
        let ledger = vec![
            Transaction::expense("streaming", dec("15.49"), date(2024, 1, 15)),
            Transaction::expense("streaming", dec("15.99"), date(2024, 2, 15)),
            Transaction::expense("streaming", dec("17.99"), date(2024, 3, 15)),
        ];
        let found = detect_recurring(&ledger, no_tolerance());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].amt_band, dec("15"));
        assert_eq!(found[0].count, 3);
    }

    #[test]
    fn test_income_ignored() {
        let ledger = vec![
            Transaction::income("salary", dec("3000"), date(2024, 1, 1)),
            Transaction::income("salary", dec("3000"), date(2024, 2, 1)),
        ];
        assert!(detect_recurring(&ledger, no_tolerance()).is_empty());
    }

    #[test]
    fn test_sorted_by_count_then_category() {
        let ledger = vec![
            Transaction::expense("phone", dec("40"), date(2024, 1, 10)),
            Transaction::expense("phone", dec("40"), date(2024, 2, 10)),
            Transaction::expense("gym", dec("30"), date(2024, 1, 5)),
            Transaction::expense("gym", dec("30"), date(2024, 2, 5)),
            Transaction::expense("rent", dec("900"), date(2024, 1, 1)),
            Transaction::expense("rent", dec("900"), date(2024, 2, 1)),
            Transaction::expense("rent", dec("900"), date(2024, 3, 1)),
        ];
        let found = detect_recurring(&ledger, no_tolerance());
        let order: Vec<(&str, usize)> = found
            .iter()
            .map(|c| (c.category.as_str(), c.count))
            .collect();
        assert_eq!(order, vec![("rent", 3), ("gym", 2), ("phone", 2)]);
    }

    #[test]
    fn test_tolerance_has_no_effect() {
        let ledger = vec![
            Transaction::expense("coffee", dec("4.50"), date(2024, 1, 2)),
            Transaction::expense("coffee", dec("5.50"), date(2024, 1, 3)),
        ];
        assert_eq!(
            detect_recurring(&ledger, no_tolerance()),
            detect_recurring(&ledger, dec("2.50"))
        );
    }

    #[test]
    fn test_detection_is_idempotent() {
        let ledger = vec![
            Transaction::expense("rent", dec("1000"), date(2024, 1, 1)),
            Transaction::expense("gym", dec("30"), date(2024, 1, 5)),
        ];
        assert_eq!(
            detect_recurring(&ledger, no_tolerance()),
            detect_recurring(&ledger, no_tolerance())
        );
    }
}
