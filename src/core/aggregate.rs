//! Totals and per-label grouping over record collections.
//!
//! These functions never fail. Amount text that does not parse as a finite
//! decimal contributes zero, and an empty collection sums to zero. Writes are
//! validated in [`crate::core::record`], so unparsable amounts only show up
//! here for rows that predate that check.

use crate::entities::record;
use std::collections::BTreeMap;

/// Parses amount text as a finite decimal number.
///
/// Returns `None` for anything else, including `"NaN"` and `"inf"`.
#[must_use]
pub fn parse_amount(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|amount| amount.is_finite())
}

/// Sums the amounts of `records`, counting unparsable amounts as zero.
#[must_use]
pub fn total_amount(records: &[record::Model]) -> f64 {
    records
        .iter()
        .map(|r| parse_amount(&r.amount).unwrap_or(0.0))
        .fold(0.0, |total, amount| total + amount)
}

/// Partitions `records` by label, keeping input order inside each group.
#[must_use]
pub fn group_by_label(records: &[record::Model]) -> BTreeMap<i64, Vec<record::Model>> {
    let mut groups: BTreeMap<i64, Vec<record::Model>> = BTreeMap::new();
    for r in records {
        groups.entry(r.label_id).or_default().push(r.clone());
    }
    groups
}

/// Total amount of each group produced by [`group_by_label`].
#[must_use]
pub fn total_amount_by_label(grouped: &BTreeMap<i64, Vec<record::Model>>) -> BTreeMap<i64, f64> {
    grouped
        .iter()
        .map(|(label_id, records)| (*label_id, total_amount(records)))
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    #![allow(clippy::unwrap_used)]
    use super::*;
    use chrono::{DateTime, Utc};

    fn record(id: i64, day: &str, amount: &str, label_id: i64) -> record::Model {
        record::Model {
            id,
            timestamp: DateTime::parse_from_rfc3339(&format!("{day}T00:00:00Z"))
                .unwrap()
                .with_timezone(&Utc),
            amount: amount.to_string(),
            label_id,
        }
    }

    fn sample_records() -> Vec<record::Model> {
        vec![
            record(1, "2016-10-07", "1000.0", 1),
            record(2, "2016-10-08", "1000.0", 2),
        ]
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1000.0"), Some(1000.0));
        assert_eq!(parse_amount("-12.5"), Some(-12.5));
        assert_eq!(parse_amount("2000"), Some(2000.0));
        assert_eq!(parse_amount("1e3"), Some(1000.0));
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("ten"), None);
        assert_eq!(parse_amount("1,000"), None);
        assert_eq!(parse_amount("NaN"), None);
        assert_eq!(parse_amount("inf"), None);
    }

    #[test]
    fn test_total_amount() {
        assert_eq!(total_amount(&sample_records()), 2000.0);
    }

    #[test]
    fn test_total_amount_empty_is_zero() {
        let total = total_amount(&[]);
        assert_eq!(total, 0.0);
        assert!(!total.is_sign_negative());
    }

    #[test]
    fn test_total_amount_treats_unparsable_as_zero() {
        let records = vec![
            record(1, "2016-10-07", "1000", 1),
            record(2, "2016-10-07", "oops", 1),
            record(3, "2016-10-07", "-250.5", 2),
            record(4, "2016-10-07", "", 2),
        ];
        assert_eq!(total_amount(&records), 749.5);
    }

    #[test]
    fn test_group_by_label_empty() {
        assert!(group_by_label(&[]).is_empty());
        assert!(total_amount_by_label(&group_by_label(&[])).is_empty());
    }

    #[test]
    fn test_group_by_label_one_per_label() {
        let grouped = group_by_label(&sample_records());
        assert_eq!(grouped.len(), 2);
        for group in grouped.values() {
            assert_eq!(group.len(), 1);
        }
    }

    #[test]
    fn test_group_by_label_partitions_and_keeps_order() {
        let records = vec![
            record(1, "2016-10-01", "10", 7),
            record(2, "2016-10-02", "20", 3),
            record(3, "2016-10-03", "30", 7),
            record(4, "2016-10-04", "40", 3),
            record(5, "2016-10-05", "50", 9),
        ];
        let grouped = group_by_label(&records);

        let ids = |label_id: i64| -> Vec<i64> { grouped[&label_id].iter().map(|r| r.id).collect() };
        assert_eq!(ids(7), vec![1, 3]);
        assert_eq!(ids(3), vec![2, 4]);
        assert_eq!(ids(9), vec![5]);

        let count: usize = grouped.values().map(Vec::len).sum();
        assert_eq!(count, records.len());
        for (label_id, group) in &grouped {
            assert!(group.iter().all(|r| r.label_id == *label_id));
        }
    }

    #[test]
    fn test_totals_by_label_add_up_to_total() {
        let records = vec![
            record(1, "2016-10-01", "12.25", 1),
            record(2, "2016-10-02", "7.75", 2),
            record(3, "2016-10-03", "100", 1),
            record(4, "2016-10-04", "-20", 3),
        ];
        let totals = total_amount_by_label(&group_by_label(&records));

        assert_eq!(totals[&1], 112.25);
        assert_eq!(totals[&2], 7.75);
        assert_eq!(totals[&3], -20.0);
        assert_eq!(totals.values().sum::<f64>(), total_amount(&records));
    }
}
