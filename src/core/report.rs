//! Report generation business logic.
//!
//! This module turns the records of one calendar window into a [`PeriodReport`]:
//! the records themselves, their total, a per-label breakdown and the starts of
//! the neighbouring periods. Formatting helpers render it as plain text.

use crate::{
    core::{
        aggregate::{group_by_label, parse_amount, total_amount, total_amount_by_label},
        label::{get_label_by_id, get_labels_by_ids},
        period::{Granularity, Window},
        record::records_in_window,
    },
    entities::{label, record},
    errors::{Error, Result},
};
use chrono::{DateTime, FixedOffset};
use sea_orm::ConnectionTrait;
use std::fmt::Write as _;

/// Sum and size of one label's records inside a report window.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelTotal {
    /// Label identifier
    pub label_id: i64,
    /// Label name, or `#<id>` when the label no longer exists
    pub name: String,
    /// Number of records
    pub count: usize,
    /// Sum of the records' amounts
    pub total: f64,
}

/// Everything a day, month or year view shows.
#[derive(Debug, Clone)]
pub struct PeriodReport {
    /// Period covered by the report
    pub window: Window<FixedOffset>,
    /// Records in the window, oldest first
    pub records: Vec<record::Model>,
    /// Sum of all amounts
    pub total: f64,
    /// Per-label totals, largest first
    pub labels: Vec<LabelTotal>,
    /// Start of the previous period
    pub prev_start: DateTime<FixedOffset>,
    /// Start of the next period
    pub next_start: DateTime<FixedOffset>,
}

impl PeriodReport {
    /// Display name of the label with id `label_id`.
    #[must_use]
    pub fn label_name(&self, label_id: i64) -> String {
        self.labels
            .iter()
            .find(|l| l.label_id == label_id)
            .map_or_else(|| format!("#{label_id}"), |l| l.name.clone())
    }
}

/// Builds a report from records already selected for `window`.
///
/// `labels` only needs to contain the labels referenced by `records`; any
/// missing one is shown as `#<id>`.
#[must_use]
pub fn summarize(
    window: Window<FixedOffset>,
    records: Vec<record::Model>,
    labels: &[label::Model],
) -> PeriodReport {
    let grouped = group_by_label(&records);
    let totals = total_amount_by_label(&grouped);

    let mut label_totals: Vec<LabelTotal> = grouped
        .iter()
        .map(|(label_id, group)| LabelTotal {
            label_id: *label_id,
            name: labels
                .iter()
                .find(|l| l.id == *label_id)
                .map_or_else(|| format!("#{label_id}"), |l| l.name.clone()),
            count: group.len(),
            total: totals.get(label_id).copied().unwrap_or(0.0),
        })
        .collect();
    label_totals.sort_by(|a, b| b.total.total_cmp(&a.total).then_with(|| a.name.cmp(&b.name)));

    PeriodReport {
        total: total_amount(&records),
        prev_start: window.prev().start,
        next_start: window.next().start,
        window,
        records,
        labels: label_totals,
    }
}

async fn build_report<C>(
    db: &C,
    window: Window<FixedOffset>,
    label_id: Option<i64>,
) -> Result<PeriodReport>
where
    C: ConnectionTrait,
{
    let records = records_in_window(db, &window, label_id).await?;

    let mut label_ids: Vec<i64> = records.iter().map(|r| r.label_id).collect();
    label_ids.sort_unstable();
    label_ids.dedup();
    let labels = get_labels_by_ids(db, &label_ids).await?;

    Ok(summarize(window, records, &labels))
}

/// Generates the day, month or year report for the period containing `t`.
pub async fn generate_period_report<C>(
    db: &C,
    granularity: Granularity,
    t: &DateTime<FixedOffset>,
) -> Result<PeriodReport>
where
    C: ConnectionTrait,
{
    build_report(db, Window::containing(t, granularity), None).await
}

/// Generates the report for one label over the month containing `t`.
///
/// # Returns
/// The label together with its report.
///
/// # Errors
/// Returns [`Error::LabelNotFound`] if the label does not exist.
pub async fn generate_label_report<C>(
    db: &C,
    label_id: i64,
    t: &DateTime<FixedOffset>,
) -> Result<(label::Model, PeriodReport)>
where
    C: ConnectionTrait,
{
    let label = get_label_by_id(db, label_id)
        .await?
        .ok_or(Error::LabelNotFound { id: label_id })?;
    let window = Window::containing(t, Granularity::Month);
    let report = build_report(db, window, Some(label_id)).await?;
    Ok((label, report))
}

/// Formats an amount with the currency symbol and two decimals.
///
/// # Returns
/// Formatted string like `"$1000.00"` or `"-$25.50"`
#[must_use]
pub fn format_amount(amount: f64, symbol: &str) -> String {
    // Negative zero and amounts that round to zero print without a sign
    let cents = (amount * 100.0).round();
    if cents < 0.0 {
        format!("-{symbol}{:.2}", amount.abs())
    } else {
        format!("{symbol}{:.2}", amount.abs())
    }
}

/// Short name of the period starting at `start`: `2016-10-07`, `2016-10` or `2016`.
#[must_use]
pub fn format_period(start: &DateTime<FixedOffset>, granularity: Granularity) -> String {
    let pattern = match granularity {
        Granularity::Day => "%Y-%m-%d",
        Granularity::Month => "%Y-%m",
        Granularity::Year => "%Y",
    };
    start.format(pattern).to_string()
}

/// Renders a report as plain text.
#[must_use]
pub fn render_report(report: &PeriodReport, symbol: &str) -> String {
    let granularity = report.window.granularity;
    let offset = report.window.start.timezone();
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(
        out,
        "{} {}  (prev {}, next {})",
        granularity,
        format_period(&report.window.start, granularity),
        format_period(&report.prev_start, granularity),
        format_period(&report.next_start, granularity),
    );

    if report.records.is_empty() {
        let _ = writeln!(out, "\nNo records.");
    } else {
        let _ = writeln!(out);
        for r in &report.records {
            let amount = parse_amount(&r.amount)
                .map_or_else(|| format!("{:?}", r.amount), |a| format_amount(a, symbol));
            let _ = writeln!(
                out,
                "{:>6}  {}  {:<16} {:>14}",
                r.id,
                r.timestamp.with_timezone(&offset).format("%Y-%m-%d %H:%M"),
                report.label_name(r.label_id),
                amount,
            );
        }

        let _ = writeln!(out, "\nBy label:");
        for l in &report.labels {
            let _ = writeln!(
                out,
                "  {:<16} {:>4}  {:>14}",
                l.name,
                l.count,
                format_amount(l.total, symbol)
            );
        }
    }

    let _ = writeln!(out, "\nTotal: {}", format_amount(report.total, symbol));
    out
}
