//! Command-line interface - argument definitions and command dispatch.
//!
//! Each subcommand maps onto one view or write of the ledger. [`run`] returns
//! the text to print so commands can be exercised without a terminal.

use crate::{
    config::settings::Settings,
    core::{
        aggregate::parse_amount,
        import::{import_legacy_records, load_legacy_file},
        label::{create_category, create_label, get_all_labels},
        period::{Granularity, parse_day, parse_month, parse_period, parse_year},
        record::{NewRecord, RecordUpdate, create_record, update_record},
        report::{format_amount, generate_label_report, generate_period_report, render_report},
    },
    errors::{Error, Result},
};
use chrono::{DateTime, FixedOffset, Utc};
use clap::{Parser, Subcommand};
use sea_orm::DatabaseConnection;
use std::{fmt::Write as _, path::PathBuf};
use tracing::instrument;

/// Parsed command line
#[derive(Debug, Parser)]
#[command(name = "ledger-buddy", about = "Personal ledger with day, month and year views.")]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Ledger subcommands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show one day's records (YYYY-MM-DD).
    Day {
        /// Day to show
        date: String,
    },
    /// Show one month's records (YYYY-MM).
    Month {
        /// Month to show
        month: String,
    },
    /// Show one year's records (YYYY).
    Year {
        /// Year to show
        year: String,
    },
    /// Show one label's records for a month.
    Label {
        /// Label ID
        id: i64,
        /// Any day, month or year inside the month to show (default: now)
        #[arg(long)]
        date: Option<String>,
    },
    /// List all labels.
    Labels,
    /// Create a label.
    AddLabel {
        /// Label name
        name: String,
        /// Category ID to group the label under
        #[arg(long)]
        category: Option<i64>,
    },
    /// Create a category.
    AddCategory {
        /// Category name
        name: String,
    },
    /// Record a new transaction.
    Insert {
        /// YYYY-MM-DD or a full RFC 3339 timestamp
        #[arg(long)]
        date: String,
        /// Decimal amount, negative for refunds
        #[arg(long, allow_hyphen_values = true)]
        amount: String,
        /// Label ID
        #[arg(long)]
        label: i64,
    },
    /// Change some fields of an existing record.
    Update {
        /// Record ID
        id: i64,
        /// New date or RFC 3339 timestamp
        #[arg(long)]
        date: Option<String>,
        /// New decimal amount
        #[arg(long, allow_hyphen_values = true)]
        amount: Option<String>,
        /// New label ID
        #[arg(long)]
        label: Option<i64>,
    },
    /// Import a legacy records.json file.
    Import {
        /// Path to the JSON file
        file: PathBuf,
    },
}

/// Parses a full RFC 3339 timestamp, or a bare day taken as midnight at `offset`.
fn parse_timestamp(input: &str, offset: FixedOffset) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(input)
        .or_else(|_| parse_day(input, offset))
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| Error::InvalidDate {
            input: input.to_string(),
        })
}

/// Executes one command against `db` and returns its output.
#[instrument(skip(db, settings))]
pub async fn run(
    command: Commands,
    db: &DatabaseConnection,
    settings: &Settings,
) -> Result<String> {
    let offset = settings.utc_offset;
    let symbol = settings.currency_symbol.as_str();

    match command {
        Commands::Day { date } => {
            let t = parse_day(&date, offset)?;
            let report = generate_period_report(db, Granularity::Day, &t).await?;
            Ok(render_report(&report, symbol))
        }
        Commands::Month { month } => {
            let t = parse_month(&month, offset)?;
            let report = generate_period_report(db, Granularity::Month, &t).await?;
            Ok(render_report(&report, symbol))
        }
        Commands::Year { year } => {
            let t = parse_year(&year, offset)?;
            let report = generate_period_report(db, Granularity::Year, &t).await?;
            Ok(render_report(&report, symbol))
        }
        Commands::Label { id, date } => {
            let t = match date {
                Some(date) => parse_period(&date, offset)?.start,
                None => Utc::now().with_timezone(&offset),
            };
            let (label, report) = generate_label_report(db, id, &t).await?;
            Ok(format!("label {}\n{}", label.name, render_report(&report, symbol)))
        }
        Commands::Labels => {
            let mut out = String::new();
            for label in get_all_labels(db).await? {
                let _ = writeln!(out, "{:>6}  {}", label.id, label.name);
            }
            Ok(out)
        }
        Commands::AddLabel { name, category } => {
            let label = create_label(db, &name, category).await?;
            Ok(format!("Created label {} ({})\n", label.id, label.name))
        }
        Commands::AddCategory { name } => {
            let category = create_category(db, &name).await?;
            Ok(format!("Created category {} ({})\n", category.id, category.name))
        }
        Commands::Insert {
            date,
            amount,
            label,
        } => {
            let record = create_record(
                db,
                NewRecord {
                    timestamp: parse_timestamp(&date, offset)?,
                    amount,
                    label_id: label,
                },
            )
            .await?;
            Ok(format!("Created record {}\n", record.id))
        }
        Commands::Update {
            id,
            date,
            amount,
            label,
        } => {
            let update = RecordUpdate {
                timestamp: date.map(|d| parse_timestamp(&d, offset)).transpose()?,
                amount,
                label_id: label,
            };
            let record = update_record(db, id, update).await?;
            let amount = parse_amount(&record.amount).unwrap_or(0.0);
            Ok(format!(
                "Updated record {}: {} {} label {}\n",
                record.id,
                record.timestamp.with_timezone(&offset).format("%Y-%m-%d %H:%M"),
                format_amount(amount, symbol),
                record.label_id
            ))
        }
        Commands::Import { file } => {
            let records = load_legacy_file(&file)?;
            let count = import_legacy_records(db, &records).await?;
            Ok(format!("Imported {count} records from {}\n", file.display()))
        }
    }
}
