//! Record business logic - Creating, updating and selecting ledger records.
//!
//! Selection is always a half-open range query over [`Window`]: a record stamped
//! exactly at `start` is included, one stamped exactly at `end` is not. Window
//! bounds are converted to UTC before querying, matching how timestamps are stored.
//! Writes reject amount text that [`parse_amount`] cannot read, so the silent
//! zero-coercion in the aggregator only ever applies to legacy rows.

use crate::{
    core::{
        aggregate::parse_amount,
        label::get_label_by_id,
        period::{Granularity, Window},
    },
    entities::{Record, record},
    errors::{Error, Result},
};
use chrono::{DateTime, TimeZone, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{debug, info, instrument};

/// Fields of a record about to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    /// When the money moved
    pub timestamp: DateTime<Utc>,
    /// Amount as decimal text
    pub amount: String,
    /// Label the record is filed under
    pub label_id: i64,
}

/// Partial update of a record. `None` fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordUpdate {
    /// New timestamp
    pub timestamp: Option<DateTime<Utc>>,
    /// New amount text
    pub amount: Option<String>,
    /// New label
    pub label_id: Option<i64>,
}

fn validated_amount(amount: &str) -> Result<String> {
    let amount = amount.trim();
    if parse_amount(amount).is_none() {
        return Err(Error::InvalidAmount {
            amount: amount.to_string(),
        });
    }
    Ok(amount.to_string())
}

async fn ensure_label_exists<C>(db: &C, label_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    if get_label_by_id(db, label_id).await?.is_none() {
        return Err(Error::LabelNotFound { id: label_id });
    }
    Ok(())
}

/// Inserts a new record after validating its amount and label.
///
/// # Errors
/// * [`Error::InvalidAmount`] if the amount is not a finite decimal
/// * [`Error::LabelNotFound`] if the label does not exist
#[instrument(skip(db))]
pub async fn create_record<C>(db: &C, new_record: NewRecord) -> Result<record::Model>
where
    C: ConnectionTrait,
{
    let amount = validated_amount(&new_record.amount)?;
    ensure_label_exists(db, new_record.label_id).await?;

    let model = record::ActiveModel {
        timestamp: Set(new_record.timestamp),
        amount: Set(amount),
        label_id: Set(new_record.label_id),
        ..Default::default()
    };

    let created = model.insert(db).await?;
    info!(id = created.id, "Created record");
    Ok(created)
}

/// Overwrites only the fields supplied in `update`.
///
/// Supplied amounts and labels are validated exactly as on insert.
#[instrument(skip(db))]
pub async fn update_record<C>(
    db: &C,
    record_id: i64,
    update: RecordUpdate,
) -> Result<record::Model>
where
    C: ConnectionTrait,
{
    let existing = get_record_by_id(db, record_id)
        .await?
        .ok_or(Error::RecordNotFound { id: record_id })?;

    let mut active: record::ActiveModel = existing.clone().into();

    if let Some(timestamp) = update.timestamp {
        active.timestamp = Set(timestamp);
    }
    if let Some(amount) = update.amount {
        active.amount = Set(validated_amount(&amount)?);
    }
    if let Some(label_id) = update.label_id {
        ensure_label_exists(db, label_id).await?;
        active.label_id = Set(label_id);
    }

    if !active.is_changed() {
        debug!("Nothing to update");
        return Ok(existing);
    }

    let updated = active.update(db).await?;
    info!(id = updated.id, "Updated record");
    Ok(updated)
}

/// Retrieves a specific record by its unique ID.
pub async fn get_record_by_id<C>(db: &C, record_id: i64) -> Result<Option<record::Model>>
where
    C: ConnectionTrait,
{
    Record::find_by_id(record_id).one(db).await.map_err(Into::into)
}

/// Retrieves records stamped inside `window`, oldest first.
///
/// When `label_id` is given only that label's records are returned.
#[instrument(skip(db, window))]
pub async fn records_in_window<C, Tz>(
    db: &C,
    window: &Window<Tz>,
    label_id: Option<i64>,
) -> Result<Vec<record::Model>>
where
    C: ConnectionTrait,
    Tz: TimeZone,
{
    let window = window.to_utc();
    debug!(start = %window.start, end = %window.end, "Selecting records");

    let mut query = Record::find()
        .filter(record::Column::Timestamp.gte(window.start))
        .filter(record::Column::Timestamp.lt(window.end));

    if let Some(label_id) = label_id {
        query = query.filter(record::Column::LabelId.eq(label_id));
    }

    query
        .order_by_asc(record::Column::Timestamp)
        .order_by_asc(record::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Records on `t`'s calendar day.
pub async fn records_by_day<C, Tz>(db: &C, t: &DateTime<Tz>) -> Result<Vec<record::Model>>
where
    C: ConnectionTrait,
    Tz: TimeZone,
{
    records_in_window(db, &Window::containing(t, Granularity::Day), None).await
}

/// Records in `t`'s calendar month.
pub async fn records_by_month<C, Tz>(db: &C, t: &DateTime<Tz>) -> Result<Vec<record::Model>>
where
    C: ConnectionTrait,
    Tz: TimeZone,
{
    records_in_window(db, &Window::containing(t, Granularity::Month), None).await
}

/// Records in `t`'s calendar year.
pub async fn records_by_year<C, Tz>(db: &C, t: &DateTime<Tz>) -> Result<Vec<record::Model>>
where
    C: ConnectionTrait,
    Tz: TimeZone,
{
    records_in_window(db, &Window::containing(t, Granularity::Year), None).await
}

/// Records filed under `label_id` in `t`'s calendar month.
pub async fn records_by_label<C, Tz>(
    db: &C,
    label_id: i64,
    t: &DateTime<Tz>,
) -> Result<Vec<record::Model>>
where
    C: ConnectionTrait,
    Tz: TimeZone,
{
    records_in_window(db, &Window::containing(t, Granularity::Month), Some(label_id)).await
}
