//! Import of the legacy flat-file ledger.
//!
//! Before records lived in a database they were kept in a single JSON array:
//!
//! ```json
//! [{ "Time": "2016-10-07T00:00:00+09:00", "Amount": "1000", "Kind": "Food" }]
//! ```
//!
//! Each distinct `Kind` becomes a label (reusing an existing label with the same
//! name) and each entry becomes a record. The import runs in one database
//! transaction, so a single bad entry leaves the ledger untouched.

use crate::{
    core::{
        label::find_or_create_label,
        record::{NewRecord, create_record},
    },
    errors::{Error, Result},
};
use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use serde::Deserialize;
use std::{collections::HashMap, path::Path};
use tracing::{info, instrument, warn};

/// Label given to legacy entries whose `Kind` is blank.
pub const UNLABELED: &str = "Unlabeled";

/// One entry of the legacy JSON ledger.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LegacyRecord {
    /// RFC 3339 timestamp
    pub time: DateTime<FixedOffset>,
    /// Amount text
    pub amount: String,
    /// Free-form category name
    #[serde(default)]
    pub kind: String,
}

/// Parses the legacy JSON array.
///
/// # Errors
/// Returns [`Error::Import`] when the text is not a JSON array of entries.
pub fn parse_legacy_records(json: &str) -> Result<Vec<LegacyRecord>> {
    serde_json::from_str(json).map_err(|e| Error::Import {
        message: format!("Malformed legacy ledger: {e}"),
    })
}

/// Reads and parses a legacy ledger file.
pub fn load_legacy_file<P: AsRef<Path>>(path: P) -> Result<Vec<LegacyRecord>> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    parse_legacy_records(&contents)
}

async fn insert_all(txn: &DatabaseTransaction, records: &[LegacyRecord]) -> Result<usize> {
    let mut label_ids: HashMap<String, i64> = HashMap::new();

    for legacy in records {
        let kind = match legacy.kind.trim() {
            "" => UNLABELED,
            kind => kind,
        };

        let label_id = if let Some(id) = label_ids.get(kind) {
            *id
        } else {
            let label = find_or_create_label(txn, kind).await?;
            label_ids.insert(kind.to_string(), label.id);
            label.id
        };

        create_record(
            txn,
            NewRecord {
                timestamp: legacy.time.with_timezone(&Utc),
                amount: legacy.amount.clone(),
                label_id,
            },
        )
        .await?;
    }

    Ok(records.len())
}

/// Inserts every legacy entry, creating labels as needed.
///
/// # Returns
/// The number of records inserted.
///
/// # Errors
/// Any invalid entry (e.g. an unparsable amount) aborts the import and rolls
/// back everything inserted so far.
#[instrument(skip(db, records), fields(count = records.len()))]
pub async fn import_legacy_records(
    db: &DatabaseConnection,
    records: &[LegacyRecord],
) -> Result<usize> {
    let txn = db.begin().await?;

    match insert_all(&txn, records).await {
        Ok(count) => {
            txn.commit().await?;
            info!(count, "Imported legacy records");
            Ok(count)
        }
        Err(e) => {
            warn!("Import failed, rolling back: {}", e);
            txn.rollback().await?;
            Err(e)
        }
    }
}
