//! Record entity - A single ledger entry.
//!
//! Each record has a `timestamp` (stored in UTC), an `amount` kept as decimal
//! text exactly as entered, and the `label_id` of the label it is filed under.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Record database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "records")]
pub struct Model {
    /// Unique identifier assigned by storage
    #[sea_orm(primary_key)]
    pub id: i64,
    /// When the money moved
    pub timestamp: DateTimeUtc,
    /// Amount as decimal text (e.g. `"1000.0"`, `"-12.50"`)
    pub amount: String,
    /// ID of the label this record is filed under
    pub label_id: i64,
}

/// Defines relationships between Record and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each record belongs to one label
    #[sea_orm(
        belongs_to = "super::label::Entity",
        from = "Column::LabelId",
        to = "super::label::Column::Id"
    )]
    Label,
}

impl Related<super::label::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Label.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
