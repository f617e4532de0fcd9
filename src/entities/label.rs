//! Label entity - A spending category tag attached to records.
//!
//! Labels may optionally be grouped under a [`super::category`].

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Label database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "labels")]
pub struct Model {
    /// Unique identifier for the label
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (e.g., "Food", "Study")
    pub name: String,
    /// Optional second-level grouping
    pub category_id: Option<i64>,
}

/// Defines relationships between Label and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One label has many records
    #[sea_orm(has_many = "super::record::Entity")]
    Records,
    /// A label may belong to one category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
}

impl Related<super::record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Records.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
