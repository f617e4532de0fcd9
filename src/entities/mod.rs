//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod category;
pub mod label;
pub mod record;

// Re-export specific types to avoid conflicts
pub use category::{Column as CategoryColumn, Entity as Category, Model as CategoryModel};
pub use label::{Column as LabelColumn, Entity as Label, Model as LabelModel};
pub use record::{Column as RecordColumn, Entity as Record, Model as RecordModel};
