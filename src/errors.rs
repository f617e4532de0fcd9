//! Unified error type for the ledger.
//!
//! Storage failures are wrapped transparently; validation failures carry the
//! offending input so callers can show it back to the user.

use thiserror::Error;

/// Every error the ledger can surface.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or is invalid
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Amount text that is not a finite decimal number
    #[error("Invalid amount: {amount:?}")]
    InvalidAmount {
        /// The rejected amount text
        amount: String,
    },

    /// Date or period text that could not be parsed
    #[error("Invalid date: {input:?} (expected YYYY-MM-DD, YYYY-MM or YYYY)")]
    InvalidDate {
        /// The rejected date text
        input: String,
    },

    /// No record with this identifier
    #[error("Record not found: {id}")]
    RecordNotFound {
        /// Record identifier
        id: i64,
    },

    /// No label with this identifier
    #[error("Label not found: {id}")]
    LabelNotFound {
        /// Label identifier
        id: i64,
    },

    /// No category with this identifier
    #[error("Category not found: {id}")]
    CategoryNotFound {
        /// Category identifier
        id: i64,
    },

    /// Legacy JSON ledger could not be read
    #[error("Import error: {message}")]
    Import {
        /// What went wrong
        message: String,
    },

    /// Storage layer failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
