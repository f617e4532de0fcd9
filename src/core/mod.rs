//! Core business logic - framework-agnostic window, aggregation, storage and reporting operations.

/// Totals and per-label grouping over record collections
pub mod aggregate;
/// Import of the legacy flat JSON ledger
pub mod import;
/// Label and category operations
pub mod label;
/// Calendar windows for day, month and year views
pub mod period;
/// Record creation, partial update and window selection
pub mod record;
/// Period reports and their text rendering
pub mod report;
