/// Database configuration and connection management
pub mod database;

/// Ledger settings loaded from `ledger.toml`
pub mod settings;
