//! Ledger settings loaded from `ledger.toml`
//!
//! The settings file is optional. When it is missing every field falls back
//! to its default, so a fresh checkout works without any configuration.
//!
//! ```toml
//! utc_offset = "+09:00"
//! currency_symbol = "₩"
//! ```

use crate::errors::{Error, Result};
use chrono::{FixedOffset, Offset, Utc};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Default settings file name, looked up in the working directory.
pub const DEFAULT_SETTINGS_PATH: &str = "ledger.toml";

/// Settings file as written on disk
#[derive(Debug, Deserialize)]
struct RawSettings {
    #[serde(default = "default_utc_offset")]
    utc_offset: String,
    #[serde(default = "default_currency_symbol")]
    currency_symbol: String,
}

fn default_utc_offset() -> String {
    "+00:00".to_string()
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

/// Validated ledger settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Offset in which dates given on the command line are interpreted
    pub utc_offset: FixedOffset,
    /// Symbol printed in front of amounts in reports
    pub currency_symbol: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            utc_offset: Utc.fix(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

/// Parses settings from TOML text.
///
/// # Errors
/// Returns [`Error::Config`] when the TOML is malformed or `utc_offset` is not
/// of the form `+HH:MM`.
pub fn parse_settings(contents: &str) -> Result<Settings> {
    let raw: RawSettings = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse settings: {e}"),
    })?;

    let utc_offset = raw
        .utc_offset
        .parse::<FixedOffset>()
        .map_err(|e| Error::Config {
            message: format!("Invalid utc_offset {:?}: {e}", raw.utc_offset),
        })?;

    Ok(Settings {
        utc_offset,
        currency_symbol: raw.currency_symbol,
    })
}

/// Loads settings from a TOML file, falling back to defaults if it does not exist.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    if !path.exists() {
        info!("No settings file at {:?}, using defaults", path);
        return Ok(Settings::default());
    }

    debug!("Loading settings from {:?}", path);
    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read settings file {path:?}: {e}"),
    })?;
    parse_settings(&contents)
}

/// Loads settings from `LEDGER_CONFIG`, or `ledger.toml` when that is unset.
pub fn load_default_settings() -> Result<Settings> {
    let path = std::env::var("LEDGER_CONFIG").unwrap_or_else(|_| DEFAULT_SETTINGS_PATH.to_string());
    load_settings(path)
}
