//! LLC seed configuration loading from config.toml
//!
//! The LLCs listed in config.toml are created on `init` when missing, so a fresh
//! database starts out with the operation's ownership entities in place.

use crate::errors::{Error, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct Config {
    /// LLCs to seed
    #[serde(default)]
    pub llcs: Vec<LlcConfig>,
}

/// Configuration for a single LLC
#[derive(Debug, Deserialize, Clone)]
pub struct LlcConfig {
    /// Legal name
    pub name: String,
    /// Date the LLC was created, as a quoted "YYYY-MM-DD" string
    pub creation_date: NaiveDate,
    /// Whether this year's filing is already done
    #[serde(default)]
    pub filing_current: bool,
}

/// Loads LLC configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}
