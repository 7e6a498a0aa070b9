// ⚙️ Configuration
//
// Defaults reproduce the reference behaviour. A JSON file can override any
// field; LIBRARY_LENDING_TODAY pins the wall-clock date for reproducible runs.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Environment variable naming an optional JSON config file
pub const CONFIG_ENV: &str = "LIBRARY_LENDING_CONFIG";

/// Environment variable overriding "today" (same format as command dates)
pub const TODAY_ENV: &str = "LIBRARY_LENDING_TODAY";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LendingConfig {
    /// Field delimiter of all three input files
    pub delimiter: char,

    /// chrono format of command dates and report dates
    pub date_format: String,

    /// Added to a member's balance for every loan the sweep evicts
    pub penalty_increment: u32,

    /// Balance at which borrowing is refused until payment
    pub penalty_block_threshold: u32,

    /// Fixed "today" for the overdue sweep; None means the local clock
    pub today: Option<NaiveDate>,
}

impl Default for LendingConfig {
    fn default() -> Self {
        LendingConfig {
            delimiter: ',',
            date_format: "%d/%m/%Y".to_string(),
            penalty_increment: 2,
            penalty_block_threshold: 6,
            today: None,
        }
    }
}

impl LendingConfig {
    /// Load config from a JSON file; missing fields take their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Defaults, then the file named by LIBRARY_LENDING_CONFIG, then LIBRARY_LENDING_TODAY
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Ok(today) = std::env::var(TODAY_ENV) {
            let date = NaiveDate::parse_from_str(today.trim(), &config.date_format)
                .with_context(|| format!("{} is not a valid date: {}", TODAY_ENV, today))?;
            config.today = Some(date);
        }

        Ok(config)
    }

    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// The delimiter as the single byte the csv reader expects
    pub fn delimiter_byte(&self) -> Result<u8> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .with_context(|| format!("Delimiter must be a single ASCII character: {:?}", self.delimiter))
    }
}

// ============================================================================
// TESTS
// ============================================================================
