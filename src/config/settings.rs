//! Dashboard settings loaded from a TOML file.
//!
//! Every key is optional. A missing file yields the defaults; a file that
//! exists but cannot be parsed is an error.
//!
//! ```toml
//! database_url = "sqlite://dashboard.db?mode=rwc"
//! recent_expense_limit = 20
//! currency_symbol = "₹"
//! strict_not_found = false
//! categories = ["Food", "Transport", "Other"]
//! ```

use crate::core::MissingRecord;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Settings file read when `DASHBOARD_CONFIG` is not set.
pub const DEFAULT_SETTINGS_PATH: &str = "dashboard.toml";

/// Categories offered when the settings file does not list its own.
pub const DEFAULT_CATEGORIES: [&str; 8] = [
    "Food",
    "Transport",
    "Entertainment",
    "Shopping",
    "Bills",
    "Healthcare",
    "Education",
    "Other",
];

/// Application settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Connection string; `DATABASE_URL` in the environment overrides it
    pub database_url: Option<String>,
    /// How many rows the recent-expenses list shows
    pub recent_expense_limit: u64,
    /// Prefix used when rendering amounts
    pub currency_symbol: String,
    /// Report unknown ids as errors instead of ignoring them
    pub strict_not_found: bool,
    /// Category choices offered for new expenses
    pub categories: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: None,
            recent_expense_limit: 20,
            currency_symbol: "₹".to_string(),
            strict_not_found: false,
            categories: DEFAULT_CATEGORIES.iter().map(ToString::to_string).collect(),
        }
    }
}

impl Settings {
    /// Parses settings from TOML text.
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| Error::Config {
            message: format!("Failed to parse settings: {e}"),
        })
    }

    /// Loads settings from `path`, falling back to defaults when the file is absent.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!("No settings file at {:?}, using defaults.", path);
            return Ok(Self::default());
        }
        debug!("Loading settings from {:?}", path);
        let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("Failed to read settings file {}: {e}", path.display()),
        })?;
        Self::from_toml(&contents)
    }

    /// Loads settings from `DASHBOARD_CONFIG`, or [`DEFAULT_SETTINGS_PATH`].
    pub fn load_default() -> Result<Self> {
        let path =
            std::env::var("DASHBOARD_CONFIG").unwrap_or_else(|_| DEFAULT_SETTINGS_PATH.to_string());
        Self::load(path)
    }

    /// Missing-record policy the services should run with.
    #[must_use]
    pub const fn missing_record(&self) -> MissingRecord {
        if self.strict_not_found {
            MissingRecord::Reject
        } else {
            MissingRecord::Ignore
        }
    }
}
