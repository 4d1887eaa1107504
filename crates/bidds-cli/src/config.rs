//! Conversion defaults read from a TOML file.
//!
//! ```toml
//! resolution_minutes = 5
//! horizon = 288
//!
//! [signals]
//! capacity = "max_active_power"
//! requirement = "requirement"
//! ```
//!
//! Every key is optional; command-line flags win over file values.

use std::path::Path;

use anyhow::{Context, Result};
use bidds_io::{SeriesSignals, TimeSeriesOptions};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiddsConfig {
    /// Series resolution in minutes
    pub resolution_minutes: u32,
    /// Number of intervals per document
    pub horizon: usize,
    /// Reuse the system cache when present
    pub reuse: bool,
    pub signals: SeriesSignals,
}

impl Default for BiddsConfig {
    fn default() -> Self {
        let series = TimeSeriesOptions::default();
        Self {
            resolution_minutes: series.resolution_minutes,
            horizon: series.steps,
            reuse: false,
            signals: series.signals,
        }
    }
}

impl BiddsConfig {
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config '{}'", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("parsing config '{}'", path.display()))
    }

    /// File values, or the defaults when no file was given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => Ok(Self::default()),
        }
    }
}
