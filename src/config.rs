//! Tunables for the chart engine.
//!
//! Every field has a default, so an empty TOML document is a valid config.
//!
//! ```
//! use sizhu::Config;
//!
//! let config = Config::from_toml_str("strict_city = true").unwrap();
//! assert!(config.strict_city);
//! assert_eq!(3.0, config.solar_term_tolerance_days);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Days around a solar term within which the month pillar is flagged.
    pub solar_term_tolerance_days: f64,
    /// Hours around a double-hour edge within which the hour pillar is flagged.
    pub hour_boundary_tolerance_hours: f64,
    /// True solar time corrections at or above this many minutes are reported.
    pub correction_warning_minutes: f64,
    /// Reject unknown city names instead of skipping the correction.
    pub strict_city: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            solar_term_tolerance_days: 3.0,
            hour_boundary_tolerance_hours: 0.5,
            correction_warning_minutes: 5.0,
            strict_city: false,
        }
    }
}

impl Config {
    /// Parses a config from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Loads a config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
