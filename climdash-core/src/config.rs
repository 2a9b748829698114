//! Dashboard configuration
//!
//! Read from TOML. Every field has a default so an empty file, or no file at
//! all, gives a working configuration:
//!
//! ```toml
//! data_dir = "data"
//! years_displayed = 5
//!
//! [co2]
//! reference_window = { start = 1991, end = 2020 }
//!
//! [sea_ice]
//! median_window = { start = 1981, end = 2010 }
//!
//! [temperature]
//! max_points = 360
//! ```

use crate::aggregate::YearWindow;
use crate::errors::{DashboardError, DashboardResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level dashboard configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Directory holding the three snapshot files.
    ///
    /// Default: `data`
    pub data_dir: PathBuf,

    /// Number of most recent years overlaid on the monthly charts.
    ///
    /// Default: 5
    pub years_displayed: usize,

    pub co2: Co2Config,
    pub sea_ice: SeaIceConfig,
    pub temperature: TemperatureConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            years_displayed: 5,
            co2: Co2Config::default(),
            sea_ice: SeaIceConfig::default(),
            temperature: TemperatureConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Co2Config {
    /// Years averaged into the CO2 reference curve.
    ///
    /// Default: 1991-2020
    pub reference_window: YearWindow,
}

impl Default for Co2Config {
    fn default() -> Self {
        Self {
            reference_window: YearWindow {
                start: 1991,
                end: 2020,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeaIceConfig {
    /// Years used to derive a median curve when the snapshot has no median table.
    ///
    /// Default: 1981-2010
    pub median_window: YearWindow,
}

impl Default for SeaIceConfig {
    fn default() -> Self {
        Self {
            median_window: YearWindow {
                start: 1981,
                end: 2010,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemperatureConfig {
    /// Most recent observations shown on the anomaly timeline.
    ///
    /// Default: 360 (thirty years of monthly values)
    pub max_points: usize,
}

impl Default for TemperatureConfig {
    fn default() -> Self {
        Self { max_points: 360 }
    }
}

impl DashboardConfig {
    /// Parse a configuration from TOML text and validate it.
    pub fn from_toml_str(contents: &str) -> DashboardResult<Self> {
        let config: DashboardConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a configuration file.
    pub fn from_file(path: &Path) -> DashboardResult<Self> {
        let contents = fs::read_to_string(path).map_err(|source| DashboardError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Check the year windows.
    pub fn validate(&self) -> DashboardResult<()> {
        for window in [self.co2.reference_window, self.sea_ice.median_window] {
            YearWindow::new(window.start, window.end)?;
        }
        Ok(())
    }
}
