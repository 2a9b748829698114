//! Indicator definitions.
//!
//! The dashboard tracks three fixed indicators. Each carries the static
//! metadata the rest of the crate needs: the snapshot file it is read from,
//! the metric field holding its value, its display unit and the direction in
//! which a change is considered favourable.
//!
//! | Indicator | File | Metric | Unit |
//! |---|---|---|---|
//! | [`Indicator::Co2`] | `co2_monthly.json` | `average` | ppm |
//! | [`Indicator::Temperature`] | `temperature_anomaly.json` | `anomaly` | °C |
//! | [`Indicator::SeaIce`] | `sea_ice_extent.json` | `extent` | Mio. km² |

use crate::errors::DashboardError;
use serde::{Deserialize, Serialize};

/// One of the three tracked climate metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    /// Monthly mean CO2 concentration at Mauna Loa.
    Co2,
    /// Monthly global surface temperature anomaly.
    Temperature,
    /// Monthly mean Arctic sea-ice extent.
    SeaIce,
}

/// Which way a rising value should be judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// An increase is unfavourable (e.g. CO2).
    HigherIsWorse,
    /// An increase is favourable (e.g. sea-ice extent).
    HigherIsBetter,
    /// The sign itself is the displayed information; no judgement is made.
    Undirected,
}

/// Comparison point used for the headline KPI delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaMode {
    /// Latest observation against the same month one year earlier.
    YearOverYear,
    /// Latest observation against the document's per-month median table.
    MedianTable,
}

impl Indicator {
    /// All indicators in display order.
    pub const ALL: [Indicator; 3] = [Indicator::Co2, Indicator::Temperature, Indicator::SeaIce];

    /// Snapshot file name written by the fetcher.
    pub fn file_name(&self) -> &'static str {
        match self {
            Indicator::Co2 => "co2_monthly.json",
            Indicator::Temperature => "temperature_anomaly.json",
            Indicator::SeaIce => "sea_ice_extent.json",
        }
    }

    /// Name of the metric field inside each data point.
    pub fn metric_field(&self) -> &'static str {
        match self {
            Indicator::Co2 => "average",
            Indicator::Temperature => "anomaly",
            Indicator::SeaIce => "extent",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Indicator::Co2 => "ppm",
            Indicator::Temperature => "°C",
            Indicator::SeaIce => "Mio. km²",
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            Indicator::Co2 => Direction::HigherIsWorse,
            Indicator::Temperature => Direction::Undirected,
            Indicator::SeaIce => Direction::HigherIsBetter,
        }
    }

    pub fn delta_mode(&self) -> DeltaMode {
        match self {
            Indicator::Co2 | Indicator::Temperature => DeltaMode::YearOverYear,
            Indicator::SeaIce => DeltaMode::MedianTable,
        }
    }

    /// Decimal places used for both the current value and the delta.
    pub fn precision(&self) -> usize {
        2
    }

    /// Anomalies are shown with an explicit sign.
    pub fn signed_value(&self) -> bool {
        matches!(self, Indicator::Temperature)
    }

    /// Short machine-friendly name, also used for output file names.
    pub fn slug(&self) -> &'static str {
        match self {
            Indicator::Co2 => "co2",
            Indicator::Temperature => "temperature",
            Indicator::SeaIce => "sea_ice",
        }
    }
}

impl std::str::FromStr for Indicator {
    type Err = DashboardError;

    /// Accepts the slug (`co2`, `temperature`, `sea_ice`) in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Indicator::ALL
            .into_iter()
            .find(|i| i.slug().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DashboardError::Error(format!("Unknown indicator {:?}", s)))
    }
}

impl std::fmt::Display for Indicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Indicator::Co2 => write!(f, "CO2"),
            Indicator::Temperature => write!(f, "Temperature"),
            Indicator::SeaIce => write!(f, "Sea Ice"),
        }
    }
}
