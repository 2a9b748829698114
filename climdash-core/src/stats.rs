//! KPI tiles.
//!
//! Turns a [`KpiDelta`] into display strings and a favourable/unfavourable
//! judgement. Formatting never fails: a missing value or an unavailable
//! comparison renders as [`PLACEHOLDER`].

use crate::aggregate::{Comparison, KpiDelta};
use crate::indicator::{Direction, Indicator};
use serde::{Deserialize, Serialize};

/// Text shown in place of a missing number.
pub const PLACEHOLDER: &str = "--";

/// Judgement of a delta's sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Favorable,
    Unfavorable,
    /// No judgement: undirected indicator, zero delta or no comparison.
    Neutral,
}

impl Classification {
    /// Classify a `current - reference` delta under `direction`.
    pub fn of(delta: f64, direction: Direction) -> Self {
        if delta == 0.0 {
            return Classification::Neutral;
        }
        match direction {
            Direction::HigherIsWorse if delta > 0.0 => Classification::Unfavorable,
            Direction::HigherIsWorse => Classification::Favorable,
            Direction::HigherIsBetter if delta > 0.0 => Classification::Favorable,
            Direction::HigherIsBetter => Classification::Unfavorable,
            Direction::Undirected => Classification::Neutral,
        }
    }
}

/// Display-ready headline numbers for one indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatTile {
    pub indicator: Indicator,
    /// Current value with unit, e.g. `420.00 ppm`.
    pub value_text: String,
    /// Signed delta, e.g. `+1.50`.
    pub delta_text: String,
    pub classification: Classification,
    pub unit: String,
    /// `YYYY-MM` of the current observation.
    pub period: Option<String>,
}

/// Signed fixed-precision number; non-negative values get an explicit `+`.
///
/// Values that round to zero are printed as `+0.00` rather than `-0.00`.
pub fn format_signed(value: f64, precision: usize) -> String {
    let rounded = format!("{:.*}", precision, value);
    match rounded.strip_prefix('-') {
        Some(magnitude) if magnitude.chars().any(|c| c.is_ascii_digit() && c != '0') => rounded,
        Some(magnitude) => format!("+{}", magnitude),
        None => format!("+{}", rounded),
    }
}

/// `value` as displayed at `precision` decimals, so a delta shown as `+0.00`
/// is judged as zero.
fn round_to(value: f64, precision: usize) -> f64 {
    format!("{:.*}", precision, value).parse().unwrap_or(value)
}

/// Build the tile for `indicator` from its KPI delta.
pub fn build_stat(indicator: Indicator, kpi: &KpiDelta) -> StatTile {
    let precision = indicator.precision();
    let unit = indicator.unit();

    let value_text = match kpi.current {
        Some(current) if indicator.signed_value() => {
            format!("{} {}", format_signed(current.value, precision), unit)
        }
        Some(current) => format!("{:.*} {}", precision, current.value, unit),
        None => PLACEHOLDER.to_string(),
    };

    let (delta_text, classification) = match kpi.comparison {
        Comparison::Computed { delta, .. } => (
            format_signed(delta, precision),
            Classification::of(round_to(delta, precision), indicator.direction()),
        ),
        Comparison::Unavailable => (PLACEHOLDER.to_string(), Classification::Neutral),
    };

    StatTile {
        indicator,
        value_text,
        delta_text,
        classification,
        unit: unit.to_string(),
        period: kpi.current.map(|c| c.period_label()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::compute_kpi_delta;
    use crate::indicator::DeltaMode;
    use crate::observation::{Observation, SeriesDocument};
    use std::collections::BTreeMap;

    #[test]
    fn signed_formatting() {
        assert_eq!(format_signed(1.5, 2), "+1.50");
        assert_eq!(format_signed(0.0, 2), "+0.00");
        assert_eq!(format_signed(-0.4, 2), "-0.40");
        assert_eq!(format_signed(-0.001, 2), "+0.00");
        assert_eq!(format_signed(-0.3999999999999995, 2), "-0.40");
    }

    #[test]
    fn rising_co2_is_unfavorable() {
        let doc = SeriesDocument::from_observations(
            Indicator::Co2,
            vec![
                Observation::new(2024, 6, 420.0),
                Observation::new(2023, 6, 418.5),
            ],
        );
        let tile = build_stat(
            Indicator::Co2,
            &compute_kpi_delta(&doc, DeltaMode::YearOverYear),
        );
        assert_eq!(tile.value_text, "420.00 ppm");
        assert_eq!(tile.delta_text, "+1.50");
        assert_eq!(tile.classification, Classification::Unfavorable);
        assert_eq!(tile.period.as_deref(), Some("2024-06"));
    }

    #[test]
    fn sea_ice_below_median_is_unfavorable() {
        let doc = SeriesDocument::from_observations(
            Indicator::SeaIce,
            vec![Observation::new(2024, 9, 4.2)],
        )
        .with_median(BTreeMap::from([(9, 4.6)]));
        let tile = build_stat(
            Indicator::SeaIce,
            &compute_kpi_delta(&doc, DeltaMode::MedianTable),
        );
        assert_eq!(tile.value_text, "4.20 Mio. km²");
        assert_eq!(tile.delta_text, "-0.40");
        assert_eq!(tile.classification, Classification::Unfavorable);
    }

    #[test]
    fn temperature_is_neutral_and_signed() {
        let doc = SeriesDocument::from_observations(
            Indicator::Temperature,
            vec![
                Observation::new(2024, 6, 1.23),
                Observation::new(2023, 6, 1.0),
            ],
        );
        let tile = build_stat(
            Indicator::Temperature,
            &compute_kpi_delta(&doc, DeltaMode::YearOverYear),
        );
        assert_eq!(tile.value_text, "+1.23 °C");
        assert_eq!(tile.classification, Classification::Neutral);
    }

    #[test]
    fn unavailable_comparison_uses_placeholder() {
        let doc = SeriesDocument::from_observations(
            Indicator::Co2,
            vec![Observation::new(2024, 6, 420.0)],
        );
        let tile = build_stat(
            Indicator::Co2,
            &compute_kpi_delta(&doc, DeltaMode::YearOverYear),
        );
        assert_eq!(tile.value_text, "420.00 ppm");
        assert_eq!(tile.delta_text, PLACEHOLDER);
        assert_eq!(tile.classification, Classification::Neutral);
    }

    #[test]
    fn missing_latest_value_uses_placeholder() {
        let doc = SeriesDocument::from_observations(Indicator::SeaIce, vec![]);
        let tile = build_stat(
            Indicator::SeaIce,
            &compute_kpi_delta(&doc, DeltaMode::MedianTable),
        );
        assert_eq!(tile.value_text, PLACEHOLDER);
        assert_eq!(tile.delta_text, PLACEHOLDER);
        assert_eq!(tile.period, None);
    }

    #[test]
    fn delta_rounding_to_zero_is_neutral() {
        let doc = SeriesDocument::from_observations(
            Indicator::Co2,
            vec![
                Observation::new(2024, 6, 420.0),
                Observation::new(2023, 6, 420.004),
            ],
        );
        let tile = build_stat(
            Indicator::Co2,
            &compute_kpi_delta(&doc, DeltaMode::YearOverYear),
        );
        assert_eq!(tile.delta_text, "+0.00");
        assert_eq!(tile.classification, Classification::Neutral);

        let doc = SeriesDocument::from_observations(
            Indicator::SeaIce,
            vec![Observation::new(2024, 9, 4.6049)],
        )
        .with_median(BTreeMap::from([(9, 4.6)]));
        let tile = build_stat(
            Indicator::SeaIce,
            &compute_kpi_delta(&doc, DeltaMode::MedianTable),
        );
        assert_eq!(tile.delta_text, "+0.00");
        assert_eq!(tile.classification, Classification::Neutral);
    }

    #[test]
    fn classification_table() {
        assert_eq!(
            Classification::of(-1.0, Direction::HigherIsWorse),
            Classification::Favorable
        );
        assert_eq!(
            Classification::of(1.0, Direction::HigherIsBetter),
            Classification::Favorable
        );
        assert_eq!(
            Classification::of(0.0, Direction::HigherIsBetter),
            Classification::Neutral
        );
        assert_eq!(
            Classification::of(2.0, Direction::Undirected),
            Classification::Neutral
        );
    }
}
