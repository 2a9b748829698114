//! Chart specifications.
//!
//! A [`ChartSpec`] describes what to draw without depending on any drawing
//! library: named series of twelve optional monthly values plus style hints,
//! or, for the temperature indicator, a flat chronological timeline.
//!
//! # Monthly overlay contract
//!
//! - Categories are always `Jan` .. `Dec`.
//! - Year series come first, most recent year first.
//! - The reference series, if any, is always last.
//! - The most recent year has the widest line and full opacity; each older
//!   year is thinner and more transparent than the one before, down to a
//!   floor. The reference series is dashed, thin and uses the neutral color
//!   slot.

use crate::aggregate::{
    compute_reference_curve, median_table_curve, reference_curve_with, AggregateOp, ReferenceCurve,
    ReferenceSource,
};
use crate::config::DashboardConfig;
use crate::indicator::Indicator;
use crate::normalize::{recent_years, YearBucket};
use crate::observation::{Observation, SeriesDocument, MONTH_LABELS};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const MAX_LINE_WIDTH: f64 = 3.0;
const MIN_LINE_WIDTH: f64 = 1.5;
const LINE_WIDTH_STEP: f64 = 0.5;
const MIN_OPACITY: f64 = 0.25;
const OPACITY_STEP: f64 = 0.2;
const REFERENCE_LINE_WIDTH: f64 = 1.0;
const REFERENCE_DASH: [u32; 2] = [6, 4];

/// Palette slot a renderer maps to a concrete color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "slot", content = "rank", rename_all = "snake_case")]
pub enum ColorSlot {
    /// Year series by recency rank, 0 being the most recent year.
    Year(usize),
    /// Neutral color for reference curves.
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesStyle {
    pub line_width: f64,
    /// Dash pattern as alternating on/off lengths; empty for a solid line.
    pub dash: Vec<u32>,
    pub color: ColorSlot,
    pub opacity: f64,
}

impl SeriesStyle {
    /// Style for the year at recency `rank` (0 = most recent) out of `count`
    /// displayed years.
    ///
    /// Steps shrink as `count` grows so that every rank stays strictly weaker
    /// than the one before while the oldest year never drops below the floor.
    pub fn for_year_rank(rank: usize, count: usize) -> Self {
        let rank_f = rank as f64;
        let spans = count.saturating_sub(1).max(1) as f64;
        let width_step = LINE_WIDTH_STEP.min((MAX_LINE_WIDTH - MIN_LINE_WIDTH) / spans);
        let opacity_step = OPACITY_STEP.min((1.0 - MIN_OPACITY) / spans);
        Self {
            line_width: (MAX_LINE_WIDTH - width_step * rank_f).max(MIN_LINE_WIDTH),
            dash: Vec::new(),
            color: ColorSlot::Year(rank),
            opacity: (1.0 - opacity_step * rank_f).max(MIN_OPACITY),
        }
    }

    pub fn reference() -> Self {
        Self {
            line_width: REFERENCE_LINE_WIDTH,
            dash: REFERENCE_DASH.to_vec(),
            color: ColorSlot::Neutral,
            opacity: 1.0,
        }
    }

    pub fn is_dashed(&self) -> bool {
        !self.dash.is_empty()
    }
}

/// What a series represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", content = "year", rename_all = "snake_case")]
pub enum SeriesRole {
    Year(i32),
    Reference,
}

/// One named line on a monthly overlay chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSpec {
    pub name: String,
    pub role: SeriesRole,
    /// Twelve values, January first; `None` is a gap.
    pub values: Vec<Option<f64>>,
    pub style: SeriesStyle,
}

/// Color band for a timeline value, split at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    /// Value below zero.
    Negative,
    /// Value at or above zero.
    Positive,
}

impl Band {
    pub fn of(value: f64) -> Self {
        if value < 0.0 {
            Band::Negative
        } else {
            Band::Positive
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    /// `YYYY-MM`
    pub label: String,
    pub value: f64,
    pub band: Band,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartBody {
    /// Years overlaid on a shared month axis.
    MonthlyOverlay {
        categories: Vec<String>,
        series: Vec<SeriesSpec>,
    },
    /// One chronological run of values.
    Timeline { points: Vec<TimelinePoint> },
}

/// Render-target-agnostic description of one indicator's chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub indicator: Indicator,
    pub body: ChartBody,
}

impl ChartSpec {
    /// Overlay series, or an empty slice for timeline charts.
    pub fn series(&self) -> &[SeriesSpec] {
        match &self.body {
            ChartBody::MonthlyOverlay { series, .. } => series.as_slice(),
            ChartBody::Timeline { .. } => &[],
        }
    }

    /// Timeline points, or an empty slice for overlay charts.
    pub fn points(&self) -> &[TimelinePoint] {
        match &self.body {
            ChartBody::Timeline { points } => points.as_slice(),
            ChartBody::MonthlyOverlay { .. } => &[],
        }
    }
}

/// Legend label for a reference curve.
pub fn reference_label(curve: &ReferenceCurve) -> String {
    match curve.source {
        ReferenceSource::Window {
            window,
            op: AggregateOp::Mean,
        } => format!("Mean {}", window),
        ReferenceSource::Window {
            window,
            op: AggregateOp::Median,
        } => format!("Median {}", window),
        ReferenceSource::MedianTable => "Median".to_string(),
    }
}

/// Overlay chart from year buckets and an optional reference curve.
///
/// Buckets are reordered newest first whatever order they arrive in. An empty
/// reference curve is left out.
pub fn monthly_overlay(
    indicator: Indicator,
    buckets: &[YearBucket],
    reference: Option<&ReferenceCurve>,
) -> ChartSpec {
    let mut ordered: Vec<&YearBucket> = buckets.iter().collect();
    ordered.sort_by(|a, b| b.year.cmp(&a.year));
    let count = ordered.len();

    let mut series: Vec<SeriesSpec> = ordered
        .iter()
        .enumerate()
        .map(|(rank, bucket)| SeriesSpec {
            name: bucket.year.to_string(),
            role: SeriesRole::Year(bucket.year),
            values: bucket.values.to_vec(),
            style: SeriesStyle::for_year_rank(rank, count),
        })
        .collect();

    match reference {
        Some(curve) if !curve.is_empty() => series.push(SeriesSpec {
            name: reference_label(curve),
            role: SeriesRole::Reference,
            values: curve.values.to_vec(),
            style: SeriesStyle::reference(),
        }),
        Some(_) => debug!("{}: reference curve has no values, omitted", indicator),
        None => {}
    }

    ChartSpec {
        indicator,
        body: ChartBody::MonthlyOverlay {
            categories: MONTH_LABELS.iter().map(|m| m.to_string()).collect(),
            series,
        },
    }
}

/// Chronological timeline of the `max_points` most recent observations.
///
/// Observations with invalid months are dropped and duplicate (year, month)
/// pairs keep the last one in document order.
pub fn timeline(document: &SeriesDocument, max_points: usize) -> ChartSpec {
    let by_period: BTreeMap<(i32, i32), Observation> = document
        .valid_observations()
        .map(|o| (o.chronological_key(), *o))
        .collect();
    let skip = by_period.len().saturating_sub(max_points);

    let points = by_period
        .values()
        .skip(skip)
        .map(|o| TimelinePoint {
            label: o.period_label(),
            value: o.value,
            band: Band::of(o.value),
        })
        .collect();

    ChartSpec {
        indicator: document.indicator,
        body: ChartBody::Timeline { points },
    }
}

/// Reference curve drawn behind an indicator's year series, if it has one.
///
/// Sea ice uses the document's median table when present. Without one the
/// chart falls back to a median derived over `sea_ice.median_window`, while
/// the KPI delta only ever compares against the table and so reports
/// unavailable in that case.
pub fn reference_for(
    document: &SeriesDocument,
    config: &DashboardConfig,
) -> Option<ReferenceCurve> {
    match document.indicator {
        Indicator::Co2 => {
            let window = config.co2.reference_window;
            Some(compute_reference_curve(document, window.start, window.end))
        }
        Indicator::SeaIce if !document.median.is_empty() => Some(median_table_curve(document)),
        Indicator::SeaIce => Some(reference_curve_with(
            document,
            config.sea_ice.median_window,
            AggregateOp::Median,
        )),
        Indicator::Temperature => None,
    }
}

/// Chart for one indicator's document.
pub fn build_chart(document: &SeriesDocument, config: &DashboardConfig) -> ChartSpec {
    match document.indicator {
        Indicator::Temperature => timeline(document, config.temperature.max_points),
        indicator => {
            let buckets = recent_years(document, config.years_displayed);
            let reference = reference_for(document, config);
            monthly_overlay(indicator, &buckets, reference.as_ref())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::YearWindow;
    use crate::observation::empty_slots;

    fn bucket(year: i32, january: f64) -> YearBucket {
        let mut values = empty_slots();
        values[0] = Some(january);
        YearBucket { year, values }
    }

    fn curve(january: f64) -> ReferenceCurve {
        let mut values = empty_slots();
        values[0] = Some(january);
        ReferenceCurve {
            source: ReferenceSource::Window {
                window: YearWindow {
                    start: 1991,
                    end: 2020,
                },
                op: AggregateOp::Mean,
            },
            values,
        }
    }

    #[test]
    fn series_order_newest_first_reference_last() {
        let buckets = vec![bucket(2021, 1.0), bucket(2024, 4.0), bucket(2022, 2.0)];
        let reference = curve(0.5);
        let spec = monthly_overlay(Indicator::Co2, &buckets, Some(&reference));

        let roles: Vec<SeriesRole> = spec.series().iter().map(|s| s.role).collect();
        assert_eq!(
            roles,
            vec![
                SeriesRole::Year(2024),
                SeriesRole::Year(2022),
                SeriesRole::Year(2021),
                SeriesRole::Reference
            ]
        );
        assert_eq!(spec.series()[3].name, "Mean 1991-2020");
    }

    #[test]
    fn categories_are_fixed_month_abbreviations() {
        let spec = monthly_overlay(Indicator::SeaIce, &[bucket(2024, 1.0)], None);
        let ChartBody::MonthlyOverlay { categories, series } = &spec.body else {
            panic!("expected overlay");
        };
        assert_eq!(categories.len(), 12);
        assert_eq!(categories[0], "Jan");
        assert_eq!(categories[11], "Dec");
        assert!(series.iter().all(|s| s.values.len() == 12));
    }

    #[test]
    fn most_recent_year_is_strongest() {
        let buckets: Vec<YearBucket> = (2015..=2024).map(|y| bucket(y, 1.0)).collect();
        let spec = monthly_overlay(Indicator::Co2, &buckets, Some(&curve(1.0)));
        let series = spec.series();

        let newest = &series[0].style;
        assert_eq!(newest.line_width, MAX_LINE_WIDTH);
        assert_eq!(newest.opacity, 1.0);
        assert!(!newest.is_dashed());

        for pair in series[..series.len() - 1].windows(2) {
            assert!(pair[0].style.line_width > pair[1].style.line_width);
            assert!(pair[0].style.opacity > pair[1].style.opacity);
        }

        let reference = &series.last().unwrap().style;
        assert!(reference.is_dashed());
        assert_eq!(reference.color, ColorSlot::Neutral);
        assert!(reference.line_width < newest.line_width);
    }

    #[test]
    fn eight_years_fade_strictly_down_to_the_floor() {
        let styles: Vec<SeriesStyle> = (0..8)
            .map(|rank| SeriesStyle::for_year_rank(rank, 8))
            .collect();
        for pair in styles.windows(2) {
            assert!(pair[0].line_width > pair[1].line_width);
            assert!(pair[0].opacity > pair[1].opacity);
        }
        let oldest = &styles[7];
        assert!(oldest.line_width >= MIN_LINE_WIDTH);
        assert!(oldest.opacity >= MIN_OPACITY);
    }

    #[test]
    fn few_years_keep_full_steps() {
        let second = SeriesStyle::for_year_rank(1, 3);
        assert_eq!(second.line_width, MAX_LINE_WIDTH - LINE_WIDTH_STEP);
        assert_eq!(second.opacity, 1.0 - OPACITY_STEP);
        assert_eq!(SeriesStyle::for_year_rank(0, 1).line_width, MAX_LINE_WIDTH);
    }

    #[test]
    fn empty_reference_is_omitted() {
        let empty = ReferenceCurve {
            source: ReferenceSource::MedianTable,
            values: empty_slots(),
        };
        let spec = monthly_overlay(Indicator::SeaIce, &[bucket(2024, 1.0)], Some(&empty));
        assert_eq!(spec.series().len(), 1);
    }

    #[test]
    fn timeline_is_chronological_and_capped() {
        let observations = vec![
            Observation::new(2024, 2, 0.5),
            Observation::new(2023, 12, -0.1),
            Observation::new(2024, 1, 0.0),
            Observation::new(2024, 14, 9.0),
            Observation::new(2023, 11, 0.2),
        ];
        let doc = SeriesDocument::from_observations(Indicator::Temperature, observations);
        let spec = timeline(&doc, 3);

        let labels: Vec<&str> = spec.points().iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["2023-12", "2024-01", "2024-02"]);
        let bands: Vec<Band> = spec.points().iter().map(|p| p.band).collect();
        assert_eq!(bands, vec![Band::Negative, Band::Positive, Band::Positive]);
        assert!(spec.series().is_empty());
    }

    #[test]
    fn sea_ice_derives_median_when_table_missing() {
        let observations = vec![
            Observation::new(1990, 9, 6.0),
            Observation::new(1991, 9, 5.0),
            Observation::new(1992, 9, 7.0),
            Observation::new(2024, 9, 4.2),
        ];
        let doc = SeriesDocument::from_observations(Indicator::SeaIce, observations);
        let reference = reference_for(&doc, &DashboardConfig::default()).unwrap();
        assert_eq!(reference.values[8], Some(6.0));
        assert_eq!(reference_label(&reference), "Median 1981-2010");

        let kpi = crate::aggregate::compute_kpi_delta(&doc, Indicator::SeaIce.delta_mode());
        assert_eq!(kpi.current, Some(Observation::new(2024, 9, 4.2)));
        assert!(!kpi.is_available());
    }

    #[test]
    fn temperature_has_no_reference() {
        let doc = SeriesDocument::from_observations(Indicator::Temperature, vec![]);
        assert!(reference_for(&doc, &DashboardConfig::default()).is_none());
        let chart = build_chart(&doc, &DashboardConfig::default());
        assert!(chart.points().is_empty());
    }
}
