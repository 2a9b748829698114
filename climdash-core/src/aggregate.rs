//! Reference curves and KPI deltas.
//!
//! Two kinds of derived statistics are computed from a [`SeriesDocument`]:
//!
//! - A [`ReferenceCurve`]: one value per calendar month aggregated over every
//!   observation inside an inclusive [`YearWindow`].
//! - A [`KpiDelta`]: the latest observation compared against either the same
//!   month one year earlier or the document's median table.
//!
//! The sign convention is always `current - reference`. Whether that sign is
//! good news is decided by the caller from the indicator's
//! [`Direction`](crate::indicator::Direction), not here.
//!
//! A comparison that cannot be made is reported as [`Comparison::Unavailable`]
//! and never collapsed into a zero delta.

use crate::errors::{DashboardError, DashboardResult};
use crate::indicator::DeltaMode;
use crate::observation::{empty_slots, MonthSlots, Observation, SeriesDocument, MONTHS};
use serde::{Deserialize, Serialize};

/// Inclusive range of calendar years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearWindow {
    pub start: i32,
    pub end: i32,
}

impl YearWindow {
    /// Create a window, rejecting `start > end`.
    pub fn new(start: i32, end: i32) -> DashboardResult<Self> {
        if start > end {
            return Err(DashboardError::InvalidWindow(start, end));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, year: i32) -> bool {
        self.start <= year && year <= self.end
    }
}

impl std::fmt::Display for YearWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// How contributing observations are combined into one monthly value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateOp {
    /// Arithmetic mean with plain floating-point accumulation.
    Mean,
    /// Middle value; the mean of the two middle values for even counts.
    Median,
}

impl AggregateOp {
    /// Combine `values`, or `None` when there is nothing to combine.
    pub fn apply(&self, values: &mut [f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        match self {
            AggregateOp::Mean => Some(values.iter().sum::<f64>() / values.len() as f64),
            AggregateOp::Median => {
                values.sort_by(|a, b| a.total_cmp(b));
                let mid = values.len() / 2;
                if values.len() % 2 == 0 {
                    Some((values[mid - 1] + values[mid]) / 2.0)
                } else {
                    Some(values[mid])
                }
            }
        }
    }
}

/// Where a reference curve's values came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReferenceSource {
    /// Aggregated from the document's own observations.
    Window { window: YearWindow, op: AggregateOp },
    /// Copied from the document's precomputed median table.
    MedianTable,
}

/// Per-calendar-month reference values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceCurve {
    pub source: ReferenceSource,
    pub values: MonthSlots,
}

impl ReferenceCurve {
    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }
}

/// Mean of every observation in `[start_year, end_year]`, per calendar month.
///
/// Months with no contributing observation are absent. A window with
/// `start_year > end_year` contains no years and yields an empty curve.
pub fn compute_reference_curve(
    document: &SeriesDocument,
    start_year: i32,
    end_year: i32,
) -> ReferenceCurve {
    reference_curve_with(
        document,
        YearWindow {
            start: start_year,
            end: end_year,
        },
        AggregateOp::Mean,
    )
}

/// Aggregate observations inside `window` per calendar month using `op`.
pub fn reference_curve_with(
    document: &SeriesDocument,
    window: YearWindow,
    op: AggregateOp,
) -> ReferenceCurve {
    let mut contributions: [Vec<f64>; MONTHS] = Default::default();
    for observation in document.valid_observations() {
        if !window.contains(observation.year) {
            continue;
        }
        if let Some(slot) = observation.slot() {
            contributions[slot].push(observation.value);
        }
    }

    let mut values = empty_slots();
    for (slot, contributing) in contributions.iter_mut().enumerate() {
        values[slot] = op.apply(contributing);
    }

    ReferenceCurve {
        source: ReferenceSource::Window { window, op },
        values,
    }
}

/// The document's median table as a reference curve.
pub fn median_table_curve(document: &SeriesDocument) -> ReferenceCurve {
    ReferenceCurve {
        source: ReferenceSource::MedianTable,
        values: document.median_slots(),
    }
}

/// Chronologically latest observation with a valid month.
///
/// Duplicate (year, month) pairs resolve to the last one in document order.
pub fn latest_observation(document: &SeriesDocument) -> Option<Observation> {
    document
        .valid_observations()
        .max_by_key(|o| o.chronological_key())
        .copied()
}

/// Outcome of comparing a current value against a reference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Comparison {
    Computed {
        reference: f64,
        delta: f64,
    },
    /// No reference value exists for the current observation.
    Unavailable,
}

impl Comparison {
    fn against(current: f64, reference: Option<f64>) -> Self {
        match reference {
            Some(reference) => Comparison::Computed {
                reference,
                delta: current - reference,
            },
            None => Comparison::Unavailable,
        }
    }
}

/// Headline delta for an indicator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KpiDelta {
    pub mode: DeltaMode,
    /// The observation being compared; `None` for a document without data.
    pub current: Option<Observation>,
    pub comparison: Comparison,
}

impl KpiDelta {
    /// The signed delta, if a comparison was possible.
    pub fn delta(&self) -> Option<f64> {
        match self.comparison {
            Comparison::Computed { delta, .. } => Some(delta),
            Comparison::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self.comparison, Comparison::Computed { .. })
    }
}

/// Compare the latest observation in `document` using `mode`.
pub fn compute_kpi_delta(document: &SeriesDocument, mode: DeltaMode) -> KpiDelta {
    match latest_observation(document) {
        Some(current) => delta_for(document, current, mode),
        None => KpiDelta {
            mode,
            current: None,
            comparison: Comparison::Unavailable,
        },
    }
}

/// Compare a specific observation against its reference under `mode`.
pub fn delta_for(document: &SeriesDocument, current: Observation, mode: DeltaMode) -> KpiDelta {
    let reference = match mode {
        DeltaMode::YearOverYear => current.year.checked_sub(1).and_then(|prior| {
            document
                .valid_observations()
                .filter(|o| o.year == prior && o.month == current.month)
                .last()
                .map(|o| o.value)
        }),
        DeltaMode::MedianTable => document.median.get(&current.month).copied(),
    };

    KpiDelta {
        mode,
        current: Some(current),
        comparison: Comparison::against(current.value, reference),
    }
}
