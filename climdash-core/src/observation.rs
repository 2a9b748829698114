//! Observations and series documents.
//!
//! A [`SeriesDocument`] is the uniform in-memory shape for all three
//! indicators. Whatever layout the snapshot file uses, ingestion reduces it to
//! a flat list of [`Observation`]s plus optional metadata.

use crate::indicator::Indicator;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of calendar months, and so the length of every month-indexed array.
pub const MONTHS: usize = 12;

/// Twelve optional values indexed by `month - 1`.
///
/// An absent month is `None`, never zero.
pub type MonthSlots = [Option<f64>; MONTHS];

/// Calendar month abbreviations in fixed January to December order.
pub const MONTH_LABELS: [&str; MONTHS] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A single dated value for one indicator.
///
/// `month` is kept as read from the source so that out-of-range months can be
/// recognised and ignored downstream instead of being clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub year: i32,
    pub month: i32,
    pub value: f64,
}

impl Observation {
    pub fn new(year: i32, month: i32, value: f64) -> Self {
        Self { year, month, value }
    }

    /// Zero-based slot for this observation's month, if the month is in 1..=12.
    pub fn slot(&self) -> Option<usize> {
        month_slot(self.month)
    }

    /// Sort key ordering observations chronologically.
    pub fn chronological_key(&self) -> (i32, i32) {
        (self.year, self.month)
    }

    /// `YYYY-MM` label for timeline charts.
    pub fn period_label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

/// Zero-based slot for a calendar month, or `None` outside 1..=12.
pub fn month_slot(month: i32) -> Option<usize> {
    if (1..=MONTHS as i32).contains(&month) {
        Some((month - 1) as usize)
    } else {
        None
    }
}

/// Empty month slots.
pub fn empty_slots() -> MonthSlots {
    [None; MONTHS]
}

/// All observations for one indicator plus the metadata the fetcher attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesDocument {
    pub indicator: Indicator,
    pub observations: Vec<Observation>,
    /// Free-form label of the anomaly baseline period, e.g. "1951-1980".
    pub baseline: Option<String>,
    /// Precomputed per-month reference values keyed by month number.
    pub median: BTreeMap<i32, f64>,
    pub last_updated: Option<DateTime<Utc>>,
    pub source: Option<String>,
    pub unit: Option<String>,
    /// Station or region the data describes (`location` or `region` on the wire).
    pub area: Option<String>,
}

impl SeriesDocument {
    /// A document with observations only and no metadata.
    pub fn from_observations(indicator: Indicator, observations: Vec<Observation>) -> Self {
        Self {
            indicator,
            observations,
            baseline: None,
            median: BTreeMap::new(),
            last_updated: None,
            source: None,
            unit: None,
            area: None,
        }
    }

    pub fn with_median(mut self, median: BTreeMap<i32, f64>) -> Self {
        self.median = median;
        self
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Observations with a valid calendar month.
    pub fn valid_observations(&self) -> impl Iterator<Item = &Observation> {
        self.observations.iter().filter(|o| o.slot().is_some())
    }

    /// Median table as month slots.
    pub fn median_slots(&self) -> MonthSlots {
        let mut slots = empty_slots();
        for (month, value) in &self.median {
            if let Some(slot) = month_slot(*month) {
                slots[slot] = Some(*value);
            }
        }
        slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_bounds() {
        assert_eq!(month_slot(1), Some(0));
        assert_eq!(month_slot(12), Some(11));
        assert_eq!(month_slot(0), None);
        assert_eq!(month_slot(13), None);
        assert_eq!(month_slot(-3), None);
    }

    #[test]
    fn period_label_is_zero_padded() {
        assert_eq!(Observation::new(2024, 3, 1.0).period_label(), "2024-03");
    }

    #[test]
    fn median_slots_skip_invalid_months() {
        let doc = SeriesDocument::from_observations(Indicator::SeaIce, vec![])
            .with_median(BTreeMap::from([(9, 4.6), (13, 1.0)]));
        let slots = doc.median_slots();
        assert_eq!(slots[8], Some(4.6));
        assert_eq!(slots.iter().filter(|s| s.is_some()).count(), 1);
    }
}
