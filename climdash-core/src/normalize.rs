//! Year bucketing.
//!
//! Groups a document's observations by calendar year into dense twelve-slot
//! arrays and selects the most recent years for multi-year overlay charts.

use crate::observation::{empty_slots, MonthSlots, SeriesDocument};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One calendar year of one indicator, indexed by `month - 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearBucket {
    pub year: i32,
    pub values: MonthSlots,
}

impl YearBucket {
    pub fn new(year: i32) -> Self {
        Self {
            year,
            values: empty_slots(),
        }
    }

    /// Value for a 1-based calendar month.
    pub fn month(&self, month: i32) -> Option<f64> {
        crate::observation::month_slot(month).and_then(|slot| self.values[slot])
    }

    /// Number of months with a value.
    pub fn filled(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }
}

/// Bucket every year present in the document, keyed by year.
///
/// Observations with a month outside 1..=12 are ignored. When the same
/// (year, month) appears more than once the last one in document order wins.
pub fn bucket_by_year(document: &SeriesDocument) -> BTreeMap<i32, YearBucket> {
    let mut buckets: BTreeMap<i32, YearBucket> = BTreeMap::new();
    for observation in &document.observations {
        let Some(slot) = observation.slot() else {
            continue;
        };
        buckets
            .entry(observation.year)
            .or_insert_with(|| YearBucket::new(observation.year))
            .values[slot] = Some(observation.value);
    }
    buckets
}

/// The `count` most recent years in the document, newest first.
///
/// Years are only those with at least one valid observation. When fewer than
/// `count` such years exist all of them are returned; no empty years are
/// padded in.
pub fn recent_years(document: &SeriesDocument, count: usize) -> Vec<YearBucket> {
    bucket_by_year(document)
        .into_values()
        .rev()
        .take(count)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicator::Indicator;
    use crate::observation::Observation;

    fn co2(observations: Vec<Observation>) -> SeriesDocument {
        SeriesDocument::from_observations(Indicator::Co2, observations)
    }

    #[test]
    fn newest_years_first() {
        let doc = co2(vec![
            Observation::new(2021, 1, 1.0),
            Observation::new(2023, 1, 3.0),
            Observation::new(2022, 1, 2.0),
            Observation::new(2020, 1, 0.0),
        ]);
        let years: Vec<i32> = recent_years(&doc, 3).iter().map(|b| b.year).collect();
        assert_eq!(years, vec![2023, 2022, 2021]);
    }

    #[test]
    fn fewer_years_than_requested() {
        let doc = co2(vec![Observation::new(2024, 6, 420.0)]);
        let buckets = recent_years(&doc, 5);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].values.len(), 12);
    }

    #[test]
    fn zero_years_requested() {
        let doc = co2(vec![Observation::new(2024, 6, 420.0)]);
        assert!(recent_years(&doc, 0).is_empty());
    }

    #[test]
    fn missing_months_are_absent_not_zero() {
        let doc = co2(vec![
            Observation::new(2024, 1, 421.0),
            Observation::new(2024, 3, 423.0),
        ]);
        let bucket = &recent_years(&doc, 1)[0];
        assert_eq!(bucket.values[0], Some(421.0));
        assert_eq!(bucket.values[1], None);
        assert_eq!(bucket.values[2], Some(423.0));
        assert_eq!(bucket.filled(), 2);
    }

    #[test]
    fn invalid_months_do_not_touch_other_slots() {
        let doc = co2(vec![
            Observation::new(2020, 12, 7.0),
            Observation::new(2020, 13, 5.0),
            Observation::new(2020, 0, 6.0),
        ]);
        let bucket = &recent_years(&doc, 1)[0];
        assert_eq!(bucket.month(12), Some(7.0));
        assert_eq!(bucket.filled(), 1);
    }

    #[test]
    fn year_with_only_invalid_months_is_not_a_bucket() {
        let doc = co2(vec![
            Observation::new(2021, 13, 5.0),
            Observation::new(2020, 5, 1.0),
        ]);
        let years: Vec<i32> = recent_years(&doc, 5).iter().map(|b| b.year).collect();
        assert_eq!(years, vec![2020]);
    }

    #[test]
    fn last_duplicate_wins() {
        let doc = co2(vec![
            Observation::new(2024, 2, 1.0),
            Observation::new(2024, 2, 2.0),
        ]);
        assert_eq!(recent_years(&doc, 1)[0].month(2), Some(2.0));
    }

    #[test]
    fn input_order_does_not_matter() {
        let forward = vec![
            Observation::new(2022, 1, 1.0),
            Observation::new(2022, 2, 2.0),
            Observation::new(2023, 1, 3.0),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();
        assert_eq!(
            recent_years(&co2(forward), 2),
            recent_years(&co2(reversed), 2)
        );
    }
}
