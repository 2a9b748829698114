//! Wire adapters for the fetcher's JSON snapshots.
//!
//! CO2 and temperature documents carry a flat `data` list of
//! `{year, month, <metric>}` points. The sea-ice document keys `data` by year
//! (`{"2024": [{month, extent}, ...]}`) and adds a `median` table keyed by
//! month. Both layouts are flattened here into a single
//! [`SeriesDocument`] so nothing downstream needs to know which one a file
//! used.
//!
//! Parsing is lenient below the document level: a point with a missing or
//! non-numeric field is skipped, not fatal. Only unreadable files and
//! documents that are not JSON objects produce an error.

use crate::errors::{DashboardError, DashboardResult};
use crate::indicator::Indicator;
use crate::observation::{Observation, SeriesDocument};
use chrono::{DateTime, NaiveDateTime, Utc};
use log::{debug, warn};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Top-level document as written by the fetcher.
///
/// Metadata fields are read as raw values so that an unexpected type drops the
/// field rather than the whole document.
#[derive(Debug, Default, Deserialize)]
struct WireDocument {
    #[serde(default)]
    data: Value,
    #[serde(default)]
    median: Value,
    #[serde(default)]
    baseline: Value,
    #[serde(default)]
    last_updated: Value,
    #[serde(default)]
    source: Value,
    #[serde(default)]
    unit: Value,
    #[serde(default)]
    location: Value,
    #[serde(default)]
    region: Value,
}

/// Read and parse the snapshot for `indicator` from `data_dir`.
pub fn load_document(data_dir: &Path, indicator: Indicator) -> DashboardResult<SeriesDocument> {
    let path = data_dir.join(indicator.file_name());
    let contents = fs::read_to_string(&path).map_err(|source| DashboardError::Io {
        path: path.clone(),
        source,
    })?;
    parse_document(indicator, &contents)
}

/// Parse a snapshot document for `indicator` from its JSON text.
pub fn parse_document(indicator: Indicator, contents: &str) -> DashboardResult<SeriesDocument> {
    let malformed = |source| DashboardError::MalformedDocument {
        name: indicator.file_name().to_string(),
        source,
    };
    let root: Value = serde_json::from_str(contents).map_err(malformed)?;
    if !root.is_object() {
        return Err(malformed(serde::de::Error::custom(format!(
            "expected a JSON object, found {}",
            json_type(&root)
        ))));
    }
    let wire = WireDocument::deserialize(root).map_err(malformed)?;

    let mut skipped = 0;
    let observations = match &wire.data {
        Value::Array(points) => flatten_points(indicator, points, None, &mut skipped),
        Value::Object(by_year) => flatten_year_keyed(indicator, by_year, &mut skipped),
        Value::Null => Vec::new(),
        other => {
            warn!(
                "{}: ignoring `data` of unexpected type {}",
                indicator.file_name(),
                json_type(other)
            );
            Vec::new()
        }
    };
    if skipped > 0 {
        warn!(
            "{}: skipped {} malformed data points",
            indicator.file_name(),
            skipped
        );
    }

    let median = parse_median(&wire.median);
    let last_updated = text(&wire.last_updated).and_then(|raw| {
        let parsed = parse_timestamp(&raw);
        if parsed.is_none() {
            warn!(
                "{}: unparseable last_updated {:?}",
                indicator.file_name(),
                raw
            );
        }
        parsed
    });

    debug!(
        "{}: {} observations, {} median entries",
        indicator.file_name(),
        observations.len(),
        median.len()
    );

    Ok(SeriesDocument {
        indicator,
        observations,
        baseline: text(&wire.baseline),
        median,
        last_updated,
        source: text(&wire.source),
        unit: text(&wire.unit),
        area: text(&wire.location).or_else(|| text(&wire.region)),
    })
}

/// Flatten a list of points. `year` overrides any `year` field on the points,
/// which is how the year-keyed layout reuses this function.
fn flatten_points(
    indicator: Indicator,
    points: &[Value],
    year: Option<i32>,
    skipped: &mut usize,
) -> Vec<Observation> {
    let metric = indicator.metric_field();
    let mut observations = Vec::with_capacity(points.len());
    for point in points {
        let year = year.or_else(|| point.get("year").and_then(as_int));
        let month = point.get("month").and_then(as_int);
        let value = point.get(metric).and_then(as_float);
        match (year, month, value) {
            (Some(year), Some(month), Some(value)) => {
                observations.push(Observation::new(year, month, value))
            }
            _ => *skipped += 1,
        }
    }
    observations
}

fn flatten_year_keyed(
    indicator: Indicator,
    by_year: &Map<String, Value>,
    skipped: &mut usize,
) -> Vec<Observation> {
    let mut observations = Vec::new();
    for (key, points) in by_year {
        let Ok(year) = key.trim().parse::<i32>() else {
            warn!(
                "{}: ignoring non-numeric year key {:?}",
                indicator.file_name(),
                key
            );
            continue;
        };
        match points {
            Value::Array(points) => {
                observations.extend(flatten_points(indicator, points, Some(year), skipped))
            }
            _ => *skipped += 1,
        }
    }
    observations
}

fn parse_median(raw: &Value) -> BTreeMap<i32, f64> {
    let Value::Object(entries) = raw else {
        return BTreeMap::new();
    };
    entries
        .iter()
        .filter_map(|(month, value)| {
            let month = month.trim().parse::<i32>().ok()?;
            if !(1..=12).contains(&month) {
                return None;
            }
            Some((month, as_float(value)?))
        })
        .collect()
}

/// Parse an ISO 8601 timestamp. Offsets are honoured; naive timestamps are UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

fn as_int(value: &Value) -> Option<i32> {
    if let Some(i) = value.as_i64() {
        return i32::try_from(i).ok();
    }
    match value.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() <= i32::MAX as f64 => Some(f as i32),
        _ => None,
    }
}

fn as_float(value: &Value) -> Option<f64> {
    value.as_f64().filter(|f| f.is_finite())
}

fn text(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
