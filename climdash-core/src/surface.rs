//! Render targets for chart specifications.
//!
//! Nothing in this crate draws. A host supplies a [`ChartSurface`] and the
//! dashboard hands it each finished [`ChartSpec`]; re-applying a spec replaces
//! whatever the surface showed for that indicator before.

use crate::chart::ChartSpec;
use crate::errors::{DashboardError, DashboardResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Something that can display a chart specification.
pub trait ChartSurface {
    fn apply(&mut self, spec: &ChartSpec) -> DashboardResult<()>;
}

/// Writes each spec as pretty-printed JSON to `<dir>/<indicator>.chart.json`.
#[derive(Debug, Clone)]
pub struct JsonSurface {
    dir: PathBuf,
}

impl JsonSurface {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Output path for the chart of `spec`'s indicator.
    pub fn path_for(&self, spec: &ChartSpec) -> PathBuf {
        self.dir.join(format!("{}.chart.json", spec.indicator.slug()))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ChartSurface for JsonSurface {
    fn apply(&mut self, spec: &ChartSpec) -> DashboardResult<()> {
        let path = self.path_for(spec);
        let json = serde_json::to_string_pretty(spec)
            .map_err(|e| DashboardError::Error(format!("Could not serialise chart: {}", e)))?;
        fs::create_dir_all(&self.dir).map_err(|source| DashboardError::Io {
            path: self.dir.clone(),
            source,
        })?;
        fs::write(&path, format!("{}\n", json))
            .map_err(|source| DashboardError::Io { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{monthly_overlay, ChartBody};
    use crate::indicator::Indicator;
    use tempfile::tempdir;

    #[test]
    fn json_surface_round_trips() {
        let dir = tempdir().unwrap();
        let mut surface = JsonSurface::new(dir.path().join("charts"));
        let spec = monthly_overlay(Indicator::Co2, &[], None);

        surface.apply(&spec).unwrap();

        let written = fs::read_to_string(dir.path().join("charts/co2.chart.json")).unwrap();
        let parsed: ChartSpec = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, spec);
        assert!(matches!(parsed.body, ChartBody::MonthlyOverlay { .. }));
    }

    #[test]
    fn reapplying_replaces_previous_chart() {
        let dir = tempdir().unwrap();
        let mut surface = JsonSurface::new(dir.path());
        surface
            .apply(&monthly_overlay(Indicator::SeaIce, &[], None))
            .unwrap();
        let mut values = crate::observation::empty_slots();
        values[0] = Some(14.1);
        let bucket = crate::normalize::YearBucket { year: 2024, values };
        let spec = monthly_overlay(Indicator::SeaIce, &[bucket], None);
        surface.apply(&spec).unwrap();

        let written = fs::read_to_string(surface.path_for(&spec)).unwrap();
        let parsed: ChartSpec = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed.series().len(), 1);
    }
}
