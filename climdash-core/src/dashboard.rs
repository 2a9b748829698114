//! Snapshot loading and the dashboard view model.
//!
//! A [`DatasetSnapshot`] holds whichever of the three documents could be
//! loaded. [`build_view`] derives a fresh [`DashboardView`] from a snapshot and
//! a configuration; it is pure, so it can be re-run on any presentation change
//! without touching the files again.
//!
//! Indicators are independent. A missing or malformed document leaves that
//! indicator's panel [`PanelStatus::Unavailable`] and the others unaffected.

use crate::aggregate::compute_kpi_delta;
use crate::chart::{build_chart, ChartSpec};
use crate::config::DashboardConfig;
use crate::errors::DashboardResult;
use crate::indicator::Indicator;
use crate::ingest::load_document;
use crate::observation::SeriesDocument;
use crate::stats::{build_stat, StatTile};
use crate::surface::ChartSurface;
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Immutable set of loaded documents, one optional slot per indicator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetSnapshot {
    pub co2: Option<SeriesDocument>,
    pub temperature: Option<SeriesDocument>,
    pub sea_ice: Option<SeriesDocument>,
}

impl DatasetSnapshot {
    /// Build a snapshot from documents, placing each by its indicator.
    ///
    /// When two documents share an indicator the later one wins.
    pub fn from_documents(documents: impl IntoIterator<Item = SeriesDocument>) -> Self {
        let mut snapshot = Self::default();
        for document in documents {
            let indicator = document.indicator;
            *snapshot.slot_mut(indicator) = Some(document);
        }
        snapshot
    }

    pub fn get(&self, indicator: Indicator) -> Option<&SeriesDocument> {
        match indicator {
            Indicator::Co2 => self.co2.as_ref(),
            Indicator::Temperature => self.temperature.as_ref(),
            Indicator::SeaIce => self.sea_ice.as_ref(),
        }
    }

    fn slot_mut(&mut self, indicator: Indicator) -> &mut Option<SeriesDocument> {
        match indicator {
            Indicator::Co2 => &mut self.co2,
            Indicator::Temperature => &mut self.temperature,
            Indicator::SeaIce => &mut self.sea_ice,
        }
    }

    /// Most recent `last_updated` across the loaded documents.
    pub fn freshness(&self) -> Option<DateTime<Utc>> {
        Indicator::ALL
            .iter()
            .filter_map(|i| self.get(*i))
            .filter_map(|d| d.last_updated)
            .max()
    }

    pub fn available(&self) -> usize {
        Indicator::ALL
            .iter()
            .filter(|i| self.get(**i).is_some())
            .count()
    }
}

/// Load every indicator's document from `data_dir`.
///
/// Never fails as a whole: each document that cannot be read or parsed is
/// logged and left empty in the snapshot.
pub fn load_snapshot(data_dir: &Path) -> DatasetSnapshot {
    let mut snapshot = DatasetSnapshot::default();
    for indicator in Indicator::ALL {
        match load_document(data_dir, indicator) {
            Ok(document) => *snapshot.slot_mut(indicator) = Some(document),
            Err(e) => warn!("{} unavailable: {}", indicator, e),
        }
    }
    info!(
        "Loaded {}/{} datasets from {}",
        snapshot.available(),
        Indicator::ALL.len(),
        data_dir.display()
    );
    snapshot
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PanelStatus {
    Ready {
        chart: ChartSpec,
        stat: StatTile,
    },
    /// No document for this indicator; the panel shows its empty state.
    Unavailable { reason: String },
}

/// Chart and KPI tile for one indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorPanel {
    pub indicator: Indicator,
    pub status: PanelStatus,
}

impl IndicatorPanel {
    pub fn chart(&self) -> Option<&ChartSpec> {
        match &self.status {
            PanelStatus::Ready { chart, .. } => Some(chart),
            PanelStatus::Unavailable { .. } => None,
        }
    }

    pub fn stat(&self) -> Option<&StatTile> {
        match &self.status {
            PanelStatus::Ready { stat, .. } => Some(stat),
            PanelStatus::Unavailable { .. } => None,
        }
    }
}

/// Everything the presentation layer needs, derived from one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub panels: Vec<IndicatorPanel>,
    /// Newest `last_updated` across the available documents.
    pub last_updated: Option<DateTime<Utc>>,
}

impl DashboardView {
    pub fn panel(&self, indicator: Indicator) -> Option<&IndicatorPanel> {
        self.panels.iter().find(|p| p.indicator == indicator)
    }
}

/// Build one indicator's panel from its document.
pub fn build_panel(document: &SeriesDocument, config: &DashboardConfig) -> IndicatorPanel {
    let indicator = document.indicator;
    let kpi = compute_kpi_delta(document, indicator.delta_mode());
    IndicatorPanel {
        indicator,
        status: PanelStatus::Ready {
            chart: build_chart(document, config),
            stat: build_stat(indicator, &kpi),
        },
    }
}

/// Derive the full view from a snapshot.
pub fn build_view(snapshot: &DatasetSnapshot, config: &DashboardConfig) -> DashboardView {
    let panels = Indicator::ALL
        .iter()
        .map(|indicator| match snapshot.get(*indicator) {
            Some(document) => build_panel(document, config),
            None => IndicatorPanel {
                indicator: *indicator,
                status: PanelStatus::Unavailable {
                    reason: format!("No data for {}", indicator),
                },
            },
        })
        .collect();

    DashboardView {
        panels,
        last_updated: snapshot.freshness(),
    }
}

/// Apply every ready chart in `view` to `surface`.
///
/// A surface error for one chart is logged and does not stop the others.
/// Returns the number of charts applied.
pub fn render(view: &DashboardView, surface: &mut dyn ChartSurface) -> usize {
    let mut applied = 0;
    for panel in &view.panels {
        let Some(chart) = panel.chart() else {
            continue;
        };
        match surface.apply(chart) {
            Ok(()) => applied += 1,
            Err(e) => warn!("Could not render {} chart: {}", panel.indicator, e),
        }
    }
    applied
}

/// Load `config.data_dir` and build the view in one step.
pub fn load_view(config: &DashboardConfig) -> DashboardResult<DashboardView> {
    config.validate()?;
    let snapshot = load_snapshot(&config.data_dir);
    Ok(build_view(&snapshot, config))
}
