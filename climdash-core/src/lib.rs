//! Normalisation and derived statistics for a three-indicator climate dashboard.
//!
//! The crate turns locally stored JSON snapshots of CO2 concentration, global
//! temperature anomaly and Arctic sea-ice extent into render-ready chart
//! specifications and KPI tiles.
//!
//! # Module Organisation
//!
//! - `ingest`: wire adapters producing a uniform [`observation::SeriesDocument`]
//! - `normalize`: year-bucketed, month-indexed series
//! - `aggregate`: reference curves and KPI deltas
//! - `chart`: chart specifications with per-series style hints
//! - `stats`: formatted KPI tiles
//! - `dashboard`: snapshot loading and the per-session view model
//!
//! Every derived structure is recomputed from the input documents; nothing is
//! mutated in place.

pub mod aggregate;
pub mod chart;
pub mod config;
pub mod dashboard;
pub mod indicator;
pub mod ingest;
pub mod normalize;
pub mod observation;
pub mod stats;
pub mod surface;

pub mod errors;
