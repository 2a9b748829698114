//! Python bindings
//!
//! Exposes the dashboard pipeline as plain Python objects (dicts, lists,
//! floats and `None`) so a Python host can hand them to its own charting code.

use climdash_core::aggregate::{compute_kpi_delta, compute_reference_curve};
use climdash_core::chart::build_chart;
use climdash_core::config::DashboardConfig;
use climdash_core::dashboard::{build_view, load_snapshot};
use climdash_core::errors::DashboardError;
use climdash_core::indicator::Indicator;
use climdash_core::ingest::parse_document;
use climdash_core::normalize::recent_years;
use climdash_core::observation::SeriesDocument;
use climdash_core::stats::build_stat;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pythonize::pythonize;
use std::path::PathBuf;

fn to_py_err(e: DashboardError) -> PyErr {
    PyValueError::new_err(format!("{}", e))
}

fn document(indicator: &str, contents: &str) -> PyResult<SeriesDocument> {
    let indicator: Indicator = indicator.parse().map_err(to_py_err)?;
    parse_document(indicator, contents).map_err(to_py_err)
}

/// Load a data directory and return the full dashboard view.
#[pyfunction]
#[pyo3(signature = (data_dir=None, config=None))]
fn load_view(
    py: Python<'_>,
    data_dir: Option<PathBuf>,
    config: Option<PathBuf>,
) -> PyResult<PyObject> {
    let mut config = match config {
        Some(path) => DashboardConfig::from_file(&path).map_err(to_py_err)?,
        None => DashboardConfig::default(),
    };
    if let Some(data_dir) = data_dir {
        config.data_dir = data_dir;
    }
    let view = build_view(&load_snapshot(&config.data_dir), &config);
    Ok(pythonize(py, &view)?.into_py(py))
}

/// Year buckets for the `years` most recent years of a JSON document.
#[pyfunction]
fn year_buckets(
    py: Python<'_>,
    indicator: &str,
    contents: &str,
    years: usize,
) -> PyResult<PyObject> {
    let document = document(indicator, contents)?;
    Ok(pythonize(py, &recent_years(&document, years))?.into_py(py))
}

/// Per-month mean over `[start_year, end_year]`; absent months are `None`.
#[pyfunction]
fn reference_curve(
    indicator: &str,
    contents: &str,
    start_year: i32,
    end_year: i32,
) -> PyResult<Vec<Option<f64>>> {
    let document = document(indicator, contents)?;
    Ok(compute_reference_curve(&document, start_year, end_year)
        .values
        .to_vec())
}

/// Chart specification for a JSON document using the default configuration.
#[pyfunction]
fn chart(py: Python<'_>, indicator: &str, contents: &str) -> PyResult<PyObject> {
    let document = document(indicator, contents)?;
    let spec = build_chart(&document, &DashboardConfig::default());
    Ok(pythonize(py, &spec)?.into_py(py))
}

/// KPI tile for a JSON document.
#[pyfunction]
fn stat(py: Python<'_>, indicator: &str, contents: &str) -> PyResult<PyObject> {
    let document = document(indicator, contents)?;
    let kpi = compute_kpi_delta(&document, document.indicator.delta_mode());
    Ok(pythonize(py, &build_stat(document.indicator, &kpi))?.into_py(py))
}

#[pymodule]
#[pyo3(name = "_lib")]
fn climdash(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add_function(wrap_pyfunction!(load_view, m)?)?;
    m.add_function(wrap_pyfunction!(year_buckets, m)?)?;
    m.add_function(wrap_pyfunction!(reference_curve, m)?)?;
    m.add_function(wrap_pyfunction!(chart, m)?)?;
    m.add_function(wrap_pyfunction!(stat, m)?)?;
    Ok(())
}
