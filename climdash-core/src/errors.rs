use std::path::PathBuf;
use thiserror::Error;

/// Error type for failed loads and invalid configuration.
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("{0}")]
    Error(String),
    #[error("Could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed series document {name}: {source}")]
    MalformedDocument {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Malformed configuration: {0}")]
    MalformedConfig(#[from] toml::de::Error),
    #[error("Invalid year window. Start={0} is after end={1}")]
    InvalidWindow(i32, i32),
}

/// Convenience type for `Result<T, DashboardError>`.
pub type DashboardResult<T> = Result<T, DashboardError>;
