use std::io;

use ctre_data::AggregationError;
use ctre_sales::{SerialNumber, SourceError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SelectionError {
    #[error("record {0} is not part of the loaded dataset")]
    NotInDataset(SerialNumber),
}

/// Everything the controller reports to its caller and to renderers.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("data source unavailable: {0}")]
    SourceUnavailable(#[from] SourceError),
    #[error("aggregation failed, previous view kept: {0}")]
    Aggregation(#[from] AggregationError),
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
