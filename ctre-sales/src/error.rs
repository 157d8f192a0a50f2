use std::io;

use thiserror::Error;

use crate::record::RawField;

/// Failures that leave the dashboard without a dataset.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("data source {origin} is empty")]
    Empty { origin: String },
    #[error("no usable records after cleaning ({rejected} rejected)")]
    NoValidRecords { rejected: usize },
    #[error("failed to read {origin}: {source}")]
    Io {
        origin: String,
        #[source]
        source: io::Error,
    },
    #[error("malformed data in {origin}: {reason}")]
    Malformed { origin: String, reason: String },
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },
}

/// Why a single raw record was excluded from the working set.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("missing serial number")]
    MissingSerial,
    #[error("{field} is missing")]
    MissingField { field: &'static str },
    #[error("{field} value {value} is not a number")]
    NotANumber { field: &'static str, value: RawField },
    #[error("{field} value {value} is not a finite non-negative amount")]
    OutOfRange { field: &'static str, value: f64 },
}

/// Failures of the CSV to JSON conversion.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("start year {start} is after end year {end}")]
    InvalidYearRange { start: i32, end: i32 },
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}
