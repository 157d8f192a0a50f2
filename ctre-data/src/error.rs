use thiserror::Error;

/// A recompute pass that could not produce a consistent result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AggregationError {
    #[error("bin size must be a positive finite number, got {0}")]
    InvalidBinSize(f64),
    #[error("{name} cap must be a positive finite number, got {value}")]
    InvalidCap { name: &'static str, value: f64 },
}
