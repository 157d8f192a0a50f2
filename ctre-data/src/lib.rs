//! Aggregations behind the three linked views.
//!
//! Every function here is a pure function of the records, the current
//! selection and its configuration, so a recompute pass can run them in any
//! order and get the same result twice.
//!
//! - `property_types`: per-type average sale and assessed value (dumbbell view)
//! - `assessed_bins`: mean sale per assessed-value bin, market and per town
//! - `log_domain`: shared bounds for the log-scaled scatter axes
//! - `scatter`: scatter points, palette and legend filter

pub mod assessed_bins;
pub mod error;
pub mod log_domain;
pub mod property_types;
pub mod scatter;

pub use error::AggregationError;
