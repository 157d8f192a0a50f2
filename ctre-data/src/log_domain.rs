//! Shared domain for the log-scaled scatter axes.
//!
//! Both axes use the same bounds: a fixed positive floor (log scales cannot
//! reach zero) up to the largest assessed or sale value with multiplicative
//! headroom.

use ctre_sales::SaleRecord;
use log::warn;
use serde::Serialize;

pub const DEFAULT_LOG_FLOOR: f64 = 1000.0;
pub const DEFAULT_LOG_PADDING: f64 = 1.05;

/// Data maximum assumed when the dataset gives nothing usable.
pub const FALLBACK_DATA_MAX: f64 = 2_000_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LogDomain {
    pub min: f64,
    pub max: f64,
}

impl LogDomain {
    /// `[floor, FALLBACK_DATA_MAX * padding]`, widened if the floor is above it.
    pub fn fallback(floor: f64, padding: f64) -> Self {
        let (floor, padding) = sanitize(floor, padding);
        Self {
            min: floor,
            max: (FALLBACK_DATA_MAX * padding).max(floor * padding),
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

fn sanitize(floor: f64, padding: f64) -> (f64, f64) {
    let floor = if floor.is_finite() && floor > 0.0 {
        floor
    } else {
        warn!("Invalid log domain floor {}, using {}", floor, DEFAULT_LOG_FLOOR);
        DEFAULT_LOG_FLOOR
    };
    let padding = if padding.is_finite() && padding > 1.0 {
        padding
    } else {
        warn!(
            "Invalid log domain padding {}, using {}",
            padding, DEFAULT_LOG_PADDING
        );
        DEFAULT_LOG_PADDING
    };
    (floor, padding)
}

/// Compute the scatter domain for `records`.
///
/// Falls back to [`LogDomain::fallback`] for an empty dataset, an all-zero
/// dataset, or when the padded maximum would not clear the floor.
pub fn log_domain(records: &[SaleRecord], floor: f64, padding: f64) -> LogDomain {
    let (floor, padding) = sanitize(floor, padding);
    let data_max = records
        .iter()
        .map(SaleRecord::peak_value)
        .fold(0.0_f64, f64::max);

    let max = data_max * padding;
    if data_max <= 0.0 || !max.is_finite() || max <= floor {
        return LogDomain::fallback(floor, padding);
    }
    LogDomain { min: floor, max }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sale(assessed: f64, sale: f64) -> SaleRecord {
        SaleRecord::new(1, "Residential", "Avon", assessed, sale)
    }

    #[test]
    fn pads_the_largest_value() {
        let records = vec![sale(100000.0, 120000.0), sale(300000.0, 280000.0)];
        let domain = log_domain(&records, 1000.0, 1.05);
        assert_eq!(domain.min, 1000.0);
        assert_eq!(domain.max, 300000.0 * 1.05);
        assert!(records.iter().all(|r| domain.contains(r.sale_amount)));
    }

    #[test]
    fn empty_dataset_uses_fallback() {
        let domain = log_domain(&[], 1000.0, 1.05);
        assert_eq!(domain, LogDomain::fallback(1000.0, 1.05));
        assert_eq!(domain.max, FALLBACK_DATA_MAX * 1.05);
    }

    #[test]
    fn zero_and_tiny_datasets_use_fallback() {
        assert_eq!(
            log_domain(&[sale(0.0, 0.0)], 1000.0, 1.05),
            LogDomain::fallback(1000.0, 1.05)
        );
        assert_eq!(
            log_domain(&[sale(500.0, 10.0)], 1000.0, 1.05),
            LogDomain::fallback(1000.0, 1.05)
        );
    }

    #[test]
    fn overflowing_values_use_fallback() {
        let domain = log_domain(&[sale(f64::MAX, 1.0)], 1000.0, 1.05);
        assert!(domain.max.is_finite());
    }

    #[test]
    fn bad_parameters_never_leak_out() {
        let records = vec![sale(100000.0, 120000.0)];
        for floor in [0.0, -1.0, f64::NAN] {
            let domain = log_domain(&records, floor, 1.05);
            assert!(domain.min.is_finite() && domain.min > 0.0);
            assert!(domain.max > domain.min);
        }
        let domain = log_domain(&records, 1000.0, 0.5);
        assert_eq!(domain.max, 120000.0 * DEFAULT_LOG_PADDING);
    }

    #[test]
    fn high_floor_still_gives_a_valid_fallback() {
        let domain = LogDomain::fallback(5_000_000.0, 1.05);
        assert!(domain.max > domain.min);
    }
}
