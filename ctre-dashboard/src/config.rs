//! Dashboard configuration.
//!
//! Every field has a default, so a JSON file only needs the keys it changes:
//!
//! ```json
//! { "bin_size": 100000, "sale_value_cap": null, "sample_seed": 7 }
//! ```
//!
//! A `null` cap disables that outlier filter.

use std::fs;
use std::path::Path;

use ctre_data::assessed_bins::{
    BinningConfig, DEFAULT_ASSESSED_CAP, DEFAULT_BIN_SIZE, DEFAULT_SALE_CAP,
};
use ctre_data::log_domain::{DEFAULT_LOG_FLOOR, DEFAULT_LOG_PADDING};
use ctre_sales::cleaner::{RecordCleaner, RejectionPolicy};
use ctre_sales::sampler::Sampler;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_MAX_SAMPLE_SIZE: usize = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Width of an assessed-value bin in dollars.
    pub bin_size: f64,
    /// Dataset size cap applied once after cleaning.
    pub max_sample_size: usize,
    /// Lowest value on the log-scaled axes.
    pub log_domain_floor: f64,
    /// Multiplicative headroom above the largest value.
    pub log_domain_padding: f64,
    pub assessed_value_cap: Option<f64>,
    pub sale_value_cap: Option<f64>,
    /// Fixes the sample for reproducible runs.
    pub sample_seed: Option<u64>,
    pub rejection_policy: RejectionPolicy,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            bin_size: DEFAULT_BIN_SIZE,
            max_sample_size: DEFAULT_MAX_SAMPLE_SIZE,
            log_domain_floor: DEFAULT_LOG_FLOOR,
            log_domain_padding: DEFAULT_LOG_PADDING,
            assessed_value_cap: Some(DEFAULT_ASSESSED_CAP),
            sale_value_cap: Some(DEFAULT_SALE_CAP),
            sample_seed: None,
            rejection_policy: RejectionPolicy::Silent,
        }
    }
}

impl DashboardConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &'static str, reason: String| ConfigError::Invalid { field, reason };

        if self.max_sample_size == 0 {
            return Err(invalid("max_sample_size", "must be at least 1".to_string()));
        }
        if !(self.log_domain_floor.is_finite() && self.log_domain_floor > 0.0) {
            return Err(invalid(
                "log_domain_floor",
                format!("must be a positive number, got {}", self.log_domain_floor),
            ));
        }
        if !(self.log_domain_padding.is_finite() && self.log_domain_padding > 1.0) {
            return Err(invalid(
                "log_domain_padding",
                format!("must be greater than 1, got {}", self.log_domain_padding),
            ));
        }
        self.binning()
            .validate()
            .map_err(|e| invalid("binning", e.to_string()))?;
        Ok(())
    }

    pub fn binning(&self) -> BinningConfig {
        BinningConfig {
            bin_size: self.bin_size,
            assessed_cap: self.assessed_value_cap,
            sale_cap: self.sale_value_cap,
        }
    }

    pub fn sampler(&self) -> Sampler {
        Sampler::new(self.max_sample_size, self.sample_seed)
    }

    pub fn cleaner(&self) -> RecordCleaner {
        RecordCleaner::new(self.rejection_policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_dashboard() {
        let config = DashboardConfig::default();
        assert_eq!(config.bin_size, 200000.0);
        assert_eq!(config.max_sample_size, 1000);
        assert_eq!(config.log_domain_floor, 1000.0);
        assert_eq!(config.log_domain_padding, 1.05);
        assert_eq!(config.assessed_value_cap, Some(3_200_000.0));
        assert_eq!(config.sale_value_cap, Some(3_000_000.0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config = DashboardConfig::from_json_str(
            r#"{"bin_size": 100000, "sale_value_cap": null, "rejection_policy": "report"}"#,
        )
        .unwrap();
        assert_eq!(config.bin_size, 100000.0);
        assert_eq!(config.sale_value_cap, None);
        assert_eq!(config.assessed_value_cap, Some(3_200_000.0));
        assert_eq!(config.rejection_policy, RejectionPolicy::Report);
    }

    #[test]
    fn invalid_values_are_rejected() {
        for json in [
            r#"{"bin_size": 0}"#,
            r#"{"max_sample_size": 0}"#,
            r#"{"log_domain_floor": -1}"#,
            r#"{"log_domain_padding": 1.0}"#,
            r#"{"assessed_value_cap": 0}"#,
        ] {
            assert!(
                matches!(
                    DashboardConfig::from_json_str(json),
                    Err(ConfigError::Invalid { .. })
                ),
                "{} should be invalid",
                json
            );
        }
    }

    #[test]
    fn unparseable_json_is_a_parse_error() {
        assert!(matches!(
            DashboardConfig::from_json_str("{bin_size"),
            Err(ConfigError::Parse(_))
        ));
    }
}
