use std::rc::Rc;

use ctre_data::assessed_bins::{compare_town, TownComparison};
use ctre_data::log_domain::{log_domain, LogDomain};
use ctre_data::property_types::{aggregate_property_types, PropertyTypeStat};
use ctre_data::scatter::{legend_entries, scatter_points, LegendEntry, ScatterPoint};
use ctre_data::AggregationError;
use ctre_sales::SaleRecord;
use serde::Serialize;

use crate::config::DashboardConfig;

/// Output of one recompute pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregations {
    pub property_types: Vec<PropertyTypeStat>,
    pub town_comparison: TownComparison,
    pub log_domain: LogDomain,
    pub scatter: Vec<ScatterPoint>,
    pub legend: Vec<LegendEntry>,
}

/// Run every aggregation against the same inputs.
///
/// Either all of them succeed or none of the results are returned.
pub fn aggregate(
    records: &[SaleRecord],
    selection: Option<&SaleRecord>,
    active_type: Option<&str>,
    config: &DashboardConfig,
) -> Result<Aggregations, AggregationError> {
    let town_comparison = compare_town(records, selection, &config.binning())?;
    Ok(Aggregations {
        property_types: aggregate_property_types(records, selection),
        town_comparison,
        log_domain: log_domain(records, config.log_domain_floor, config.log_domain_padding),
        scatter: scatter_points(records, selection, active_type),
        legend: legend_entries(records, active_type),
    })
}

/// The bundle handed to renderers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    /// Bumped on every publish.
    pub revision: u64,
    pub dataset: Rc<[SaleRecord]>,
    pub selection: Option<SaleRecord>,
    pub active_type: Option<String>,
    #[serde(flatten)]
    pub aggregations: Aggregations,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<SaleRecord> {
        vec![
            SaleRecord::new(1, "Residential", "Avon", 100000.0, 120000.0),
            SaleRecord::new(2, "Residential", "Bristol", 300000.0, 280000.0),
            SaleRecord::new(3, "Commercial", "Avon", 250000.0, 400000.0),
        ]
    }

    #[test]
    fn recompute_is_deterministic() {
        let records = records();
        let config = DashboardConfig::default();
        let first = aggregate(&records, Some(&records[0]), Some("Commercial"), &config).unwrap();
        let second = aggregate(&records, Some(&records[0]), Some("Commercial"), &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn selection_feeds_every_view() {
        let records = records();
        let config = DashboardConfig::default();
        let result = aggregate(&records, Some(&records[2]), None, &config).unwrap();

        assert_eq!(result.town_comparison.town.as_deref(), Some("Avon"));
        assert_eq!(result.town_comparison.town_series.len(), 2);
        let commercial = result
            .property_types
            .iter()
            .find(|s| s.property_type == "Commercial")
            .unwrap();
        assert!(commercial.is_selected_type);
        assert_eq!(result.scatter.iter().filter(|p| p.is_selected).count(), 1);
    }

    #[test]
    fn invalid_binning_fails_the_whole_pass() {
        let config = DashboardConfig {
            bin_size: 0.0,
            ..DashboardConfig::default()
        };
        assert_eq!(
            aggregate(&records(), None, None, &config),
            Err(AggregationError::InvalidBinSize(0.0))
        );
    }

    #[test]
    fn bundle_serializes_flat() {
        let records = records();
        let config = DashboardConfig::default();
        let view = ViewModel {
            revision: 1,
            dataset: Rc::from(records.clone()),
            selection: None,
            active_type: None,
            aggregations: aggregate(&records, None, None, &config).unwrap(),
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["revision"], 1);
        assert!(json["property_types"].is_array());
        assert!(json["log_domain"]["min"].is_number());
        assert_eq!(json["dataset"].as_array().unwrap().len(), 3);
    }
}
