//! Point and legend data for the sale vs. assessed scatter view.

use std::collections::BTreeSet;

use ctre_sales::{SaleRecord, SerialNumber};
use serde::Serialize;

/// Fixed palette per property type.
pub const PROPERTY_TYPE_COLORS: [(&str, &str); 6] = [
    ("Residential", "#8884d8"),
    ("Commercial", "#82ca9d"),
    ("Industrial", "#FFC658"),
    ("Apartments", "#FF7300"),
    ("Public Utility", "#0088FE"),
    ("Vacant Land", "#AA336A"),
];

pub const FALLBACK_COLOR: &str = "#cbd5e1";

/// Opacity of points hidden by the legend filter.
pub const DIMMED_OPACITY: f64 = 0.1;

pub fn property_type_color(property_type: Option<&str>) -> &'static str {
    property_type
        .and_then(|t| {
            PROPERTY_TYPE_COLORS
                .iter()
                .find(|(name, _)| *name == t)
                .map(|(_, color)| *color)
        })
        .unwrap_or(FALLBACK_COLOR)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub serial_number: SerialNumber,
    pub property_type: Option<String>,
    pub sale_amount: f64,
    pub assessed_value: f64,
    pub color: &'static str,
    pub is_selected: bool,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub property_type: String,
    pub color: &'static str,
    pub active: bool,
}

/// The scatter legend's single active property type, if any.
///
/// Clicking the active type again clears it, clicking another replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegendFilter {
    active: Option<String>,
}

impl LegendFilter {
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn toggle(&mut self, property_type: &str) {
        if self.active.as_deref() == Some(property_type) {
            self.active = None;
        } else {
            self.active = Some(property_type.to_string());
        }
    }

    pub fn clear(&mut self) {
        self.active = None;
    }
}

/// One point per record, in dataset order.
///
/// Points outside the active legend type are dimmed; the selected point is
/// always fully opaque.
pub fn scatter_points(
    records: &[SaleRecord],
    selection: Option<&SaleRecord>,
    active_type: Option<&str>,
) -> Vec<ScatterPoint> {
    records
        .iter()
        .map(|record| {
            let is_selected = selection.is_some_and(|s| s.same_sale(record));
            let filtered_out = active_type
                .is_some_and(|active| record.property_type.as_deref() != Some(active));
            let opacity = if filtered_out && !is_selected {
                DIMMED_OPACITY
            } else {
                1.0
            };
            ScatterPoint {
                serial_number: record.serial_number.clone(),
                property_type: record.property_type.clone(),
                sale_amount: record.sale_amount,
                assessed_value: record.assessed_value,
                color: property_type_color(record.property_type.as_deref()),
                is_selected,
                opacity,
            }
        })
        .collect()
}

/// Legend entries for every property type present, sorted by name.
pub fn legend_entries(records: &[SaleRecord], active_type: Option<&str>) -> Vec<LegendEntry> {
    let types: BTreeSet<&str> = records
        .iter()
        .filter_map(|r| r.property_type.as_deref())
        .collect();
    types
        .into_iter()
        .map(|t| LegendEntry {
            property_type: t.to_string(),
            color: property_type_color(Some(t)),
            active: active_type == Some(t),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<SaleRecord> {
        vec![
            SaleRecord::new(1, "Residential", "Avon", 100.0, 200.0),
            SaleRecord::new(2, "Commercial", "Avon", 300.0, 400.0),
            SaleRecord::new(3, "Houseboat", "Avon", 500.0, 600.0),
        ]
    }

    #[test]
    fn colors_fall_back_for_unknown_types() {
        assert_eq!(property_type_color(Some("Residential")), "#8884d8");
        assert_eq!(property_type_color(Some("Houseboat")), FALLBACK_COLOR);
        assert_eq!(property_type_color(None), FALLBACK_COLOR);
    }

    #[test]
    fn selection_is_marked_by_serial() {
        let records = records();
        let clicked = SaleRecord::new(2, "Commercial", "Elsewhere", 0.0, 0.0);
        let points = scatter_points(&records, Some(&clicked), None);
        let selected: Vec<_> = points.iter().filter(|p| p.is_selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].serial_number, SerialNumber::Number(2));
        assert!(points.iter().all(|p| p.opacity == 1.0));
    }

    #[test]
    fn legend_filter_dims_other_types_but_not_the_selection() {
        let records = records();
        let points = scatter_points(&records, Some(&records[2]), Some("Residential"));
        assert_eq!(points[0].opacity, 1.0);
        assert_eq!(points[1].opacity, DIMMED_OPACITY);
        assert_eq!(points[2].opacity, 1.0);
    }

    #[test]
    fn legend_filter_toggles() {
        let mut filter = LegendFilter::default();
        filter.toggle("Residential");
        assert_eq!(filter.active(), Some("Residential"));
        filter.toggle("Commercial");
        assert_eq!(filter.active(), Some("Commercial"));
        filter.toggle("Commercial");
        assert_eq!(filter.active(), None);
    }

    #[test]
    fn legend_lists_present_types() {
        let entries = legend_entries(&records(), Some("Commercial"));
        let names: Vec<_> = entries.iter().map(|e| e.property_type.as_str()).collect();
        assert_eq!(names, vec!["Commercial", "Houseboat", "Residential"]);
        assert!(entries[0].active);
        assert!(!entries[2].active);
    }
}
