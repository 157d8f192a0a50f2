//! Per-property-type averages for the dumbbell view.
//!
//! Each group carries the average sale and average assessed value of its
//! members; the group the selected record belongs to also carries that
//! record's own values so the view can draw it against the averages.

use std::collections::BTreeMap;

use ctre_sales::SaleRecord;
use serde::Serialize;

/// The selected record's values, overlaid on its property-type group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedPoint {
    pub selected_sale: f64,
    pub selected_assessed: f64,
    pub selected_range: [f64; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyTypeStat {
    #[serde(rename = "type")]
    pub property_type: String,
    pub count: usize,
    pub avg_sale: f64,
    pub avg_assessed: f64,
    /// `[min(avg_sale, avg_assessed), max(avg_sale, avg_assessed)]`
    pub range: [f64; 2],
    pub is_selected_type: bool,
    #[serde(flatten)]
    pub selected: Option<SelectedPoint>,
}

#[derive(Default)]
struct Totals {
    sale: f64,
    assessed: f64,
    count: usize,
}

fn ordered_pair(a: f64, b: f64) -> [f64; 2] {
    [a.min(b), a.max(b)]
}

/// Group `records` by property type, sorted by type name.
///
/// Records without a property type are left out. Groups only exist for types
/// that have members, so every average divides by a non-zero count.
pub fn aggregate_property_types(
    records: &[SaleRecord],
    selection: Option<&SaleRecord>,
) -> Vec<PropertyTypeStat> {
    let mut groups: BTreeMap<&str, Totals> = BTreeMap::new();
    for record in records {
        let Some(property_type) = record.property_type.as_deref() else {
            continue;
        };
        let totals = groups.entry(property_type).or_default();
        totals.sale += record.sale_amount;
        totals.assessed += record.assessed_value;
        totals.count += 1;
    }

    let selected_type = selection.and_then(|s| s.property_type.as_deref());

    groups
        .into_iter()
        .map(|(property_type, totals)| {
            let avg_sale = totals.sale / totals.count as f64;
            let avg_assessed = totals.assessed / totals.count as f64;
            let is_selected_type = selected_type == Some(property_type);
            let selected = selection.filter(|_| is_selected_type).map(|s| SelectedPoint {
                selected_sale: s.sale_amount,
                selected_assessed: s.assessed_value,
                selected_range: ordered_pair(s.sale_amount, s.assessed_value),
            });
            PropertyTypeStat {
                property_type: property_type.to_string(),
                count: totals.count,
                avg_sale,
                avg_assessed,
                range: ordered_pair(avg_sale, avg_assessed),
                is_selected_type,
                selected,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_residential() -> Vec<SaleRecord> {
        vec![
            SaleRecord::new(1, "Residential", "Avon", 100000.0, 120000.0),
            SaleRecord::new(2, "Residential", "Avon", 300000.0, 280000.0),
        ]
    }

    #[test]
    fn averages_a_single_group() {
        let stats = aggregate_property_types(&two_residential(), None);
        assert_eq!(stats.len(), 1);
        let group = &stats[0];
        assert_eq!(group.property_type, "Residential");
        assert_eq!(group.count, 2);
        assert_eq!(group.avg_assessed, 200000.0);
        assert_eq!(group.avg_sale, 200000.0);
        assert_eq!(group.range, [200000.0, 200000.0]);
        assert!(!group.is_selected_type);
        assert_eq!(group.selected, None);
    }

    #[test]
    fn selection_overlays_its_group() {
        let records = two_residential();
        let stats = aggregate_property_types(&records, Some(&records[0]));
        let group = &stats[0];
        assert!(group.is_selected_type);
        assert_eq!(
            group.selected,
            Some(SelectedPoint {
                selected_sale: 120000.0,
                selected_assessed: 100000.0,
                selected_range: [100000.0, 120000.0],
            })
        );
    }

    #[test]
    fn groups_are_sorted_and_counted() {
        let records = vec![
            SaleRecord::new(1, "Vacant Land", "Avon", 10.0, 20.0),
            SaleRecord::new(2, "Commercial", "Avon", 30.0, 10.0),
            SaleRecord::new(3, "Residential", "Avon", 5.0, 5.0),
            SaleRecord::new(4, "Commercial", "Avon", 50.0, 30.0),
            SaleRecord::new(5, "", "Avon", 1.0, 1.0),
        ];
        let stats = aggregate_property_types(&records, Some(&records[2]));
        let names: Vec<_> = stats.iter().map(|s| s.property_type.as_str()).collect();
        assert_eq!(names, vec!["Commercial", "Residential", "Vacant Land"]);

        let total: usize = stats.iter().map(|s| s.count).sum();
        let typed = records.iter().filter(|r| r.property_type.is_some()).count();
        assert_eq!(total, typed);

        let commercial = &stats[0];
        assert_eq!(commercial.avg_assessed, 40.0);
        assert_eq!(commercial.avg_sale, 20.0);
        assert_eq!(commercial.range, [20.0, 40.0]);
        assert!(!commercial.is_selected_type);
        assert!(stats[1].is_selected_type);
        assert!(stats[2].selected.is_none());
    }

    #[test]
    fn zero_means_give_zero_range() {
        let records = vec![SaleRecord::new(1, "Residential", "Avon", 0.0, 0.0)];
        let stats = aggregate_property_types(&records, None);
        assert_eq!(stats[0].range, [0.0, 0.0]);
    }

    #[test]
    fn empty_input_has_no_groups() {
        assert!(aggregate_property_types(&[], None).is_empty());
    }

    #[test]
    fn serializes_with_flattened_overlay() {
        let records = two_residential();
        let stats = aggregate_property_types(&records, Some(&records[1]));
        let json = serde_json::to_value(&stats[0]).unwrap();
        assert_eq!(json["type"], "Residential");
        assert_eq!(json["selected_sale"], 280000.0);

        let plain = serde_json::to_value(&aggregate_property_types(&records, None)[0]).unwrap();
        assert!(plain.get("selected_sale").is_none());
    }
}
