//! Assessed-value binning for the town vs. market comparison view.
//!
//! Records are bucketed by `floor(assessed_value / bin_size) * bin_size` and
//! each bucket reports the mean sale amount of its members. Outlier caps are
//! applied to this aggregation only; the shared dataset is never touched.

use std::collections::BTreeMap;

use ctre_sales::SaleRecord;
use log::warn;
use serde::Serialize;

use crate::error::AggregationError;

pub const DEFAULT_BIN_SIZE: f64 = 200_000.0;
pub const DEFAULT_ASSESSED_CAP: f64 = 3_200_000.0;
pub const DEFAULT_SALE_CAP: f64 = 3_000_000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinningConfig {
    pub bin_size: f64,
    /// Records assessed above this are left out of the bins.
    pub assessed_cap: Option<f64>,
    /// Records sold above this are left out of the bins.
    pub sale_cap: Option<f64>,
}

impl Default for BinningConfig {
    fn default() -> Self {
        Self {
            bin_size: DEFAULT_BIN_SIZE,
            assessed_cap: Some(DEFAULT_ASSESSED_CAP),
            sale_cap: Some(DEFAULT_SALE_CAP),
        }
    }
}

impl BinningConfig {
    pub fn uncapped(bin_size: f64) -> Self {
        Self {
            bin_size,
            assessed_cap: None,
            sale_cap: None,
        }
    }

    pub fn validate(&self) -> Result<(), AggregationError> {
        if !(self.bin_size.is_finite() && self.bin_size > 0.0) {
            return Err(AggregationError::InvalidBinSize(self.bin_size));
        }
        for (name, cap) in [("assessed value", self.assessed_cap), ("sale", self.sale_cap)] {
            if let Some(value) = cap {
                if !(value.is_finite() && value > 0.0) {
                    return Err(AggregationError::InvalidCap { name, value });
                }
            }
        }
        Ok(())
    }

    /// Start of the bin `assessed_value` falls into, or `None` when no bin
    /// start satisfies `start <= assessed_value < start + bin_size` in `f64`.
    pub fn bin_start(&self, assessed_value: f64) -> Option<f64> {
        self.bin_index(assessed_value)
            .map(|index| index as f64 * self.bin_size)
    }

    fn bin_index(&self, assessed_value: f64) -> Option<i64> {
        let quotient = (assessed_value / self.bin_size).floor();
        if !(quotient >= i64::MIN as f64 && quotient < i64::MAX as f64) {
            return None;
        }
        let index = quotient as i64;
        // Division rounding can land one bin off.
        [index, index.saturating_sub(1), index.saturating_add(1)]
            .into_iter()
            .find(|&i| {
                let start = i as f64 * self.bin_size;
                start <= assessed_value && assessed_value < start + self.bin_size
            })
    }

    fn within_caps(&self, record: &SaleRecord) -> bool {
        self.assessed_cap.map_or(true, |cap| record.assessed_value <= cap)
            && self.sale_cap.map_or(true, |cap| record.sale_amount <= cap)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessedBin {
    pub bin_start: f64,
    pub avg_sale_amount: f64,
    pub count: usize,
}

/// The market-wide series plus, when a town is known, that town's series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TownComparison {
    pub town: Option<String>,
    pub market: Vec<AssessedBin>,
    /// Empty when `town` is `None`.
    pub town_series: Vec<AssessedBin>,
}

/// Bin every record within the caps, sorted by `bin_start`.
pub fn bin_by_assessed(
    records: &[SaleRecord],
    config: &BinningConfig,
) -> Result<Vec<AssessedBin>, AggregationError> {
    bin_matching(records, config, |_| true)
}

/// Same as [`bin_by_assessed`] restricted to sales in `town`.
pub fn bin_by_assessed_in_town(
    records: &[SaleRecord],
    town: &str,
    config: &BinningConfig,
) -> Result<Vec<AssessedBin>, AggregationError> {
    bin_matching(records, config, |r| r.town == town)
}

/// Build both series; the town comes from the selected record.
pub fn compare_town(
    records: &[SaleRecord],
    selection: Option<&SaleRecord>,
    config: &BinningConfig,
) -> Result<TownComparison, AggregationError> {
    let market = bin_by_assessed(records, config)?;
    let town = selection.map(|s| s.town.clone());
    let town_series = match &town {
        Some(name) => bin_by_assessed_in_town(records, name, config)?,
        None => Vec::new(),
    };
    Ok(TownComparison {
        town,
        market,
        town_series,
    })
}

fn bin_matching(
    records: &[SaleRecord],
    config: &BinningConfig,
    keep: impl Fn(&SaleRecord) -> bool,
) -> Result<Vec<AssessedBin>, AggregationError> {
    config.validate()?;

    let mut bins: BTreeMap<i64, (f64, usize)> = BTreeMap::new();
    for record in records {
        if !config.within_caps(record) || !keep(record) {
            continue;
        }
        let Some(index) = config.bin_index(record.assessed_value) else {
            warn!(
                "Assessed value {} of record {} has no bin of size {}, skipping",
                record.assessed_value, record.serial_number, config.bin_size
            );
            continue;
        };
        let entry = bins.entry(index).or_insert((0.0, 0));
        entry.0 += record.sale_amount;
        entry.1 += 1;
    }

    let mut result = Vec::with_capacity(bins.len());
    for (index, (total, count)) in bins {
        let avg_sale_amount = total / count as f64;
        if !avg_sale_amount.is_finite() {
            warn!(
                "Dropping assessed bin {} with non-finite mean ({} records)",
                index, count
            );
            continue;
        }
        result.push(AssessedBin {
            bin_start: index as f64 * config.bin_size,
            avg_sale_amount,
            count,
        });
    }
    Ok(result)
}
