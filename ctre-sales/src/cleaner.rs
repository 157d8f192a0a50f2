//! Coercion of raw source entries into [`SaleRecord`]s.
//!
//! Money fields may arrive as JSON numbers or as numeric-looking strings.
//! Anything that does not coerce to a finite, non-negative amount removes the
//! record from the working set. Whether those removals are merely counted or
//! reported one by one is controlled by [`RejectionPolicy`].

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::RecordError;
use crate::record::{RawField, RawRecord, SaleRecord, SerialNumber};

/// What to do with records whose numeric fields fail coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionPolicy {
    /// Drop them and keep only a count.
    #[default]
    Silent,
    /// Drop them, log each one and return them in [`CleanOutcome::rejected`].
    Report,
}

/// A raw entry that did not survive cleaning.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRecord {
    /// Position in the raw input.
    pub index: usize,
    pub serial_number: Option<SerialNumber>,
    pub error: RecordError,
}

#[derive(Debug, Clone, Default)]
pub struct CleanOutcome {
    /// Surviving records, in input order.
    pub records: Vec<SaleRecord>,
    /// Populated only under [`RejectionPolicy::Report`].
    pub rejected: Vec<RejectedRecord>,
    pub rejected_count: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RecordCleaner {
    policy: RejectionPolicy,
}

impl RecordCleaner {
    pub fn new(policy: RejectionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> RejectionPolicy {
        self.policy
    }

    /// Clean every raw entry, preserving input order.
    pub fn clean(&self, raw: Vec<RawRecord>) -> CleanOutcome {
        let total = raw.len();
        let mut outcome = CleanOutcome {
            records: Vec::with_capacity(total),
            ..CleanOutcome::default()
        };

        for (index, entry) in raw.into_iter().enumerate() {
            let serial_number = entry.serial_number.clone();
            match clean_record(entry) {
                Ok(record) => outcome.records.push(record),
                Err(error) => {
                    outcome.rejected_count += 1;
                    match self.policy {
                        RejectionPolicy::Silent => {
                            debug!("Dropped record #{}: {}", index, error);
                        }
                        RejectionPolicy::Report => {
                            warn!(
                                "Rejected record #{} (serial {}): {}",
                                index,
                                serial_number
                                    .as_ref()
                                    .map(|s| s.to_string())
                                    .unwrap_or_else(|| "-".to_string()),
                                error
                            );
                            outcome.rejected.push(RejectedRecord {
                                index,
                                serial_number,
                                error,
                            });
                        }
                    }
                }
            }
        }

        info!(
            "Kept {} of {} records, rejected {}",
            outcome.records.len(),
            total,
            outcome.rejected_count
        );
        outcome
    }
}

/// Convert one raw entry into a sale record.
pub fn clean_record(raw: RawRecord) -> Result<SaleRecord, RecordError> {
    let serial_number = raw
        .serial_number
        .ok_or(RecordError::MissingSerial)?
        .normalized();
    let assessed_value = coerce_amount("assessed_value", raw.assessed_value.as_ref())?;
    let sale_amount = coerce_amount("sale_amount", raw.sale_amount.as_ref())?;

    let property_type = raw
        .property_type
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    Ok(SaleRecord {
        serial_number,
        property_type,
        town: raw.town.unwrap_or_default(),
        address: raw.address.unwrap_or_default(),
        assessed_value,
        sale_amount,
        list_year: raw.list_year.as_ref().and_then(coerce_year),
        sales_ratio: raw.sales_ratio.as_ref().and_then(coerce_number),
    })
}

/// Coerce a money field. Blank strings, booleans and missing values are not
/// treated as zero.
pub fn coerce_amount(field: &'static str, value: Option<&RawField>) -> Result<f64, RecordError> {
    let raw = value.ok_or(RecordError::MissingField { field })?;
    let amount = coerce_number(raw).ok_or_else(|| RecordError::NotANumber {
        field,
        value: raw.clone(),
    })?;
    if !amount.is_finite() || amount < 0.0 {
        return Err(RecordError::OutOfRange {
            field,
            value: amount,
        });
    }
    Ok(amount)
}

fn coerce_number(value: &RawField) -> Option<f64> {
    match value {
        RawField::Number(n) => Some(*n),
        RawField::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        RawField::Flag(_) => None,
    }
}

fn coerce_year(value: &RawField) -> Option<i32> {
    let n = coerce_number(value)?;
    if n.is_finite() && n.fract() == 0.0 && n >= i32::MIN as f64 && n <= i32::MAX as f64 {
        Some(n as i32)
    } else {
        None
    }
}
