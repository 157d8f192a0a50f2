//! Conversion of the state sales CSV export into the JSON array the dashboard
//! loads.
//!
//! Rows can be filtered by list-year range, town and property type (both
//! case-insensitive). Kept rows are projected onto [`PROJECTION_FIELDS`] with
//! snake_case keys; numeric columns are converted and become `null` when the
//! conversion fails.

use std::collections::HashMap;
use std::io::{Read, Write};

use log::info;
use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::error::ConvertError;

pub const COL_YEAR: &str = "List Year";
pub const COL_TOWN: &str = "Town";
pub const COL_TYPE: &str = "Property Type";

/// Columns carried into the JSON output.
pub const PROJECTION_FIELDS: [&str; 8] = [
    "Serial Number",
    COL_YEAR,
    COL_TOWN,
    COL_TYPE,
    "Assessed Value",
    "Sale Amount",
    "Sales Ratio",
    "Address",
];

/// Projected keys converted to numbers.
const NUMERIC_KEYS: [&str; 4] = ["assessed_value", "sale_amount", "sales_ratio", "list_year"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertFilter {
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    pub town: Option<String>,
    pub property_type: Option<String>,
}

impl ConvertFilter {
    pub fn validate(&self) -> Result<(), ConvertError> {
        if let (Some(start), Some(end)) = (self.start_year, self.end_year) {
            if start > end {
                return Err(ConvertError::InvalidYearRange { start, end });
            }
        }
        Ok(())
    }

    fn has_year_bounds(&self) -> bool {
        self.start_year.is_some() || self.end_year.is_some()
    }

    /// `year` is `None` when the row has no parseable list year.
    fn accepts(&self, year: Option<i32>, town: &str, property_type: &str) -> bool {
        if self.has_year_bounds() {
            let Some(year) = year else {
                return false;
            };
            if self.start_year.is_some_and(|start| year < start) {
                return false;
            }
            if self.end_year.is_some_and(|end| year > end) {
                return false;
            }
        }
        if let Some(wanted) = &self.town {
            if !town.eq_ignore_ascii_case(wanted) {
                return false;
            }
        }
        if let Some(wanted) = &self.property_type {
            if !property_type.eq_ignore_ascii_case(wanted) {
                return false;
            }
        }
        true
    }
}

/// Result of a conversion pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversion {
    pub rows_read: usize,
    pub rows: Vec<Map<String, Value>>,
}

/// `"Sale Amount"` → `"sale_amount"`.
pub fn snake_key(header: &str) -> String {
    header.to_lowercase().replace(' ', "_")
}

/// Read the header row of a CSV export.
pub fn csv_headers<R: Read>(reader: R) -> Result<Vec<String>, ConvertError> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
    Ok(rdr.headers()?.iter().map(str::to_string).collect())
}

/// Filter and project every row of a CSV export.
pub fn convert_csv<R: Read>(reader: R, filter: &ConvertFilter) -> Result<Conversion, ConvertError> {
    filter.validate()?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns: HashMap<String, usize> = rdr
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| (h.to_string(), i))
        .collect();
    let column = |record: &csv::StringRecord, name: &str| -> Option<String> {
        columns
            .get(name)
            .and_then(|&i| record.get(i))
            .map(str::to_string)
    };

    let mut rows_read = 0usize;
    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows_read += 1;

        // A missing year column reads as year 0; an unparseable value drops the row.
        let year = match column(&record, COL_YEAR) {
            Some(raw) => raw.trim().parse::<i32>().ok(),
            None => Some(0),
        };
        let town = column(&record, COL_TOWN).unwrap_or_default();
        let property_type = column(&record, COL_TYPE).unwrap_or_default();
        if !filter.accepts(year, &town, &property_type) {
            continue;
        }

        let mut projected = Map::new();
        for field in PROJECTION_FIELDS {
            let key = snake_key(field);
            let value = match column(&record, field) {
                None => Value::Null,
                Some(raw) if NUMERIC_KEYS.contains(&key.as_str()) => convert_number(&key, &raw),
                Some(raw) => Value::String(raw),
            };
            projected.insert(key, value);
        }
        rows.push(projected);
    }

    info!(
        "Kept {} of {} rows",
        rows.len(),
        rows_read
    );
    Ok(Conversion { rows_read, rows })
}

/// Decimal values and the sales ratio become floats, the rest integers.
fn convert_number(key: &str, raw: &str) -> Value {
    let raw = raw.trim();
    if raw.contains('.') || key == "sales_ratio" {
        raw.parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    } else {
        raw.parse::<i64>()
            .map(|n| Value::Number(n.into()))
            .unwrap_or(Value::Null)
    }
}

/// Write rows as an indented JSON array.
pub fn write_json<W: Write>(writer: W, rows: &[Map<String, Value>]) -> Result<(), ConvertError> {
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(writer, formatter);
    rows.serialize(&mut ser)?;
    Ok(())
}
