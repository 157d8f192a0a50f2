use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a sale. The state export uses integers, the JSON
/// written by the converter uses strings. Cleaning maps integer-looking text
/// to `Number`; any other text stays distinct from every `Number`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SerialNumber {
    Number(i64),
    Text(String),
}

impl SerialNumber {
    /// Interpret user input: integers become `Number`, anything else `Text`.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        match trimmed.parse::<i64>() {
            Ok(n) => SerialNumber::Number(n),
            Err(_) => SerialNumber::Text(trimmed.to_string()),
        }
    }

    /// Re-read integer-looking text as `Number`, so `"200500"` and `200500`
    /// identify the same sale.
    pub fn normalized(self) -> Self {
        match self {
            SerialNumber::Text(text) => SerialNumber::parse(&text),
            number => number,
        }
    }
}

impl fmt::Display for SerialNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerialNumber::Number(n) => write!(f, "{}", n),
            SerialNumber::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for SerialNumber {
    fn from(value: i64) -> Self {
        SerialNumber::Number(value)
    }
}

impl From<&str> for SerialNumber {
    fn from(value: &str) -> Self {
        SerialNumber::Text(value.to_string())
    }
}

/// A numeric-looking field as it arrives from a source, before coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawField {
    Number(f64),
    Text(String),
    Flag(bool),
}

impl fmt::Display for RawField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawField::Number(n) => write!(f, "{}", n),
            RawField::Text(s) => write!(f, "{:?}", s),
            RawField::Flag(b) => write!(f, "{}", b),
        }
    }
}

/// One entry of a data source. Field names follow the converter output
/// (snake_case) and also accept the column headers of the state CSV export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(default, alias = "Serial Number")]
    pub serial_number: Option<SerialNumber>,
    #[serde(default, alias = "List Year")]
    pub list_year: Option<RawField>,
    #[serde(default, alias = "Town")]
    pub town: Option<String>,
    #[serde(default, alias = "Property Type")]
    pub property_type: Option<String>,
    #[serde(default, alias = "Address")]
    pub address: Option<String>,
    #[serde(default, alias = "Assessed Value")]
    pub assessed_value: Option<RawField>,
    #[serde(default, alias = "Sale Amount")]
    pub sale_amount: Option<RawField>,
    #[serde(default, alias = "Sales Ratio")]
    pub sales_ratio: Option<RawField>,
}

/// A cleaned sale: both money fields are finite and non-negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub serial_number: SerialNumber,
    /// `None` when the source left the column blank.
    pub property_type: Option<String>,
    pub town: String,
    pub address: String,
    /// Assessed value in dollars.
    pub assessed_value: f64,
    /// Sale amount in dollars.
    pub sale_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sales_ratio: Option<f64>,
}

impl SaleRecord {
    pub fn new(
        serial_number: impl Into<SerialNumber>,
        property_type: &str,
        town: &str,
        assessed_value: f64,
        sale_amount: f64,
    ) -> Self {
        let property_type = if property_type.is_empty() {
            None
        } else {
            Some(property_type.to_string())
        };
        Self {
            serial_number: serial_number.into(),
            property_type,
            town: town.to_string(),
            address: String::new(),
            assessed_value,
            sale_amount,
            list_year: None,
            sales_ratio: None,
        }
    }

    pub fn with_address(mut self, address: &str) -> Self {
        self.address = address.to_string();
        self
    }

    /// Identity comparison used by every selection check.
    pub fn same_sale(&self, other: &SaleRecord) -> bool {
        self.serial_number == other.serial_number
    }

    /// The larger of the two money fields.
    pub fn peak_value(&self) -> f64 {
        self.assessed_value.max(self.sale_amount)
    }
}
