//! Sale record types and the load pipeline that feeds the dashboard.
//!
//! - `record`: raw and cleaned sale records, serial numbers
//! - `source`: reading JSON/CSV (optionally gzip) files and URLs
//! - `cleaner`: numeric coercion and rejection of invalid records
//! - `sampler`: bounded uniform subsampling
//! - `convert`: CSV export → filtered JSON projection
//!
//! ```rust
//! use ctre_sales::cleaner::{RecordCleaner, RejectionPolicy};
//! use ctre_sales::source::parse_json;
//!
//! let raw = parse_json(
//!     br#"[{"serial_number": 1, "assessed_value": "100000", "sale_amount": 120000},
//!          {"serial_number": 2, "assessed_value": "n/a", "sale_amount": 5}]"#,
//!     "inline.json",
//! )
//! .unwrap();
//! let outcome = RecordCleaner::new(RejectionPolicy::Silent).clean(raw);
//! assert_eq!(outcome.records.len(), 1);
//! assert_eq!(outcome.rejected_count, 1);
//! ```

pub mod cleaner;
pub mod convert;
pub mod error;
pub mod record;
pub mod sampler;
pub mod source;

pub use error::{ConvertError, RecordError, SourceError};
pub use record::{RawField, RawRecord, SaleRecord, SerialNumber};
