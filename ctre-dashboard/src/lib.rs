//! Linked-views dashboard core.
//!
//! A [`DashboardController`] owns the sampled dataset, the selected sale and
//! the legend filter. Renderers register per [`ViewSlot`] and receive a
//! complete [`ViewModel`] after every load, selection or legend change.
//!
//! ```
//! use ctre_dashboard::{DashboardConfig, DashboardController};
//! use ctre_sales::source::parse_json;
//! use ctre_sales::SerialNumber;
//!
//! let raw = parse_json(
//!     br#"[{"serial_number": 1, "property_type": "Residential", "town": "Avon",
//!           "address": "1 MAIN ST", "assessed_value": "100000", "sale_amount": 120000}]"#,
//!     "inline",
//! )
//! .unwrap();
//! let mut dashboard = DashboardController::new(DashboardConfig::default()).unwrap();
//! dashboard.load(raw).unwrap();
//! dashboard.select_serial(&SerialNumber::Number(1)).unwrap();
//! let view = dashboard.view_model().unwrap();
//! assert_eq!(view.aggregations.town_comparison.town.as_deref(), Some("Avon"));
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod renderer;
pub mod selection;
pub mod view_model;

pub use config::DashboardConfig;
pub use controller::{DashboardController, LoadOutcome, LoadTicket, Phase, UpdateOutcome};
pub use error::{ConfigError, DashboardError, SelectionError};
pub use renderer::{PublishReport, Renderer, RendererRegistry, ViewSlot};
pub use selection::{Selection, SelectionStore};
pub use view_model::{Aggregations, ViewModel};
