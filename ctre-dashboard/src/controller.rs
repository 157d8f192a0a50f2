//! Orchestration of load, selection and recompute passes.
//!
//! The controller owns the dataset, the selection and the legend filter.
//! Every state change that affects what is drawn ends in one recompute pass
//! and one publish of a complete [`ViewModel`].

use std::rc::Rc;

use ctre_data::scatter::LegendFilter;
use ctre_sales::cleaner::RejectedRecord;
use ctre_sales::{RawRecord, SaleRecord, SerialNumber, SourceError};
use log::{debug, error, info};

use crate::config::DashboardConfig;
use crate::error::{DashboardError, SelectionError};
use crate::renderer::{PublishReport, Renderer, RendererRegistry, ViewSlot};
use crate::selection::{Selection, SelectionStore};
use crate::view_model::{aggregate, Aggregations, ViewModel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing requested yet.
    Idle,
    Loading,
    Ready,
    /// The last load failed. Only a new load leaves this phase.
    LoadError,
}

/// Identifies one load request. Only the most recent ticket is honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Ready { records: usize, rejected: usize },
    /// A newer load started before this one completed.
    Superseded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Published(PublishReport),
    Ignored,
}

#[derive(Debug)]
pub struct DashboardController {
    config: DashboardConfig,
    phase: Phase,
    next_ticket: u64,
    pending: Option<LoadTicket>,
    dataset: Rc<[SaleRecord]>,
    rejected: Vec<RejectedRecord>,
    rejected_count: usize,
    selection: SelectionStore,
    legend: LegendFilter,
    view: Option<ViewModel>,
    revision: u64,
    renderers: RendererRegistry,
}

impl DashboardController {
    pub fn new(config: DashboardConfig) -> Result<Self, DashboardError> {
        config.validate()?;
        Ok(Self {
            config,
            phase: Phase::Idle,
            next_ticket: 0,
            pending: None,
            dataset: Rc::from(Vec::new()),
            rejected: Vec::new(),
            rejected_count: 0,
            selection: SelectionStore::new(),
            legend: LegendFilter::default(),
            view: None,
            revision: 0,
            renderers: RendererRegistry::new(),
        })
    }

    pub fn register_renderer(
        &mut self,
        slot: ViewSlot,
        renderer: Box<dyn Renderer>,
    ) -> Option<Box<dyn Renderer>> {
        self.renderers.register(slot, renderer)
    }

    pub fn unregister_renderer(&mut self, slot: ViewSlot) -> Option<Box<dyn Renderer>> {
        self.renderers.unregister(slot)
    }

    /// Start a load. Any earlier ticket becomes stale and the previous
    /// dataset, selection and legend filter are dropped.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.next_ticket += 1;
        let ticket = LoadTicket(self.next_ticket);
        self.pending = Some(ticket);
        self.phase = Phase::Loading;
        self.dataset = Rc::from(Vec::new());
        self.rejected.clear();
        self.rejected_count = 0;
        self.selection.clear();
        self.legend.clear();
        self.view = None;
        debug!("Load {} started", ticket.0);
        ticket
    }

    /// Finish the load identified by `ticket` with whatever the source produced.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        source: Result<Vec<RawRecord>, SourceError>,
    ) -> Result<LoadOutcome, DashboardError> {
        if self.pending != Some(ticket) {
            debug!("Ignoring stale load {}", ticket.0);
            return Ok(LoadOutcome::Superseded);
        }
        self.pending = None;

        let raw = match source {
            Ok(raw) if raw.is_empty() => {
                return Err(self.fail_load(SourceError::Empty {
                    origin: "loaded records".to_string(),
                }))
            }
            Ok(raw) => raw,
            Err(e) => return Err(self.fail_load(e)),
        };

        let outcome = self.config.cleaner().clean(raw);
        if outcome.records.is_empty() {
            return Err(self.fail_load(SourceError::NoValidRecords {
                rejected: outcome.rejected_count,
            }));
        }
        let rejected = outcome.rejected_count;
        self.rejected = outcome.rejected;
        self.rejected_count = rejected;
        self.dataset = Rc::from(self.config.sampler().sample(outcome.records));
        self.phase = Phase::Ready;
        info!(
            "Dataset ready with {} records ({} rejected)",
            self.dataset.len(),
            rejected
        );

        self.refresh()?;
        Ok(LoadOutcome::Ready {
            records: self.dataset.len(),
            rejected,
        })
    }

    /// Load records that are already in memory.
    pub fn load(&mut self, raw: Vec<RawRecord>) -> Result<LoadOutcome, DashboardError> {
        let ticket = self.begin_load();
        self.complete_load(ticket, Ok(raw))
    }

    fn fail_load(&mut self, source: SourceError) -> DashboardError {
        self.phase = Phase::LoadError;
        self.dataset = Rc::from(Vec::new());
        self.view = None;
        let err = DashboardError::from(source);
        error!("{}", err);
        self.renderers.publish_error(&err);
        err
    }

    /// Toggle the selection on `record`, matched against the dataset by serial.
    pub fn select_record(&mut self, record: &SaleRecord) -> Result<UpdateOutcome, DashboardError> {
        self.select_serial(&record.serial_number)
    }

    pub fn select_serial(
        &mut self,
        serial: &SerialNumber,
    ) -> Result<UpdateOutcome, DashboardError> {
        if self.phase != Phase::Ready {
            debug!(
                "Selection of {} ignored while {:?}",
                serial, self.phase
            );
            return Ok(UpdateOutcome::Ignored);
        }
        let dataset = Rc::clone(&self.dataset);
        let Some(record) = dataset.iter().find(|r| &r.serial_number == serial) else {
            return Err(SelectionError::NotInDataset(serial.clone()).into());
        };
        if !self.selection.toggle(record).changed {
            return Ok(UpdateOutcome::Ignored);
        }
        self.refresh()
    }

    pub fn clear_selection(&mut self) -> Result<UpdateOutcome, DashboardError> {
        if self.phase != Phase::Ready || self.selection.current().is_none() {
            return Ok(UpdateOutcome::Ignored);
        }
        self.selection.clear();
        self.refresh()
    }

    /// Toggle the scatter legend filter on `property_type`.
    pub fn toggle_legend_type(
        &mut self,
        property_type: &str,
    ) -> Result<UpdateOutcome, DashboardError> {
        if self.phase != Phase::Ready {
            debug!(
                "Legend toggle ignored while {:?}",
                self.phase
            );
            return Ok(UpdateOutcome::Ignored);
        }
        self.legend.toggle(property_type);
        self.refresh()
    }

    /// Swap in a new configuration and, once a dataset is loaded, recompute
    /// with it. Sampling settings take effect on the next load.
    pub fn reconfigure(
        &mut self,
        config: DashboardConfig,
    ) -> Result<UpdateOutcome, DashboardError> {
        config.validate()?;
        self.config = config;
        if self.phase != Phase::Ready {
            return Ok(UpdateOutcome::Ignored);
        }
        self.refresh()
    }

    /// Recompute and publish. On failure the previous view stays current and
    /// the selection is left as it is.
    pub fn refresh(&mut self) -> Result<UpdateOutcome, DashboardError> {
        let aggregations = match self.recompute() {
            Ok(aggregations) => aggregations,
            Err(e) => {
                error!(
                    "Aggregation failed, keeping revision {}: {}",
                    self.revision, e
                );
                return Err(e.into());
            }
        };
        self.revision += 1;
        let view = ViewModel {
            revision: self.revision,
            dataset: Rc::clone(&self.dataset),
            selection: self.selection.current().cloned(),
            active_type: self.legend.active().map(str::to_string),
            aggregations,
        };
        let report = self.renderers.publish(&view);
        self.view = Some(view);
        Ok(UpdateOutcome::Published(report))
    }

    pub fn recompute(&self) -> Result<Aggregations, ctre_data::AggregationError> {
        aggregate(
            &self.dataset,
            self.selection.current(),
            self.legend.active(),
            &self.config,
        )
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn view_model(&self) -> Option<&ViewModel> {
        self.view.as_ref()
    }

    pub fn selection(&self) -> &Selection {
        self.selection.state()
    }

    pub fn active_legend_type(&self) -> Option<&str> {
        self.legend.active()
    }

    pub fn dataset(&self) -> &[SaleRecord] {
        &self.dataset
    }

    /// Rejected records, populated only under the report policy.
    pub fn rejected(&self) -> &[RejectedRecord] {
        &self.rejected
    }

    pub fn rejected_count(&self) -> usize {
        self.rejected_count
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }
}
