//! Renderer registry keyed by view slot.
//!
//! Renderers own their drawing surfaces. The dashboard only hands them a
//! finished [`ViewModel`] and never reaches into what they draw on.

use std::collections::BTreeMap;
use std::fmt;

use log::{error, warn};
use serde::Serialize;

use crate::error::DashboardError;
use crate::view_model::ViewModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewSlot {
    /// Sale amount against assessed value, both log scaled.
    Scatter,
    /// Dumbbell chart of average sale and assessed value per type.
    PropertyTypes,
    /// Market and selected-town mean sale per assessed bin.
    TownComparison,
}

impl ViewSlot {
    pub const ALL: [ViewSlot; 3] = [
        ViewSlot::Scatter,
        ViewSlot::PropertyTypes,
        ViewSlot::TownComparison,
    ];
}

impl fmt::Display for ViewSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViewSlot::Scatter => "scatter",
            ViewSlot::PropertyTypes => "property_types",
            ViewSlot::TownComparison => "town_comparison",
        };
        write!(f, "{}", name)
    }
}

pub trait Renderer {
    fn render(&mut self, view: &ViewModel) -> anyhow::Result<()>;

    /// Called once when a load fails. Most renderers have nothing to show.
    fn render_error(&mut self, _error: &DashboardError) {}
}

/// What happened to one publish.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PublishReport {
    pub delivered: Vec<ViewSlot>,
    pub missing: Vec<ViewSlot>,
    pub failed: Vec<ViewSlot>,
}

impl PublishReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty() && self.failed.is_empty()
    }
}

#[derive(Default)]
pub struct RendererRegistry {
    renderers: BTreeMap<ViewSlot, Box<dyn Renderer>>,
}

impl RendererRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the renderer previously bound to `slot`, if any.
    pub fn register(
        &mut self,
        slot: ViewSlot,
        renderer: Box<dyn Renderer>,
    ) -> Option<Box<dyn Renderer>> {
        self.renderers.insert(slot, renderer)
    }

    pub fn unregister(&mut self, slot: ViewSlot) -> Option<Box<dyn Renderer>> {
        self.renderers.remove(&slot)
    }

    pub fn is_registered(&self, slot: ViewSlot) -> bool {
        self.renderers.contains_key(&slot)
    }

    /// Deliver `view` to every slot. A failing renderer does not stop the rest.
    pub fn publish(&mut self, view: &ViewModel) -> PublishReport {
        let mut report = PublishReport::default();
        for slot in ViewSlot::ALL {
            let Some(renderer) = self.renderers.get_mut(&slot) else {
                warn!("No renderer registered for {}, skipping", slot);
                report.missing.push(slot);
                continue;
            };
            match renderer.render(view) {
                Ok(()) => report.delivered.push(slot),
                Err(e) => {
                    error!("Renderer {} failed: {:#}", slot, e);
                    report.failed.push(slot);
                }
            }
        }
        report
    }

    pub fn publish_error(&mut self, error: &DashboardError) {
        for renderer in self.renderers.values_mut() {
            renderer.render_error(error);
        }
    }
}

impl fmt::Debug for RendererRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RendererRegistry")
            .field("slots", &self.renderers.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use anyhow::bail;
    use ctre_sales::SourceError;

    use super::*;
    use crate::config::DashboardConfig;
    use crate::view_model::aggregate;

    struct Counting(Rc<RefCell<usize>>);

    impl Renderer for Counting {
        fn render(&mut self, _view: &ViewModel) -> anyhow::Result<()> {
            *self.0.borrow_mut() += 1;
            Ok(())
        }

        fn render_error(&mut self, _error: &DashboardError) {
            *self.0.borrow_mut() += 100;
        }
    }

    struct Broken;

    impl Renderer for Broken {
        fn render(&mut self, _view: &ViewModel) -> anyhow::Result<()> {
            bail!("canvas gone")
        }
    }

    fn empty_view() -> ViewModel {
        ViewModel {
            revision: 0,
            dataset: Rc::from(Vec::new()),
            selection: None,
            active_type: None,
            aggregations: aggregate(&[], None, None, &DashboardConfig::default()).unwrap(),
        }
    }

    #[test]
    fn missing_slots_are_skipped() {
        let hits = Rc::new(RefCell::new(0));
        let mut registry = RendererRegistry::new();
        registry.register(ViewSlot::Scatter, Box::new(Counting(hits.clone())));

        let report = registry.publish(&empty_view());
        assert_eq!(report.delivered, vec![ViewSlot::Scatter]);
        assert_eq!(
            report.missing,
            vec![ViewSlot::PropertyTypes, ViewSlot::TownComparison]
        );
        assert!(!report.is_complete());
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn failing_renderer_does_not_block_others() {
        let hits = Rc::new(RefCell::new(0));
        let mut registry = RendererRegistry::new();
        registry.register(ViewSlot::Scatter, Box::new(Broken));
        registry.register(ViewSlot::PropertyTypes, Box::new(Counting(hits.clone())));
        registry.register(ViewSlot::TownComparison, Box::new(Counting(hits.clone())));

        let report = registry.publish(&empty_view());
        assert_eq!(report.failed, vec![ViewSlot::Scatter]);
        assert_eq!(report.delivered.len(), 2);
        assert_eq!(*hits.borrow(), 2);
    }

    #[test]
    fn errors_reach_every_renderer() {
        let hits = Rc::new(RefCell::new(0));
        let mut registry = RendererRegistry::new();
        registry.register(ViewSlot::Scatter, Box::new(Counting(hits.clone())));
        registry.register(ViewSlot::TownComparison, Box::new(Counting(hits.clone())));

        let error = DashboardError::from(SourceError::Empty {
            origin: "sales.json".to_string(),
        });
        registry.publish_error(&error);
        assert_eq!(*hits.borrow(), 200);
    }

    #[test]
    fn register_replaces_and_unregister_removes() {
        let mut registry = RendererRegistry::new();
        assert!(registry.register(ViewSlot::Scatter, Box::new(Broken)).is_none());
        assert!(registry.register(ViewSlot::Scatter, Box::new(Broken)).is_some());
        assert!(registry.unregister(ViewSlot::Scatter).is_some());
        assert!(!registry.is_registered(ViewSlot::Scatter));
    }
}
