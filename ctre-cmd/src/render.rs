//! Plain-text renderers for the three dashboard views.
//!
//! Each renderer formats its part of the bundle into a shared [`ViewBoard`],
//! which the command prints once all interactions have been applied.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::rc::Rc;

use ctre_dashboard::{DashboardError, Renderer, ViewModel, ViewSlot};
use ctre_utils::format::{format_assessed_tick, format_currency, format_sale_tick};

/// Latest text of every slot, plus the last error shown.
#[derive(Debug, Default, Clone)]
pub struct ViewBoard {
    inner: Rc<RefCell<Board>>,
}

#[derive(Debug, Default)]
struct Board {
    views: BTreeMap<ViewSlot, String>,
    error: Option<String>,
}

impl ViewBoard {
    pub fn renderer(&self, slot: ViewSlot) -> Box<dyn Renderer> {
        Box::new(TextRenderer {
            slot,
            board: self.clone(),
        })
    }

    pub fn view(&self, slot: ViewSlot) -> Option<String> {
        self.inner.borrow().views.get(&slot).cloned()
    }

    pub fn error(&self) -> Option<String> {
        self.inner.borrow().error.clone()
    }

    /// All views in slot order, separated by blank lines.
    pub fn to_text(&self) -> String {
        let board = self.inner.borrow();
        let mut out = String::new();
        if let Some(error) = &board.error {
            let _ = writeln!(out, "error: {}", error);
        }
        for text in board.views.values() {
            out.push_str(text);
            out.push('\n');
        }
        out
    }
}

struct TextRenderer {
    slot: ViewSlot,
    board: ViewBoard,
}

impl Renderer for TextRenderer {
    fn render(&mut self, view: &ViewModel) -> anyhow::Result<()> {
        let text = match self.slot {
            ViewSlot::Scatter => scatter_text(view),
            ViewSlot::PropertyTypes => property_types_text(view),
            ViewSlot::TownComparison => town_comparison_text(view),
        };
        self.board.inner.borrow_mut().views.insert(self.slot, text);
        Ok(())
    }

    fn render_error(&mut self, error: &DashboardError) {
        let mut board = self.board.inner.borrow_mut();
        board.views.clear();
        board.error = Some(error.to_string());
    }
}

pub fn scatter_text(view: &ViewModel) -> String {
    let aggregations = &view.aggregations;
    let domain = &aggregations.log_domain;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Sale vs assessed: {} points, log axes {} to {}",
        aggregations.scatter.len(),
        format_sale_tick(domain.min),
        format_sale_tick(domain.max)
    );
    for entry in &aggregations.legend {
        let marker = if entry.active { "*" } else { " " };
        let _ = writeln!(out, " {} {} {}", marker, entry.color, entry.property_type);
    }
    if let Some(point) = aggregations.scatter.iter().find(|p| p.is_selected) {
        let _ = writeln!(
            out,
            "  selected #{}: sale {}, assessed {}",
            point.serial_number,
            format_currency(point.sale_amount),
            format_currency(point.assessed_value)
        );
    }
    out
}

pub fn property_types_text(view: &ViewModel) -> String {
    let mut out = String::from("Average sale vs assessed by property type\n");
    for stat in &view.aggregations.property_types {
        let _ = write!(
            out,
            "  {:<16} n={:<5} sale {:>8}  assessed {:>8}",
            stat.property_type,
            stat.count,
            format_currency(stat.avg_sale),
            format_currency(stat.avg_assessed)
        );
        if let Some(selected) = &stat.selected {
            let _ = write!(
                out,
                "  <- selected sale {}, assessed {}",
                format_currency(selected.selected_sale),
                format_currency(selected.selected_assessed)
            );
        }
        out.push('\n');
    }
    out
}

pub fn town_comparison_text(view: &ViewModel) -> String {
    let comparison = &view.aggregations.town_comparison;
    let mut out = match &comparison.town {
        Some(town) => format!("Mean sale by assessed value: market vs {}\n", town),
        None => "Mean sale by assessed value: market\n".to_string(),
    };
    for bin in &comparison.market {
        let _ = write!(
            out,
            "  {:>5}  market {:>8} (n={})",
            format_assessed_tick(bin.bin_start),
            format_currency(bin.avg_sale_amount),
            bin.count
        );
        if let Some(town_bin) = comparison
            .town_series
            .iter()
            .find(|b| b.bin_start == bin.bin_start)
        {
            let _ = write!(
                out,
                "  town {:>8} (n={})",
                format_currency(town_bin.avg_sale_amount),
                town_bin.count
            );
        }
        out.push('\n');
    }
    out
}
