//! The single selected sale shared by every view.
//!
//! Identity is the serial number: two records with the same serial are the
//! same sale no matter what their other fields say.

use ctre_sales::SaleRecord;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Selection {
    #[default]
    Empty,
    Selected(SaleRecord),
}

/// Result of a toggle: the new state and whether it differs from the old one.
#[derive(Debug, Clone, PartialEq)]
pub struct Toggle {
    pub state: Selection,
    pub changed: bool,
}

impl Selection {
    pub fn record(&self) -> Option<&SaleRecord> {
        match self {
            Selection::Empty => None,
            Selection::Selected(record) => Some(record),
        }
    }

    /// Pure transition. Clicking the selected sale clears it; clicking any
    /// other sale selects it.
    pub fn toggle(&self, record: &SaleRecord) -> Toggle {
        let state = match self {
            Selection::Selected(current) if current.same_sale(record) => Selection::Empty,
            _ => Selection::Selected(record.clone()),
        };
        // Every toggle either clears, selects, or swaps identity.
        Toggle {
            state,
            changed: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SelectionStore {
    state: Selection,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, record: &SaleRecord) -> Toggle {
        let toggle = self.state.toggle(record);
        self.state = toggle.state.clone();
        toggle
    }

    pub fn clear(&mut self) {
        self.state = Selection::Empty;
    }

    pub fn current(&self) -> Option<&SaleRecord> {
        self.state.record()
    }

    pub fn state(&self) -> &Selection {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sale(serial: i64) -> SaleRecord {
        SaleRecord::new(serial, "Residential", "Avon", 1.0, 2.0)
    }

    #[test]
    fn toggling_twice_returns_to_empty() {
        let once = Selection::Empty.toggle(&sale(1));
        assert_eq!(once.state, Selection::Selected(sale(1)));
        let twice = once.state.toggle(&sale(1));
        assert_eq!(twice.state, Selection::Empty);
        assert!(once.changed && twice.changed);
    }

    #[test]
    fn different_serial_replaces_selection() {
        let mut store = SelectionStore::new();
        store.toggle(&sale(1));
        let toggle = store.toggle(&sale(2));
        assert!(toggle.changed);
        assert_eq!(store.current(), Some(&sale(2)));
    }

    #[test]
    fn identity_is_the_serial_number() {
        let mut store = SelectionStore::new();
        store.toggle(&sale(1));
        let lookalike = SaleRecord::new(1, "Commercial", "Bristol", 9.0, 9.0);
        store.toggle(&lookalike);
        assert_eq!(store.current(), None);
    }

    #[test]
    fn clear_forces_empty() {
        let mut store = SelectionStore::new();
        store.clear();
        assert_eq!(store.state(), &Selection::Empty);
        store.toggle(&sale(3));
        store.clear();
        assert_eq!(store.current(), None);
    }
}
