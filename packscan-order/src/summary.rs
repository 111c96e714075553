use crate::ledger::Ledger;
use serde::Serialize;
use std::fmt;

/// Session-wide progress counters shown under the order list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub orders: usize,
    /// Distinct (customer, SKU) lines across all orders
    pub total_items: usize,
    /// Lines with at least one unit scanned
    pub items_started: usize,
    pub units_required: u64,
    pub units_scanned: u64,
    pub labels_printed: usize,
}

impl SessionSummary {
    pub fn from_ledger(ledger: &Ledger, labels_printed: usize) -> Self {
        let mut summary = Self {
            labels_printed,
            ..Self::default()
        };

        for order in ledger.customers() {
            summary.orders += 1;
            for item in ledger.item_progress(&order.customer) {
                summary.total_items += 1;
                summary.units_required += u64::from(item.required);
                summary.units_scanned += u64::from(item.scanned);
                if item.scanned > 0 {
                    summary.items_started += 1;
                }
            }
        }

        summary
    }
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Scanned: {}/{} products ({}/{} units), {}/{} labels",
            self.items_started,
            self.total_items,
            self.units_scanned,
            self.units_required,
            self.labels_printed,
            self.orders
        )
    }
}
