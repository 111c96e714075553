use crate::models::{Order, OrderError};
use packscan_core::{CustomerKey, OrderRecord, SkuCode};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Required vs. scanned units for one (customer, SKU) pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LedgerEntry {
    pub required: u32,
    pub scanned: u32,
}

impl LedgerEntry {
    pub fn is_satisfied(&self) -> bool {
        self.scanned >= self.required
    }

    pub fn remaining(&self) -> u32 {
        self.required.saturating_sub(self.scanned)
    }
}

/// Outcome of crediting one scan to a customer's order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScanResult {
    /// Customer has no order line for this SKU
    Unmatched,
    /// Counted; more units still needed
    Progress { scanned: u32, required: u32 },
    /// Counted; this scan brought the item to exactly `required`
    JustCompletedItem { required: u32 },
    /// Item was already satisfied; nothing counted
    AlreadySatisfied,
}

/// Per-item view for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemProgress {
    pub product_name: String,
    pub sku: SkuCode,
    pub scanned: u32,
    pub required: u32,
}

/// Tracks scanned quantities against order requirements for one session.
///
/// Orders keep the position in which they were ingested; that order decides
/// which customer gets credited when several still need the same SKU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    orders: Vec<Order>,
    entries: HashMap<(CustomerKey, SkuCode), LedgerEntry>,
}

impl Ledger {
    /// Build the ledger from raw order records
    pub fn build(records: Vec<OrderRecord>) -> Result<Self, OrderError> {
        let mut orders: Vec<Order> = Vec::new();

        for record in records {
            let order = Order::from_record(record)?;
            match orders.iter_mut().find(|existing| existing.customer == order.customer) {
                Some(existing) => {
                    tracing::debug!(customer = %order.customer, "Merging repeated order for customer");
                    existing.merge(order)?;
                }
                None => orders.push(order),
            }
        }

        let mut entries = HashMap::new();
        for order in &orders {
            for line in &order.items {
                entries.insert(
                    (order.customer.clone(), line.sku.clone()),
                    LedgerEntry { required: line.required, scanned: 0 },
                );
            }
        }

        tracing::info!(orders = orders.len(), lines = entries.len(), "Ledger built");
        Ok(Self { orders, entries })
    }

    /// Credit one scanned unit of `sku` to `customer_name`'s order
    pub fn record_scan(&mut self, customer_name: &str, sku: &str) -> ScanResult {
        self.record_scan_key(&CustomerKey::new(customer_name), &SkuCode::new(sku))
    }

    pub fn record_scan_key(&mut self, customer: &CustomerKey, sku: &SkuCode) -> ScanResult {
        let Some(entry) = self.entries.get_mut(&(customer.clone(), sku.clone())) else {
            return ScanResult::Unmatched;
        };

        if entry.is_satisfied() {
            return ScanResult::AlreadySatisfied;
        }

        entry.scanned += 1;
        if entry.scanned == entry.required {
            ScanResult::JustCompletedItem { required: entry.required }
        } else {
            ScanResult::Progress { scanned: entry.scanned, required: entry.required }
        }
    }

    /// True iff the customer has an order and every line is satisfied
    pub fn is_order_complete(&self, customer_name: &str) -> bool {
        self.is_complete_key(&CustomerKey::new(customer_name))
    }

    pub fn is_complete_key(&self, customer: &CustomerKey) -> bool {
        match self.order(customer) {
            Some(order) => order.items.iter().all(|line| {
                self.entry(customer, &line.sku)
                    .is_some_and(|entry| entry.is_satisfied())
            }),
            None => false,
        }
    }

    /// Remaining units per SKU for lines not yet satisfied; empty means complete
    pub fn pending_items(&self, customer_name: &str) -> BTreeMap<String, u32> {
        self.pending_items_key(&CustomerKey::new(customer_name))
    }

    pub fn pending_items_key(&self, customer: &CustomerKey) -> BTreeMap<String, u32> {
        let Some(order) = self.order(customer) else {
            return BTreeMap::new();
        };

        order
            .items
            .iter()
            .filter_map(|line| {
                let entry = self.entry(customer, &line.sku)?;
                (!entry.is_satisfied()).then(|| (line.sku.to_string(), entry.remaining()))
            })
            .collect()
    }

    /// Zero the scan counts for one customer, or for everyone when `None`
    pub fn reset(&mut self, customer_name: Option<&str>) {
        let target = customer_name.map(CustomerKey::new);
        for ((customer, _), entry) in self.entries.iter_mut() {
            if target.as_ref().map_or(true, |t| t == customer) {
                entry.scanned = 0;
            }
        }
    }

    /// Earliest ingested customer whose order still needs `sku`
    pub fn first_pending_customer(&self, sku: &SkuCode) -> Option<&CustomerKey> {
        self.orders
            .iter()
            .find(|order| {
                order.line(sku).is_some()
                    && self
                        .entry(&order.customer, sku)
                        .is_some_and(|entry| !entry.is_satisfied())
            })
            .map(|order| &order.customer)
    }

    /// Whether any order lists `sku` at all
    pub fn knows_sku(&self, sku: &SkuCode) -> bool {
        self.orders.iter().any(|order| order.line(sku).is_some())
    }

    /// Orders in ingestion order
    pub fn customers(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }

    pub fn order(&self, customer: &CustomerKey) -> Option<&Order> {
        self.orders.iter().find(|order| &order.customer == customer)
    }

    pub fn entry(&self, customer: &CustomerKey, sku: &SkuCode) -> Option<&LedgerEntry> {
        self.entries.get(&(customer.clone(), sku.clone()))
    }

    pub fn item_progress(&self, customer: &CustomerKey) -> Vec<ItemProgress> {
        let Some(order) = self.order(customer) else {
            return Vec::new();
        };

        order
            .items
            .iter()
            .map(|line| {
                let entry = self.entry(customer, &line.sku).copied().unwrap_or_default();
                ItemProgress {
                    product_name: line.product_name.clone(),
                    sku: line.sku.clone(),
                    scanned: entry.scanned,
                    required: entry.required,
                }
            })
            .collect()
    }

    /// All entries, sorted, for comparisons and journaling
    pub fn snapshot(&self) -> BTreeMap<(CustomerKey, SkuCode), LedgerEntry> {
        self.entries
            .iter()
            .map(|(key, entry)| (key.clone(), *entry))
            .collect()
    }
}
