use crate::ledger::{Ledger, ScanResult};
use crate::models::OrderState;
use crate::summary::SessionSummary;
use packscan_core::{CustomerKey, LabelLookup, PrintDispatch, PrintJob, SkuCode};
use packscan_shared::SessionEventKind;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Everything the coordinator reports back to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoordinatorEvent {
    Unmatched { sku: SkuCode },
    Progress { customer: CustomerKey, sku: SkuCode, scanned: u32, required: u32 },
    ItemCompleted { customer: CustomerKey, sku: SkuCode, required: u32 },
    AlreadySatisfied { sku: SkuCode },
    OrderJustCompleted { customer: CustomerKey },
    LabelPrinted { customer: CustomerKey, page: u32, forced: bool },
    LabelLookupFailed { customer: CustomerKey },
    PrintDispatchFailed { customer: CustomerKey, reason: String },
    AlreadyPrinted { customer: CustomerKey },
    NotReady { customer: CustomerKey, pending: u64 },
    UnknownCustomer { customer: CustomerKey },
}

impl CoordinatorEvent {
    /// Events the operator should be warned about
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            CoordinatorEvent::Unmatched { .. }
                | CoordinatorEvent::LabelLookupFailed { .. }
                | CoordinatorEvent::PrintDispatchFailed { .. }
                | CoordinatorEvent::NotReady { .. }
                | CoordinatorEvent::UnknownCustomer { .. }
        )
    }
}

impl fmt::Display for CoordinatorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordinatorEvent::Unmatched { sku } => write!(f, "{} is not part of any order", sku),
            CoordinatorEvent::Progress { customer, sku, scanned, required } => {
                write!(f, "{} for {}: {}/{} scanned", sku, customer, scanned, required)
            }
            CoordinatorEvent::ItemCompleted { customer, sku, required } => {
                write!(f, "{} for {} complete ({}/{})", sku, customer, required, required)
            }
            CoordinatorEvent::AlreadySatisfied { sku } => {
                write!(f, "Extra {} scanned, every order already has enough", sku)
            }
            CoordinatorEvent::OrderJustCompleted { customer } => write!(f, "Order for {} is complete", customer),
            CoordinatorEvent::LabelPrinted { customer, page, forced: false } => {
                write!(f, "Auto-printed label for {} (page {})", customer, page)
            }
            CoordinatorEvent::LabelPrinted { customer, page, forced: true } => {
                write!(f, "Printed label manually for {} (page {})", customer, page)
            }
            CoordinatorEvent::LabelLookupFailed { customer } => write!(f, "Could not fetch label for {}", customer),
            CoordinatorEvent::PrintDispatchFailed { customer, reason } => {
                write!(f, "Could not send label for {} to the printer: {}", customer, reason)
            }
            CoordinatorEvent::AlreadyPrinted { customer } => write!(f, "Already printed label for {}", customer),
            CoordinatorEvent::NotReady { customer, pending } => {
                write!(f, "Order for {} still has {} unit(s) to scan", customer, pending)
            }
            CoordinatorEvent::UnknownCustomer { customer } => write!(f, "No order for {}", customer),
        }
    }
}

impl From<&CoordinatorEvent> for SessionEventKind {
    fn from(event: &CoordinatorEvent) -> Self {
        match event.clone() {
            CoordinatorEvent::Unmatched { sku } => SessionEventKind::Unmatched { sku: sku.to_string() },
            CoordinatorEvent::Progress { customer, sku, scanned, required } => SessionEventKind::Progress {
                customer: customer.to_string(),
                sku: sku.to_string(),
                scanned,
                required,
            },
            CoordinatorEvent::ItemCompleted { customer, sku, required } => SessionEventKind::ItemCompleted {
                customer: customer.to_string(),
                sku: sku.to_string(),
                required,
            },
            CoordinatorEvent::AlreadySatisfied { sku } => SessionEventKind::AlreadySatisfied { sku: sku.to_string() },
            CoordinatorEvent::OrderJustCompleted { customer } => {
                SessionEventKind::OrderJustCompleted { customer: customer.to_string() }
            }
            CoordinatorEvent::LabelPrinted { customer, page, forced } => {
                SessionEventKind::LabelPrinted { customer: customer.to_string(), page, forced }
            }
            CoordinatorEvent::LabelLookupFailed { customer } => {
                SessionEventKind::LabelLookupFailed { customer: customer.to_string() }
            }
            CoordinatorEvent::PrintDispatchFailed { customer, reason } => {
                SessionEventKind::PrintDispatchFailed { customer: customer.to_string(), reason }
            }
            CoordinatorEvent::AlreadyPrinted { customer } => {
                SessionEventKind::AlreadyPrinted { customer: customer.to_string() }
            }
            CoordinatorEvent::NotReady { customer, pending } => {
                SessionEventKind::NotReady { customer: customer.to_string(), pending }
            }
            CoordinatorEvent::UnknownCustomer { customer } => {
                SessionEventKind::UnknownCustomer { customer: customer.to_string() }
            }
        }
    }
}

/// Drives orders from Pending through Complete to Printed.
///
/// The printed set is the only thing standing between a completed order and a
/// second label, so every path that dispatches a print checks it first.
pub struct ScanCoordinator {
    ledger: Ledger,
    labels: Arc<dyn LabelLookup>,
    printer: Arc<dyn PrintDispatch>,
    copies: u32,
    printed: BTreeSet<CustomerKey>,
    // Complete orders whose label lookup failed; retried on every poll
    awaiting_label: BTreeSet<CustomerKey>,
    // Complete orders whose dispatch failed; only a manual request retries them
    dispatch_failed: BTreeSet<CustomerKey>,
}

impl ScanCoordinator {
    pub fn new(ledger: Ledger, labels: Arc<dyn LabelLookup>, printer: Arc<dyn PrintDispatch>) -> Self {
        Self {
            ledger,
            labels,
            printer,
            copies: 1,
            printed: BTreeSet::new(),
            awaiting_label: BTreeSet::new(),
            dispatch_failed: BTreeSet::new(),
        }
    }

    pub fn with_copies(mut self, copies: u32) -> Self {
        self.copies = copies.max(1);
        self
    }

    /// Handle one decoded SKU.
    ///
    /// The scan credits the first order, in ingestion order, that still needs
    /// the SKU. The first returned event describes the scan itself; completion,
    /// print outcome and any retried lookups follow.
    pub fn on_scan(&mut self, raw_sku: &str) -> Vec<CoordinatorEvent> {
        let sku = SkuCode::new(raw_sku);
        let mut events = Vec::new();
        let mut handled = None;

        match self.ledger.first_pending_customer(&sku).cloned() {
            Some(customer) => {
                let result = self.ledger.record_scan_key(&customer, &sku);
                events.push(match result {
                    ScanResult::Progress { scanned, required } => CoordinatorEvent::Progress {
                        customer: customer.clone(),
                        sku: sku.clone(),
                        scanned,
                        required,
                    },
                    ScanResult::JustCompletedItem { required } => CoordinatorEvent::ItemCompleted {
                        customer: customer.clone(),
                        sku: sku.clone(),
                        required,
                    },
                    // first_pending_customer only returns orders that still need the SKU
                    ScanResult::Unmatched | ScanResult::AlreadySatisfied => {
                        error!(customer = %customer, sku = %sku, ?result, "Pending customer rejected scan");
                        debug_assert!(false, "first_pending_customer returned a satisfied line");
                        CoordinatorEvent::AlreadySatisfied { sku: sku.clone() }
                    }
                });

                if self.ledger.is_complete_key(&customer) && !self.printed.contains(&customer) {
                    info!(customer = %customer, "Order complete");
                    events.push(CoordinatorEvent::OrderJustCompleted { customer: customer.clone() });
                    events.push(self.attempt_print(&customer, false));
                    handled = Some(customer);
                }
            }
            None if self.ledger.knows_sku(&sku) => {
                info!(sku = %sku, "Extra scan, all orders already satisfied");
                events.push(CoordinatorEvent::AlreadySatisfied { sku });
            }
            None => {
                warn!(sku = %sku, "Scanned SKU not in any order");
                events.push(CoordinatorEvent::Unmatched { sku });
            }
        }

        events.extend(self.retry_labels(handled.as_ref()));
        events
    }

    /// Print a customer's label on request.
    ///
    /// `forced` is the operator override: it is allowed before the order is
    /// complete but never touches scan counts. Orders already printed are
    /// reported and left alone.
    pub fn on_print_request(&mut self, customer_name: &str, forced: bool) -> CoordinatorEvent {
        let customer = CustomerKey::new(customer_name);

        if self.ledger.order(&customer).is_none() {
            warn!(customer = %customer, "Print requested for unknown customer");
            return CoordinatorEvent::UnknownCustomer { customer };
        }

        if self.printed.contains(&customer) {
            info!(customer = %customer, "Label already printed, skipping");
            return CoordinatorEvent::AlreadyPrinted { customer };
        }

        if !forced && !self.ledger.is_complete_key(&customer) {
            let pending = self
                .ledger
                .pending_items_key(&customer)
                .values()
                .map(|&left| u64::from(left))
                .sum();
            return CoordinatorEvent::NotReady { customer, pending };
        }

        self.attempt_print(&customer, forced)
    }

    /// Render/poll pass: retry label lookups for orders stuck in Complete
    pub fn poll(&mut self) -> Vec<CoordinatorEvent> {
        self.retry_labels(None)
    }

    pub fn is_order_complete(&self, customer_name: &str) -> bool {
        self.ledger.is_order_complete(customer_name)
    }

    pub fn pending_items(&self, customer_name: &str) -> BTreeMap<String, u32> {
        self.ledger.pending_items(customer_name)
    }

    /// Back to Pending with zero scans, for one customer or all of them
    pub fn reset(&mut self, customer_name: Option<&str>) {
        self.ledger.reset(customer_name);
        match customer_name.map(CustomerKey::new) {
            Some(customer) => {
                self.printed.remove(&customer);
                self.awaiting_label.remove(&customer);
                self.dispatch_failed.remove(&customer);
                info!(customer = %customer, "Order reset");
            }
            None => {
                self.printed.clear();
                self.awaiting_label.clear();
                self.dispatch_failed.clear();
                info!("Session reset");
            }
        }
    }

    pub fn order_state(&self, customer_name: &str) -> Option<OrderState> {
        let customer = CustomerKey::new(customer_name);
        self.ledger.order(&customer)?;

        Some(if self.printed.contains(&customer) {
            OrderState::Printed
        } else if self.ledger.is_complete_key(&customer) {
            OrderState::Complete
        } else {
            OrderState::Pending
        })
    }

    pub fn printed_customers(&self) -> impl Iterator<Item = &CustomerKey> {
        self.printed.iter()
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary::from_ledger(&self.ledger, self.printed.len())
    }

    fn retry_labels(&mut self, skip: Option<&CustomerKey>) -> Vec<CoordinatorEvent> {
        let due: Vec<CustomerKey> = self
            .ledger
            .customers()
            .map(|order| order.customer.clone())
            .filter(|customer| self.awaiting_label.contains(customer) && Some(customer) != skip)
            .collect();

        let mut events = Vec::with_capacity(due.len());
        for customer in &due {
            if !self.printed.contains(customer) {
                events.push(self.attempt_print(customer, false));
            }
        }
        events
    }

    fn attempt_print(&mut self, customer: &CustomerKey, forced: bool) -> CoordinatorEvent {
        let complete = self.ledger.is_complete_key(customer);

        let Some(page) = self.labels.find_label_page(customer) else {
            warn!(customer = %customer, "Label lookup failed");
            if complete {
                self.awaiting_label.insert(customer.clone());
                self.dispatch_failed.remove(customer);
            }
            return CoordinatorEvent::LabelLookupFailed { customer: customer.clone() };
        };

        let job = PrintJob::new(customer.clone(), page, self.copies);
        match self.printer.dispatch(job) {
            Ok(()) => {
                info!(customer = %customer, page, forced, "Label dispatched");
                self.printed.insert(customer.clone());
                self.awaiting_label.remove(customer);
                self.dispatch_failed.remove(customer);
                CoordinatorEvent::LabelPrinted { customer: customer.clone(), page, forced }
            }
            Err(e) => {
                warn!(customer = %customer, error = %e, "Print dispatch failed");
                self.awaiting_label.remove(customer);
                if complete {
                    self.dispatch_failed.insert(customer.clone());
                }
                CoordinatorEvent::PrintDispatchFailed { customer: customer.clone(), reason: e.to_string() }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use packscan_core::{CoreError, CoreResult, LineItemRecord, OrderRecord};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct StubLabels {
        pages: Mutex<BTreeMap<String, u32>>,
        lookups: Mutex<u32>,
    }

    impl StubLabels {
        fn with(name: &str, page: u32) -> Arc<Self> {
            let labels = Self::default();
            labels.set(name, page);
            Arc::new(labels)
        }

        fn set(&self, name: &str, page: u32) {
            self.pages.lock().unwrap().insert(name.to_string(), page);
        }

        fn remove(&self, name: &str) {
            self.pages.lock().unwrap().remove(name);
        }
    }

    impl LabelLookup for StubLabels {
        fn find_label_page(&self, customer: &CustomerKey) -> Option<u32> {
            *self.lookups.lock().unwrap() += 1;
            self.pages.lock().unwrap().get(customer.as_str()).copied()
        }
    }

    #[derive(Default)]
    struct RecordingPrinter {
        jobs: Mutex<Vec<PrintJob>>,
        fail: AtomicBool,
    }

    impl PrintDispatch for RecordingPrinter {
        fn dispatch(&self, job: PrintJob) -> CoreResult<()> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(CoreError::PrintDispatchFailed("queue closed".to_string()));
            }
            self.jobs.lock().unwrap().push(job);
            Ok(())
        }
    }

    fn jane_doe() -> OrderRecord {
        OrderRecord::new(
            "Jane Doe",
            vec![
                LineItemRecord::new("Crown Hat", "SKU-A", 2),
                LineItemRecord::new("Crown Sock", "SKU-B", 1),
            ],
        )
    }

    fn coordinator(labels: Arc<StubLabels>, printer: Arc<RecordingPrinter>) -> ScanCoordinator {
        let ledger = Ledger::build(vec![jane_doe()]).unwrap();
        ScanCoordinator::new(ledger, labels, printer)
    }

    #[test]
    fn test_jane_doe_scenario() {
        let printer = Arc::new(RecordingPrinter::default());
        let mut coordinator = coordinator(StubLabels::with("jane doe", 4), printer.clone());

        let events = coordinator.on_scan("SKU-A");
        assert_eq!(
            events,
            vec![CoordinatorEvent::Progress {
                customer: CustomerKey::new("Jane Doe"),
                sku: SkuCode::new("sku-a"),
                scanned: 1,
                required: 2,
            }]
        );
        assert_eq!(coordinator.order_state("Jane Doe"), Some(OrderState::Pending));

        let events = coordinator.on_scan("SKU-A");
        assert!(matches!(events.as_slice(), [CoordinatorEvent::ItemCompleted { required: 2, .. }]));
        assert_eq!(coordinator.order_state("Jane Doe"), Some(OrderState::Pending));

        let events = coordinator.on_scan("SKU-B");
        assert_eq!(events[1], CoordinatorEvent::OrderJustCompleted { customer: CustomerKey::new("Jane Doe") });
        assert_eq!(
            events[2],
            CoordinatorEvent::LabelPrinted { customer: CustomerKey::new("Jane Doe"), page: 4, forced: false }
        );
        assert_eq!(coordinator.order_state("Jane Doe"), Some(OrderState::Printed));
        assert_eq!(printer.jobs.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_print_request_is_idempotent() {
        let printer = Arc::new(RecordingPrinter::default());
        let labels = Arc::new(StubLabels::default());
        let mut coordinator = coordinator(labels.clone(), printer.clone());

        coordinator.on_scan("SKU-A");
        coordinator.on_scan("SKU-A");
        coordinator.on_scan("SKU-B");
        assert_eq!(coordinator.order_state("Jane Doe"), Some(OrderState::Complete));

        labels.set("jane doe", 1);
        let first = coordinator.on_print_request("Jane Doe", false);
        let second = coordinator.on_print_request("jane doe", true);

        assert!(matches!(first, CoordinatorEvent::LabelPrinted { page: 1, .. }));
        assert_eq!(second, CoordinatorEvent::AlreadyPrinted { customer: CustomerKey::new("Jane Doe") });
        assert_eq!(printer.jobs.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_failed_lookup_retried_on_next_pass() {
        let printer = Arc::new(RecordingPrinter::default());
        let labels = Arc::new(StubLabels::default());
        let mut coordinator = coordinator(labels.clone(), printer.clone());

        coordinator.on_scan("SKU-A");
        coordinator.on_scan("SKU-A");
        let events = coordinator.on_scan("SKU-B");
        assert_eq!(events[2], CoordinatorEvent::LabelLookupFailed { customer: CustomerKey::new("Jane Doe") });
        assert!(events[2].is_warning());
        assert_eq!(coordinator.order_state("Jane Doe"), Some(OrderState::Complete));
        assert_eq!(*labels.lookups.lock().unwrap(), 1);

        // still missing: another failure, state unchanged
        let events = coordinator.poll();
        assert_eq!(events, vec![CoordinatorEvent::LabelLookupFailed { customer: CustomerKey::new("Jane Doe") }]);
        assert_eq!(*labels.lookups.lock().unwrap(), 2);

        labels.set("jane doe", 7);
        let events = coordinator.on_scan("SKU-C");
        assert_eq!(events[0], CoordinatorEvent::Unmatched { sku: SkuCode::new("sku-c") });
        assert!(matches!(events[1], CoordinatorEvent::LabelPrinted { page: 7, forced: false, .. }));
        assert_eq!(coordinator.order_state("Jane Doe"), Some(OrderState::Printed));

        assert!(coordinator.poll().is_empty());
        assert_eq!(printer.jobs.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_dispatch_failure_not_retried_automatically() {
        let printer = Arc::new(RecordingPrinter { fail: AtomicBool::new(true), ..Default::default() });
        let mut coordinator = coordinator(StubLabels::with("jane doe", 2), printer);

        coordinator.on_scan("SKU-A");
        coordinator.on_scan("SKU-A");
        let events = coordinator.on_scan("SKU-B");

        assert!(matches!(events[2], CoordinatorEvent::PrintDispatchFailed { .. }));
        assert_eq!(coordinator.order_state("Jane Doe"), Some(OrderState::Complete));
        assert!(coordinator.poll().is_empty());
        assert!(matches!(
            coordinator.on_print_request("Jane Doe", false),
            CoordinatorEvent::PrintDispatchFailed { .. }
        ));
    }

    #[test]
    fn test_forced_lookup_failure_after_dispatch_failure_is_retried() {
        let printer = Arc::new(RecordingPrinter { fail: AtomicBool::new(true), ..Default::default() });
        let labels = StubLabels::with("jane doe", 2);
        let mut coordinator = coordinator(labels.clone(), printer.clone());

        coordinator.on_scan("SKU-A");
        coordinator.on_scan("SKU-A");
        let events = coordinator.on_scan("SKU-B");
        assert!(matches!(events[2], CoordinatorEvent::PrintDispatchFailed { .. }));

        labels.remove("jane doe");
        printer.fail.store(false, Ordering::SeqCst);
        assert_eq!(
            coordinator.on_print_request("Jane Doe", true),
            CoordinatorEvent::LabelLookupFailed { customer: CustomerKey::new("Jane Doe") }
        );
        assert_eq!(coordinator.order_state("Jane Doe"), Some(OrderState::Complete));

        labels.set("jane doe", 5);
        let events = coordinator.poll();
        assert_eq!(
            events,
            vec![CoordinatorEvent::LabelPrinted { customer: CustomerKey::new("Jane Doe"), page: 5, forced: false }]
        );
        assert_eq!(coordinator.order_state("Jane Doe"), Some(OrderState::Printed));
        assert_eq!(printer.jobs.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_order_complete_at_load_waits_for_manual_print() {
        let ana = OrderRecord::new("Ana Lima", vec![LineItemRecord::new("Gift Card", "SKU-Z", 0)]);
        let ledger = Ledger::build(vec![ana, jane_doe()]).unwrap();
        let printer = Arc::new(RecordingPrinter::default());
        let labels = StubLabels::with("ana lima", 9);
        let mut coordinator = ScanCoordinator::new(ledger, labels, printer.clone());

        assert_eq!(coordinator.order_state("Ana Lima"), Some(OrderState::Complete));
        assert!(coordinator.poll().is_empty());
        coordinator.on_scan("SKU-A");
        assert_eq!(coordinator.order_state("Ana Lima"), Some(OrderState::Complete));
        assert!(printer.jobs.lock().unwrap().is_empty());

        let event = coordinator.on_print_request("Ana Lima", false);
        assert_eq!(event, CoordinatorEvent::LabelPrinted { customer: CustomerKey::new("Ana Lima"), page: 9, forced: false });
        assert_eq!(coordinator.order_state("Ana Lima"), Some(OrderState::Printed));
    }

    #[test]
    fn test_not_ready_counts_large_pending_totals() {
        let bulk = OrderRecord::new(
            "Jane Doe",
            vec![
                LineItemRecord::new("Crown Hat", "SKU-A", 3_000_000_000),
                LineItemRecord::new("Crown Sock", "SKU-B", 3_000_000_000),
            ],
        );
        let ledger = Ledger::build(vec![bulk]).unwrap();
        let mut coordinator =
            ScanCoordinator::new(ledger, StubLabels::with("jane doe", 1), Arc::new(RecordingPrinter::default()));

        assert_eq!(
            coordinator.on_print_request("Jane Doe", false),
            CoordinatorEvent::NotReady { customer: CustomerKey::new("Jane Doe"), pending: 6_000_000_000 }
        );
    }

    #[test]
    fn test_manual_print_requires_completion_unless_forced() {
        let printer = Arc::new(RecordingPrinter::default());
        let mut coordinator = coordinator(StubLabels::with("jane doe", 3), printer.clone());
        coordinator.on_scan("SKU-A");

        assert_eq!(
            coordinator.on_print_request("Jane Doe", false),
            CoordinatorEvent::NotReady { customer: CustomerKey::new("Jane Doe"), pending: 2 }
        );

        let forced = coordinator.on_print_request("Jane Doe", true);
        assert_eq!(forced, CoordinatorEvent::LabelPrinted { customer: CustomerKey::new("Jane Doe"), page: 3, forced: true });
        assert_eq!(coordinator.order_state("Jane Doe"), Some(OrderState::Printed));
        assert_eq!(coordinator.pending_items("Jane Doe").values().sum::<u32>(), 2);

        // finishing the order afterwards must not print again
        coordinator.on_scan("SKU-A");
        let events = coordinator.on_scan("SKU-B");
        assert_eq!(events.len(), 1);
        assert_eq!(printer.jobs.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_customer_print_request() {
        let mut coordinator = coordinator(StubLabels::with("jane doe", 1), Arc::new(RecordingPrinter::default()));
        assert_eq!(
            coordinator.on_print_request("Nobody Here", true),
            CoordinatorEvent::UnknownCustomer { customer: CustomerKey::new("nobody here") }
        );
    }

    #[test]
    fn test_reset_returns_to_pending_and_allows_reprint() {
        let printer = Arc::new(RecordingPrinter::default());
        let mut coordinator = coordinator(StubLabels::with("jane doe", 1), printer.clone());
        for sku in ["SKU-A", "SKU-A", "SKU-B"] {
            coordinator.on_scan(sku);
        }
        assert_eq!(coordinator.order_state("Jane Doe"), Some(OrderState::Printed));

        coordinator.reset(None);
        assert_eq!(coordinator.order_state("Jane Doe"), Some(OrderState::Pending));
        assert_eq!(coordinator.printed_customers().count(), 0);
        assert_eq!(coordinator.pending_items("Jane Doe").get("sku-a"), Some(&2));

        for sku in ["SKU-A", "SKU-A", "SKU-B"] {
            coordinator.on_scan(sku);
        }
        assert_eq!(printer.jobs.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_one_scan_never_credits_two_orders() {
        let john = OrderRecord::new("John Roe", vec![LineItemRecord::new("Crown Hat", "sku-a", 1)]);
        let ledger = Ledger::build(vec![john, jane_doe()]).unwrap();
        let mut coordinator = ScanCoordinator::new(
            ledger,
            StubLabels::with("john roe", 1),
            Arc::new(RecordingPrinter::default()),
        );

        let events = coordinator.on_scan("SKU-A");
        assert_eq!(events[0], CoordinatorEvent::ItemCompleted {
            customer: CustomerKey::new("John Roe"),
            sku: SkuCode::new("sku-a"),
            required: 1,
        });
        assert_eq!(coordinator.pending_items("Jane Doe").get("sku-a"), Some(&2));

        let events = coordinator.on_scan("SKU-A");
        assert!(matches!(&events[0], CoordinatorEvent::Progress { customer, .. } if customer.as_str() == "jane doe"));
    }

    #[test]
    fn test_extra_scan_reports_already_satisfied() {
        let mut coordinator = coordinator(StubLabels::with("jane doe", 1), Arc::new(RecordingPrinter::default()));
        coordinator.on_scan("SKU-B");
        let before = coordinator.ledger().clone();

        let events = coordinator.on_scan("sku-b");
        assert_eq!(events, vec![CoordinatorEvent::AlreadySatisfied { sku: SkuCode::new("SKU-B") }]);
        assert_eq!(coordinator.ledger(), &before);
    }
}
