use crate::command::Input;
use packscan_core::CustomerKey;
use packscan_order::{CoordinatorEvent, ScanCoordinator, ScanDebouncer};
use packscan_shared::{SessionEvent, SessionEventKind};
use packscan_store::EventJournal;
use std::time::Instant;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// One scanning session: serializes operator input into the coordinator
pub struct Session {
    pub id: Uuid,
    coordinator: ScanCoordinator,
    debouncer: ScanDebouncer,
    journal: Option<EventJournal>,
}

impl Session {
    pub fn new(coordinator: ScanCoordinator, debouncer: ScanDebouncer) -> Self {
        Self {
            id: Uuid::new_v4(),
            coordinator,
            debouncer,
            journal: None,
        }
    }

    pub fn with_journal(mut self, journal: EventJournal) -> Self {
        self.journal = Some(journal);
        self
    }

    pub fn coordinator(&self) -> &ScanCoordinator {
        &self.coordinator
    }

    /// Read input lines until EOF or `:quit`, writing feedback to `out`
    pub async fn run<R, W>(&mut self, reader: R, mut out: W) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!(session_id = %self.id, "Session started");
        out.write_all(format!("{}\n", self.coordinator.summary()).as_bytes()).await?;

        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            let (feedback, flow) = self.handle(Input::parse(&line), Instant::now()).await;
            for text in feedback {
                out.write_all(text.as_bytes()).await?;
                out.write_all(b"\n").await?;
            }
            out.flush().await?;

            if flow == Flow::Quit {
                break;
            }
        }

        info!(session_id = %self.id, summary = %self.coordinator.summary(), "Session ended");
        Ok(())
    }

    /// Apply one input and return the lines to show the operator
    pub async fn handle(&mut self, input: Input, now: Instant) -> (Vec<String>, Flow) {
        debug!(?input, "Input");
        let mut feedback = Vec::new();

        match input {
            Input::Scan(sku) => {
                if !self.debouncer.accept(&sku, now) {
                    debug!(sku = %sku, "Repeat decode dropped");
                    return (feedback, Flow::Continue);
                }
                let events = self.coordinator.on_scan(&sku);
                self.record(&events).await;
                feedback.extend(events.iter().map(describe));
                if let Some(customer) = scanned_customer(&events) {
                    feedback.extend(self.render_order(&customer));
                }
                feedback.push(self.coordinator.summary().to_string());
            }
            Input::Print { customer, forced } => {
                let event = self.coordinator.on_print_request(&customer, forced);
                self.record(std::slice::from_ref(&event)).await;
                feedback.push(describe(&event));
            }
            Input::Reset(customer) => {
                self.coordinator.reset(customer.as_deref());
                if customer.is_none() {
                    self.debouncer.clear();
                }
                self.publish(SessionEventKind::Reset { customer: customer.clone() }).await;
                feedback.push(match customer {
                    Some(name) => format!("Reset {}", name),
                    None => "Reset all orders".to_string(),
                });
            }
            Input::Pending(customer) => {
                let pending = self.coordinator.pending_items(&customer);
                if self.coordinator.order_state(&customer).is_none() {
                    feedback.push(format!("! No order for {}", customer));
                } else if pending.is_empty() {
                    feedback.push(format!("Nothing left to scan for {}", customer));
                } else {
                    feedback.extend(pending.iter().map(|(sku, left)| format!("    {}: {} to go", sku, left)));
                }
            }
            Input::Status => {
                let events = self.coordinator.poll();
                self.record(&events).await;
                feedback.extend(events.iter().map(describe));
                let customers: Vec<CustomerKey> =
                    self.coordinator.ledger().customers().map(|order| order.customer.clone()).collect();
                for customer in &customers {
                    feedback.extend(self.render_order(customer));
                }
                feedback.push(self.coordinator.summary().to_string());
            }
            Input::Quit => return (feedback, Flow::Quit),
            Input::Ignored(line) if line.is_empty() => {}
            Input::Ignored(line) => feedback.push(format!("! Unrecognised command: {}", line)),
        }

        (feedback, Flow::Continue)
    }

    /// Read-only view of one order, in the layout of the packing screen
    fn render_order(&self, customer: &CustomerKey) -> Vec<String> {
        let ledger = self.coordinator.ledger();
        let Some(order) = ledger.order(customer) else {
            return Vec::new();
        };

        let state = self
            .coordinator
            .order_state(customer.as_str())
            .map(|state| format!("{:?}", state).to_uppercase())
            .unwrap_or_default();

        let mut lines = vec![format!("{} [{}]", order.customer_name, state)];
        for item in ledger.item_progress(customer) {
            let mark = if item.scanned >= item.required { "✔" } else { "✖" };
            lines.push(format!(
                "    {}  {} ({}): {}/{}",
                mark, item.product_name, item.sku, item.scanned, item.required
            ));
        }
        lines
    }

    async fn record(&mut self, events: &[CoordinatorEvent]) {
        for event in events {
            self.publish(SessionEventKind::from(event)).await;
        }
    }

    async fn publish(&mut self, kind: SessionEventKind) {
        let id = self.id;
        if let Some(journal) = self.journal.as_mut() {
            if let Err(e) = journal.publish(&SessionEvent::new(id, kind)).await {
                warn!("Journal write failed: {}", e);
            }
        }
    }
}

fn describe(event: &CoordinatorEvent) -> String {
    if event.is_warning() {
        format!("! {}", event)
    } else {
        event.to_string()
    }
}

fn scanned_customer(events: &[CoordinatorEvent]) -> Option<CustomerKey> {
    match events.first()? {
        CoordinatorEvent::Progress { customer, .. } | CoordinatorEvent::ItemCompleted { customer, .. } => {
            Some(customer.clone())
        }
        _ => None,
    }
}
