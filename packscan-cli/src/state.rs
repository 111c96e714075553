use anyhow::Context;
use packscan_core::OrderSource;
use packscan_order::{Ledger, ScanCoordinator, ScanDebouncer};
use packscan_store::{CommandPrinter, Config, EventJournal, JsonOrderFile, LabelTextIndex, PrintSpooler};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::session::Session;

/// Wire the collaborators named in the config into a ready session.
///
/// Malformed order data is the only fatal error; a missing label text file
/// just means every lookup fails until the file exists on the next start.
pub async fn build_session(config: &Config) -> anyhow::Result<(Session, JoinHandle<()>)> {
    let records = JsonOrderFile::new(&config.orders.path)
        .load_orders()
        .context("Failed to load orders")?;
    let ledger = Ledger::build(records).context("Order data rejected")?;

    let labels = match LabelTextIndex::load(&config.labels.text_path) {
        Ok(index) => index,
        Err(e) => {
            tracing::warn!(path = %config.labels.text_path.display(), "Label text unavailable: {}", e);
            LabelTextIndex::default()
        }
    };

    let printer = CommandPrinter::new(&config.labels.document_path, &config.print.command, config.print.args.clone())
        .with_cleanup_delay(Duration::from_secs(config.print.cleanup_delay_secs));
    let (spooler, worker) = PrintSpooler::start(Arc::new(printer), config.print.queue_depth);

    let coordinator = ScanCoordinator::new(ledger, Arc::new(labels), Arc::new(spooler))
        .with_copies(config.print.copies);
    let debouncer = ScanDebouncer::new(Duration::from_millis(config.scan.debounce_ms));

    let mut session = Session::new(coordinator, debouncer);
    if let Some(path) = &config.journal.path {
        let journal = EventJournal::open(path)
            .await
            .with_context(|| format!("Failed to open journal {}", path.display()))?;
        session = session.with_journal(journal);
    }

    Ok((session, worker))
}
