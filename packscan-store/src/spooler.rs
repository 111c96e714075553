use async_trait::async_trait;
use packscan_core::{CoreError, CoreResult, LabelPrinter, PrintDispatch, PrintJob};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempPath;
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Background print queue.
///
/// `dispatch` only enqueues, so a slow or wedged printer never stalls scan
/// processing. Jobs that fail in the worker are logged and dropped.
#[derive(Clone)]
pub struct PrintSpooler {
    tx: mpsc::Sender<PrintJob>,
}

impl PrintSpooler {
    /// Spawn the worker on the current tokio runtime
    pub fn start(printer: Arc<dyn LabelPrinter>, queue_depth: usize) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(queue_depth.max(1));
        let handle = tokio::spawn(run_worker(rx, printer));
        (Self { tx }, handle)
    }
}

impl PrintDispatch for PrintSpooler {
    fn dispatch(&self, job: PrintJob) -> CoreResult<()> {
        self.tx.try_send(job).map_err(|e| match e {
            mpsc::error::TrySendError::Full(job) => {
                CoreError::PrintDispatchFailed(format!("print queue full, job {} dropped", job.id))
            }
            mpsc::error::TrySendError::Closed(_) => {
                CoreError::PrintDispatchFailed("print worker has stopped".to_string())
            }
        })
    }
}

async fn run_worker(mut rx: mpsc::Receiver<PrintJob>, printer: Arc<dyn LabelPrinter>) {
    info!("Print spooler started");

    while let Some(job) = rx.recv().await {
        info!(job_id = %job.id, customer = %job.customer, page = job.page, "Printing label");
        match printer.print_page(job.page, job.copies).await {
            Ok(()) => info!(job_id = %job.id, "Label sent to printer"),
            Err(e) => error!(job_id = %job.id, customer = %job.customer, "Printing failed: {}", e),
        }
    }

    info!("Print spooler stopped");
}

/// Prints a page of the labels document through an external command (`lp` by default).
///
/// The document is staged into a temporary copy first so the spooler reads a
/// stable file even if the labels are regenerated mid-session. The copy is
/// removed after `cleanup_delay` whether or not printing worked.
#[derive(Debug, Clone)]
pub struct CommandPrinter {
    document: PathBuf,
    command: String,
    args: Vec<String>,
    cleanup_delay: Duration,
}

impl CommandPrinter {
    pub fn new(document: impl Into<PathBuf>, command: &str, args: Vec<String>) -> Self {
        Self {
            document: document.into(),
            command: command.to_string(),
            args,
            cleanup_delay: Duration::from_secs(60),
        }
    }

    pub fn with_cleanup_delay(mut self, delay: Duration) -> Self {
        self.cleanup_delay = delay;
        self
    }

    /// Command arguments with the job's placeholders filled in
    pub fn render_args(&self, file: &str, page: u32, copies: u32) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| {
                arg.replace("{file}", file)
                    .replace("{page}", &page.to_string())
                    .replace("{copies}", &copies.to_string())
            })
            .collect()
    }

    async fn stage(&self) -> Result<TempPath, SpoolError> {
        let suffix = self
            .document
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();
        let staged = tempfile::Builder::new()
            .prefix("packscan-label-")
            .suffix(&suffix)
            .tempfile()?
            .into_temp_path();

        tokio::fs::copy(&self.document, &staged).await?;
        debug!(path = %staged.display(), "Staged label document");
        Ok(staged)
    }

    async fn run(&self, file: &str, page: u32, copies: u32) -> Result<(), SpoolError> {
        let status = Command::new(&self.command)
            .args(self.render_args(file, page, copies))
            .status()
            .await?;

        if status.success() {
            Ok(())
        } else {
            Err(SpoolError::CommandFailed {
                command: self.command.clone(),
                status: status.to_string(),
            })
        }
    }
}

#[async_trait]
impl LabelPrinter for CommandPrinter {
    async fn print_page(&self, page: u32, copies: u32) -> CoreResult<()> {
        let staged = self.stage().await?;
        let file = staged.to_string_lossy().into_owned();
        let result = self.run(&file, page, copies).await;

        schedule_cleanup(staged, self.cleanup_delay);
        result.map_err(CoreError::from)
    }
}

/// Delete a staged file after `delay`; dropping the path on shutdown removes it too
pub fn schedule_cleanup(path: TempPath, delay: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let shown = path.display().to_string();
        match path.close() {
            Ok(()) => debug!(path = %shown, "Deleted staged label"),
            Err(e) => warn!(path = %shown, "Failed to delete staged label: {}", e),
        }
    })
}

#[derive(Debug, thiserror::Error)]
pub enum SpoolError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{command} exited with {status}")]
    CommandFailed {
        command: String,
        status: String,
    },
}

impl From<SpoolError> for CoreError {
    fn from(err: SpoolError) -> Self {
        CoreError::PrintFailed(err.to_string())
    }
}
