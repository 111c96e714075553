use packscan_shared::SessionEvent;
use std::path::Path;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{error, info};

/// Append-only JSON-lines record of a scanning session
pub struct EventJournal {
    file: File,
}

impl EventJournal {
    pub async fn open(path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path).await?;
        info!(path = %path.display(), "Journal opened");
        Ok(Self { file })
    }

    pub async fn publish(&mut self, event: &SessionEvent) -> std::io::Result<()> {
        let mut line = event.to_json_line().map_err(std::io::Error::other)?;
        line.push('\n');

        if let Err(e) = self.file.write_all(line.as_bytes()).await {
            error!("Failed to write journal entry: {}", e);
            return Err(e);
        }
        self.file.flush().await
    }
}
