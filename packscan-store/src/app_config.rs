use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub orders: OrdersConfig,
    pub labels: LabelsConfig,
    pub print: PrintConfig,
    pub scan: ScanConfig,
    #[serde(default)]
    pub journal: JournalConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OrdersConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LabelsConfig {
    /// Document handed to the printer
    pub document_path: PathBuf,
    /// Plain-text rendering of the same document, one form feed per page
    pub text_path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PrintConfig {
    pub command: String,
    /// `{file}`, `{page}` and `{copies}` are substituted per job
    pub args: Vec<String>,
    pub copies: u32,
    pub cleanup_delay_secs: u64,
    pub queue_depth: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScanConfig {
    pub debounce_ms: u64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct JournalConfig {
    pub path: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(Path::new("config"))
    }

    pub fn load_from(dir: &Path) -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        let layer = |name: &str| dir.join(name).to_string_lossy().into_owned();

        let s = config::Config::builder()
            .set_default("orders.path", "data/orders.json")?
            .set_default("labels.document_path", "data/shipping_labels.pdf")?
            .set_default("labels.text_path", "data/shipping_labels.txt")?
            .set_default("print.command", "lp")?
            .set_default("print.args", vec!["-n", "{copies}", "-P", "{page}", "{file}"])?
            .set_default("print.copies", 1_i64)?
            .set_default("print.cleanup_delay_secs", 60_i64)?
            .set_default("print.queue_depth", 16_i64)?
            .set_default("scan.debounce_ms", 2000_i64)?
            .add_source(config::File::with_name(&layer("default")).required(false))
            .add_source(config::File::with_name(&layer(&run_mode)).required(false))
            // Machine-specific overrides, not checked in
            .add_source(config::File::with_name(&layer("local")).required(false))
            // e.g. `PACKSCAN__PRINT__COPIES=2`
            .add_source(config::Environment::with_prefix("PACKSCAN").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
