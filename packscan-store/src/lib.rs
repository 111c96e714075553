pub mod app_config;
pub mod order_file;
pub mod label_index;
pub mod spooler;
pub mod events;

pub use app_config::Config;
pub use order_file::JsonOrderFile;
pub use label_index::LabelTextIndex;
pub use spooler::{CommandPrinter, PrintSpooler, SpoolError};
pub use events::EventJournal;
