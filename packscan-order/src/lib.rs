pub mod models;
pub mod ledger;
pub mod coordinator;
pub mod debounce;
pub mod summary;

pub use models::{Order, OrderError, OrderLine, OrderState};
pub use ledger::{ItemProgress, Ledger, LedgerEntry, ScanResult};
pub use coordinator::{CoordinatorEvent, ScanCoordinator};
pub use debounce::ScanDebouncer;
pub use summary::SessionSummary;
