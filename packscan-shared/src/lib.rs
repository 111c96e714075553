pub mod models;
pub mod pii;

pub use models::events::{SessionEvent, SessionEventKind};
pub use pii::Masked;
