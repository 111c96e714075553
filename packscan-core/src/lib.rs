pub mod identity;
pub mod printing;
pub mod repository;

pub use identity::{CustomerKey, SkuCode};
pub use printing::{LabelLookup, LabelPrinter, PrintDispatch, PrintJob};
pub use repository::{LineItemRecord, OrderRecord, OrderSource};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid order data: {0}")]
    InvalidOrderData(String),
    #[error("Order source unavailable: {0}")]
    SourceUnavailable(String),
    #[error("Print dispatch failed: {0}")]
    PrintDispatchFailed(String),
    #[error("Printing failed: {0}")]
    PrintFailed(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
