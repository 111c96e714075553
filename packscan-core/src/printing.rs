use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::{CoreResult, CustomerKey};

/// A request to print one page of the shipping-labels document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrintJob {
    pub id: Uuid,
    pub customer: CustomerKey,
    /// 1-based page index into the labels document
    pub page: u32,
    pub copies: u32,
}

impl PrintJob {
    pub fn new(customer: CustomerKey, page: u32, copies: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer,
            page,
            copies,
        }
    }
}

/// Finds the page of the labels document that belongs to a customer
pub trait LabelLookup: Send + Sync {
    fn find_label_page(&self, customer: &CustomerKey) -> Option<u32>;
}

/// Non-blocking hand-off of a print job.
///
/// `Ok` means the job was accepted, not that paper came out; the physical
/// print runs elsewhere and its failures are only logged.
pub trait PrintDispatch: Send + Sync {
    fn dispatch(&self, job: PrintJob) -> CoreResult<()>;
}

/// Sends a page of the labels document to a physical printer
#[async_trait]
pub trait LabelPrinter: Send + Sync {
    async fn print_page(&self, page: u32, copies: u32) -> CoreResult<()>;
}
