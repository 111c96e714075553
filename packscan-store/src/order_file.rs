use packscan_core::{CoreError, CoreResult, OrderRecord, OrderSource};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Orders exported as JSON, either a bare array or `{ "orders": [...] }`
#[derive(Debug, Clone)]
pub struct JsonOrderFile {
    path: PathBuf,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OrderDocument {
    List(Vec<OrderRecord>),
    Wrapped { orders: Vec<OrderRecord> },
}

impl JsonOrderFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OrderSource for JsonOrderFile {
    fn load_orders(&self) -> CoreResult<Vec<OrderRecord>> {
        let raw = std::fs::read_to_string(&self.path)
            .map_err(|e| CoreError::SourceUnavailable(format!("{}: {}", self.path.display(), e)))?;

        let orders = parse_orders(&raw)?;
        info!(path = %self.path.display(), count = orders.len(), "Loaded orders");
        Ok(orders)
    }
}

/// Parse an order document. Non-integer quantities are rejected here.
pub fn parse_orders(raw: &str) -> CoreResult<Vec<OrderRecord>> {
    let document: OrderDocument =
        serde_json::from_str(raw).map_err(|e| CoreError::InvalidOrderData(e.to_string()))?;

    Ok(match document {
        OrderDocument::List(orders) => orders,
        OrderDocument::Wrapped { orders } => orders,
    })
}
