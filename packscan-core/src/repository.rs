use serde::{Deserialize, Serialize};
use packscan_shared::Masked;
use crate::CoreResult;

/// One customer's order as delivered by the order source, before validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRecord {
    #[serde(alias = "name")]
    pub customer_name: String,
    #[serde(default)]
    pub address: Masked<String>,
    pub items: Vec<LineItemRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItemRecord {
    #[serde(alias = "product", default)]
    pub product_name: String,
    pub sku: String,
    pub quantity: i64,
}

impl LineItemRecord {
    pub fn new(product_name: &str, sku: &str, quantity: i64) -> Self {
        Self {
            product_name: product_name.to_string(),
            sku: sku.to_string(),
            quantity,
        }
    }
}

impl OrderRecord {
    pub fn new(customer_name: &str, items: Vec<LineItemRecord>) -> Self {
        Self {
            customer_name: customer_name.to_string(),
            address: Masked::default(),
            items,
        }
    }
}

/// Read-once source of the orders for a scanning session
pub trait OrderSource: Send + Sync {
    fn load_orders(&self) -> CoreResult<Vec<OrderRecord>>;
}
