use packscan_core::{CustomerKey, OrderRecord, SkuCode};
use packscan_shared::Masked;
use serde::{Deserialize, Serialize};

/// Where an order stands in the packing flow
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderState {
    /// At least one item is short
    Pending,
    /// Every item scanned, label not printed yet
    Complete,
    /// Label printed; terminal until reset
    Printed,
}

/// A customer's order after validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub customer: CustomerKey,
    /// Name as it appeared in the source, for display
    pub customer_name: String,
    pub address: Masked<String>,
    pub items: Vec<OrderLine>,
}

/// One SKU of an order with the number of units that must be scanned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_name: String,
    pub sku: SkuCode,
    pub required: u32,
}

impl Order {
    /// Validate a raw record, merging line items that share a SKU
    pub fn from_record(record: OrderRecord) -> Result<Self, OrderError> {
        let customer = CustomerKey::new(&record.customer_name);
        if customer.is_empty() {
            return Err(OrderError::InvalidOrderData("customer name is empty".to_string()));
        }

        let mut order = Self {
            customer,
            customer_name: record.customer_name.trim().to_string(),
            address: record.address,
            items: Vec::new(),
        };

        for item in record.items {
            let sku = SkuCode::new(&item.sku);
            if sku.is_empty() {
                return Err(OrderError::InvalidOrderData(format!(
                    "empty SKU in order for {}",
                    order.customer_name
                )));
            }
            let required = u32::try_from(item.quantity).map_err(|_| {
                OrderError::InvalidOrderData(format!(
                    "quantity {} for SKU {} in order for {} is not a valid count",
                    item.quantity, sku, order.customer_name
                ))
            })?;

            order.add_line(OrderLine {
                product_name: item.product_name.trim().to_string(),
                sku,
                required,
            })?;
        }

        Ok(order)
    }

    /// Add a line, summing quantities when the SKU is already present
    pub fn add_line(&mut self, line: OrderLine) -> Result<(), OrderError> {
        match self.items.iter_mut().find(|existing| existing.sku == line.sku) {
            Some(existing) => {
                existing.required = existing.required.checked_add(line.required).ok_or_else(|| {
                    OrderError::InvalidOrderData(format!("quantity overflow for SKU {}", line.sku))
                })?;
            }
            None => self.items.push(line),
        }
        Ok(())
    }

    /// Fold another order for the same customer into this one
    pub fn merge(&mut self, other: Order) -> Result<(), OrderError> {
        for line in other.items {
            self.add_line(line)?;
        }
        Ok(())
    }

    pub fn line(&self, sku: &SkuCode) -> Option<&OrderLine> {
        self.items.iter().find(|line| &line.sku == sku)
    }

    pub fn total_units(&self) -> u64 {
        self.items.iter().map(|line| u64::from(line.required)).sum()
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum OrderError {
    #[error("Invalid order data: {0}")]
    InvalidOrderData(String),
}

impl From<OrderError> for packscan_core::CoreError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::InvalidOrderData(msg) => packscan_core::CoreError::InvalidOrderData(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use packscan_core::LineItemRecord;

    #[test]
    fn test_duplicate_skus_are_merged() {
        let record = OrderRecord::new(
            " Jane Doe ",
            vec![
                LineItemRecord::new("Crown Hat", "SKU-A", 1),
                LineItemRecord::new("Crown Sock", "SKU-B", 1),
                LineItemRecord::new("Crown Hat", "sku-a ", 2),
            ],
        );

        let order = Order::from_record(record).unwrap();

        assert_eq!(order.customer.as_str(), "jane doe");
        assert_eq!(order.customer_name, "Jane Doe");
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.line(&SkuCode::new("SKU-A")).unwrap().required, 3);
        assert_eq!(order.total_units(), 4);
    }

    #[test]
    fn test_total_units_across_large_lines() {
        let record = OrderRecord::new(
            "Jane Doe",
            vec![
                LineItemRecord::new("Crown Hat", "SKU-A", 3_000_000_000),
                LineItemRecord::new("Crown Sock", "SKU-B", 3_000_000_000),
            ],
        );

        let order = Order::from_record(record).unwrap();
        assert_eq!(order.total_units(), 6_000_000_000);
    }

    #[test]
    fn test_negative_quantity_rejected() {
        let record = OrderRecord::new("Jane Doe", vec![LineItemRecord::new("Hat", "SKU-A", -1)]);
        assert!(matches!(Order::from_record(record), Err(OrderError::InvalidOrderData(_))));
    }

    #[test]
    fn test_empty_customer_rejected() {
        let record = OrderRecord::new("   ", vec![LineItemRecord::new("Hat", "SKU-A", 1)]);
        assert!(Order::from_record(record).is_err());
    }

    #[test]
    fn test_empty_sku_rejected() {
        let record = OrderRecord::new("Jane Doe", vec![LineItemRecord::new("Hat", "  ", 1)]);
        assert!(Order::from_record(record).is_err());
    }
}
