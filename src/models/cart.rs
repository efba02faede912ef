use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One entry in the cart: a single product and how many of it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub product_key: String,
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl LineItem {
    pub fn new(product_key: impl Into<String>, unit_price: Decimal) -> Self {
        Self {
            product_key: product_key.into(),
            unit_price,
            quantity: 1,
        }
    }

    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Read-only view of the cart handed to the renderer after each mutation
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct CartSnapshot {
    pub items: Vec<LineItem>,
    pub item_count: usize,
    pub total_units: u64,
    pub total_price: Decimal,
}

impl CartSnapshot {
    pub fn is_empty(&self) -> bool {
        self.item_count == 0
    }
}

/// Confirmation returned by a (mock) checkout
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CheckoutReceipt {
    pub order_id: Uuid,
    pub items: Vec<LineItem>,
    pub item_count: usize,
    pub total_price: Decimal,
    pub purchased_at: DateTime<Utc>,
}

impl CheckoutReceipt {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CartError {
    #[error("Product '{product_key}' is not in the cart")]
    NotFound { product_key: String },
}
