use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::cart::{CartError, CartSnapshot, CheckoutReceipt, LineItem};

/// Owns the shopping cart for one session.
///
/// Line items are kept in insertion order, with a key index for lookups. The
/// running total is maintained incrementally from each item's stored unit
/// price, so it always equals the sum of the item subtotals.
#[derive(Debug, Default)]
pub struct CartManager {
    items: Vec<LineItem>,
    index: HashMap<String, usize>,
    total_price: Decimal,
}

impl CartManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of a product, merging into an existing line item
    pub fn add_item(&mut self, product_key: &str, unit_price: Decimal) -> CartSnapshot {
        if let Some(&pos) = self.index.get(product_key) {
            let item = &self.items[pos];
            if item.unit_price != unit_price {
                warn!(
                    "Price for '{}' changed from {} to {}; keeping cart price",
                    product_key, item.unit_price, unit_price
                );
            }
            let next = item.quantity.saturating_add(1);
            self.replace_quantity(pos, next);
            info!("Incremented '{}' to quantity {}", product_key, next);
        } else {
            self.index.insert(product_key.to_string(), self.items.len());
            self.items.push(LineItem::new(product_key, unit_price));
            self.total_price += unit_price;
            info!("Added '{}' to cart at {}", product_key, unit_price);
        }

        self.snapshot()
    }

    /// Replace an item's quantity. Zero removes the item.
    pub fn set_quantity(
        &mut self,
        product_key: &str,
        new_quantity: u32,
    ) -> Result<CartSnapshot, CartError> {
        if new_quantity == 0 {
            return self.remove_item(product_key);
        }

        let pos = self.position(product_key)?;
        self.replace_quantity(pos, new_quantity);
        info!("Set quantity of '{}' to {}", product_key, new_quantity);

        Ok(self.snapshot())
    }

    pub fn remove_item(&mut self, product_key: &str) -> Result<CartSnapshot, CartError> {
        let pos = self.position(product_key)?;

        let item = self.items.remove(pos);
        self.index.remove(product_key);
        for (i, later) in self.items.iter().enumerate().skip(pos) {
            self.index.insert(later.product_key.clone(), i);
        }
        self.total_price -= item.subtotal();

        info!("Removed '{}' from cart", product_key);
        if self.items.is_empty() {
            debug!("Cart is now empty");
        }

        Ok(self.snapshot())
    }

    /// Clear the cart in one step and hand back what was purchased
    pub fn checkout(&mut self) -> CheckoutReceipt {
        let items = std::mem::take(&mut self.items);
        let total_price = std::mem::take(&mut self.total_price);
        self.index.clear();

        let receipt = CheckoutReceipt {
            order_id: Uuid::new_v4(),
            item_count: items.len(),
            items,
            total_price,
            purchased_at: Utc::now(),
        };

        info!(
            "Checkout {} completed: {} items, total {}",
            receipt.order_id, receipt.item_count, receipt.total_price
        );
        receipt
    }

    pub fn total_price(&self) -> Decimal {
        self.total_price
    }

    /// Number of distinct line items
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn total_units(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    pub fn line_items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn get(&self, product_key: &str) -> Option<&LineItem> {
        self.index.get(product_key).map(|&pos| &self.items[pos])
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            items: self.items.clone(),
            item_count: self.item_count(),
            total_units: self.total_units(),
            total_price: self.total_price,
        }
    }

    fn position(&self, product_key: &str) -> Result<usize, CartError> {
        self.index.get(product_key).copied().ok_or_else(|| {
            warn!("Cart has no line item for '{}'", product_key);
            CartError::NotFound {
                product_key: product_key.to_string(),
            }
        })
    }

    fn replace_quantity(&mut self, pos: usize, new_quantity: u32) {
        let item = &mut self.items[pos];
        let old = Decimal::from(item.quantity);
        let new = Decimal::from(new_quantity);
        self.total_price += item.unit_price * (new - old);
        item.quantity = new_quantity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn recomputed_total(cart: &CartManager) -> Decimal {
        cart.line_items().iter().map(LineItem::subtotal).sum()
    }

    #[test]
    fn test_add_new_item() {
        let mut cart = CartManager::new();
        let snapshot = cart.add_item("Shirt", dec!(20.00));

        assert_eq!(snapshot.item_count, 1);
        assert_eq!(snapshot.total_price, dec!(20.00));
        assert_eq!(cart.get("Shirt").map(|i| i.quantity), Some(1));
    }

    #[test]
    fn test_add_existing_item_merges() {
        let mut cart = CartManager::new();
        cart.add_item("Shirt", dec!(20.00));
        let snapshot = cart.add_item("Shirt", dec!(20.00));

        assert_eq!(snapshot.items.len(), 1);
        assert_eq!(snapshot.items[0].quantity, 2);
        assert_eq!(snapshot.total_units, 2);
        assert_eq!(snapshot.total_price, dec!(40.00));
    }

    #[test]
    fn test_merge_keeps_stored_price() {
        let mut cart = CartManager::new();
        cart.add_item("Shirt", dec!(20.00));
        cart.add_item("Shirt", dec!(25.00));

        assert_eq!(cart.get("Shirt").map(|i| i.unit_price), Some(dec!(20.00)));
        assert_eq!(cart.total_price(), dec!(40.00));
    }

    #[test]
    fn test_set_quantity_uses_unit_price() {
        let mut cart = CartManager::new();
        cart.add_item("Shirt", dec!(20.00));
        cart.add_item("Hat", dec!(10.00));

        let snapshot = cart.set_quantity("Shirt", 3).unwrap();
        assert_eq!(snapshot.total_price, dec!(70.00));

        let snapshot = cart.set_quantity("Shirt", 1).unwrap();
        assert_eq!(snapshot.total_price, dec!(30.00));
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let mut cart = CartManager::new();
        cart.add_item("Shirt", dec!(20.00));
        cart.add_item("Hat", dec!(10.00));

        let snapshot = cart.set_quantity("Shirt", 0).unwrap();
        assert_eq!(snapshot.item_count, 1);
        assert!(cart.get("Shirt").is_none());
        assert_eq!(cart.total_price(), dec!(10.00));
    }

    #[test]
    fn test_set_quantity_missing_item() {
        let mut cart = CartManager::new();
        cart.add_item("Hat", dec!(10.00));

        let result = cart.set_quantity("Shirt", 2);
        assert!(matches!(result, Err(CartError::NotFound { .. })));
        assert_eq!(cart.total_price(), dec!(10.00));
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_remove_keeps_order_and_index() {
        let mut cart = CartManager::new();
        cart.add_item("A", dec!(1.00));
        cart.add_item("B", dec!(2.00));
        cart.add_item("C", dec!(3.00));

        cart.remove_item("A").unwrap();
        let keys: Vec<&str> = cart
            .line_items()
            .iter()
            .map(|i| i.product_key.as_str())
            .collect();
        assert_eq!(keys, vec!["B", "C"]);

        // index must still resolve the shifted items
        cart.set_quantity("C", 2).unwrap();
        assert_eq!(cart.get("C").map(|i| i.quantity), Some(2));
        assert_eq!(cart.total_price(), dec!(8.00));
        assert_eq!(cart.total_price(), recomputed_total(&cart));
    }

    #[test]
    fn test_remove_missing_item_reports_not_found() {
        let mut cart = CartManager::new();
        let result = cart.remove_item("Nonexistent");

        assert_eq!(
            result,
            Err(CartError::NotFound {
                product_key: "Nonexistent".to_string()
            })
        );
        assert_eq!(cart.item_count(), 0);
        assert_eq!(cart.total_price(), dec!(0.00));
    }

    #[test]
    fn test_checkout_clears_and_reports() {
        let mut cart = CartManager::new();
        cart.add_item("Shirt", dec!(20.00));
        cart.add_item("Shirt", dec!(20.00));
        cart.add_item("Hat", dec!(15.00));

        let receipt = cart.checkout();
        assert_eq!(receipt.item_count, 2);
        assert_eq!(receipt.total_price, dec!(55.00));
        assert!(cart.is_empty());
        assert_eq!(cart.total_price(), Decimal::ZERO);
        assert!(cart.get("Shirt").is_none());

        // the cart is usable again after checkout
        cart.add_item("Shirt", dec!(20.00));
        assert_eq!(cart.get("Shirt").map(|i| i.quantity), Some(1));
    }

    #[test]
    fn test_fractional_prices_do_not_drift() {
        let mut cart = CartManager::new();
        for _ in 0..10 {
            cart.add_item("Sticker", dec!(0.10));
        }
        cart.add_item("Pen", dec!(0.20));

        assert_eq!(cart.total_price(), dec!(1.20));
        cart.set_quantity("Sticker", 3).unwrap();
        assert_eq!(cart.total_price(), dec!(0.50));
    }
}
