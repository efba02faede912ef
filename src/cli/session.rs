use std::fmt;

use tracing::warn;

use crate::{
    models::{
        cart::{CartError, CartSnapshot, CheckoutReceipt},
        product::Product,
    },
    services::CartManager,
};

/// A user gesture from the shop menu, already resolved to typed arguments
#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    Add { product_key: String, unit_price: rust_decimal::Decimal },
    SetQuantity { product_key: String, quantity: u32 },
    Remove { product_key: String },
    Checkout,
}

impl CartAction {
    pub fn add(product: &Product) -> Self {
        CartAction::Add {
            product_key: product.cart_key().to_string(),
            unit_price: product.price,
        }
    }
}

/// What the renderer should show after an action
#[derive(Debug)]
pub enum CartEvent {
    Updated(CartSnapshot),
    CheckedOut(CheckoutReceipt),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    AddProduct,
    ChangeQuantity,
    RemoveItem,
    ViewCart,
    Checkout,
    Quit,
}

impl fmt::Display for MenuChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuChoice::AddProduct => write!(f, "Add a product"),
            MenuChoice::ChangeQuantity => write!(f, "Change a quantity"),
            MenuChoice::RemoveItem => write!(f, "Remove an item"),
            MenuChoice::ViewCart => write!(f, "View cart"),
            MenuChoice::Checkout => write!(f, "Checkout"),
            MenuChoice::Quit => write!(f, "Quit"),
        }
    }
}

/// One browsing session: the product listing plus the cart that goes with it
pub struct ShopSession {
    products: Vec<Product>,
    cart: CartManager,
}

impl ShopSession {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products,
            cart: CartManager::new(),
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn cart(&self) -> &CartManager {
        &self.cart
    }

    /// Cart-editing entries only appear once the cart has something in it
    pub fn menu(&self) -> Vec<MenuChoice> {
        let mut choices = Vec::with_capacity(6);
        if !self.products.is_empty() {
            choices.push(MenuChoice::AddProduct);
        }
        if !self.cart.is_empty() {
            choices.push(MenuChoice::ChangeQuantity);
            choices.push(MenuChoice::RemoveItem);
        }
        choices.push(MenuChoice::ViewCart);
        if !self.cart.is_empty() {
            choices.push(MenuChoice::Checkout);
        }
        choices.push(MenuChoice::Quit);
        choices
    }

    pub fn dispatch(&mut self, action: CartAction) -> Result<CartEvent, CartError> {
        let result = match action {
            CartAction::Add { product_key, unit_price } => {
                Ok(self.cart.add_item(&product_key, unit_price))
            }
            CartAction::SetQuantity { product_key, quantity } => {
                self.cart.set_quantity(&product_key, quantity)
            }
            CartAction::Remove { product_key } => self.cart.remove_item(&product_key),
            CartAction::Checkout => return Ok(CartEvent::CheckedOut(self.cart.checkout())),
        };

        result.map(CartEvent::Updated).map_err(|e| {
            warn!("Cart action rejected: {}", e);
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::product::Rating;
    use rust_decimal_macros::dec;

    fn shirt() -> Product {
        Product {
            id: 1,
            title: "Shirt".to_string(),
            price: dec!(20.00),
            description: String::new(),
            category: "men's clothing".to_string(),
            image: String::new(),
            rating: Rating::default(),
        }
    }

    #[test]
    fn test_menu_hides_cart_actions_when_empty() {
        let session = ShopSession::new(vec![shirt()]);
        assert_eq!(
            session.menu(),
            vec![MenuChoice::AddProduct, MenuChoice::ViewCart, MenuChoice::Quit]
        );
    }

    #[test]
    fn test_menu_shows_checkout_after_add() {
        let mut session = ShopSession::new(vec![shirt()]);
        session.dispatch(CartAction::add(&shirt())).unwrap();
        assert!(session.menu().contains(&MenuChoice::Checkout));
        assert!(session.menu().contains(&MenuChoice::RemoveItem));
    }

    #[test]
    fn test_menu_without_products() {
        let session = ShopSession::new(Vec::new());
        assert_eq!(session.menu(), vec![MenuChoice::ViewCart, MenuChoice::Quit]);
    }

    #[test]
    fn test_dispatch_flow() {
        let mut session = ShopSession::new(vec![shirt()]);

        session.dispatch(CartAction::add(&shirt())).unwrap();
        let event = session
            .dispatch(CartAction::SetQuantity {
                product_key: "Shirt".to_string(),
                quantity: 4,
            })
            .unwrap();
        match event {
            CartEvent::Updated(snapshot) => assert_eq!(snapshot.total_price, dec!(80.00)),
            other => panic!("unexpected event: {:?}", other),
        }

        let event = session.dispatch(CartAction::Checkout).unwrap();
        match event {
            CartEvent::CheckedOut(receipt) => assert_eq!(receipt.total_price, dec!(80.00)),
            other => panic!("unexpected event: {:?}", other),
        }
        assert!(session.cart().is_empty());
    }

    #[test]
    fn test_dispatch_stale_remove_reports_not_found() {
        let mut session = ShopSession::new(vec![shirt()]);
        let result = session.dispatch(CartAction::Remove {
            product_key: "Shirt".to_string(),
        });
        assert!(matches!(result, Err(CartError::NotFound { .. })));
        assert_eq!(session.cart().snapshot(), CartSnapshot::default());
    }
}
