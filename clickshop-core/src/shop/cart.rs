use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::error::{ShopError, ShopResult};
use crate::models::invoice::InvoiceLine;
use crate::shop::Shop;

/// One prospective sale line.
///
/// Name and unit price are frozen from the catalog when the product enters
/// the cart, matching what the invoice will record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: Uuid,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl CartLine {
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }

    /// Frozen copy for the invoice ledger.
    pub(crate) fn freeze(&self) -> InvoiceLine {
        InvoiceLine {
            product_id: self.product_id,
            name: self.name.clone(),
            unit_price: self.unit_price,
            quantity: self.quantity,
        }
    }
}

/// A per-user, in-memory prospective sale. Never persisted; discarded on
/// checkout or logout.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    pub(crate) lines: Vec<CartLine>,
}

impl Cart {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    fn line_mut(&mut self, product_id: Uuid) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|l| l.product_id == product_id)
    }

    pub(crate) fn view(&self) -> CartView {
        CartView {
            lines: self.lines.clone(),
            total: self.total(),
        }
    }
}

/// Snapshot of a cart for the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub total: Decimal,
}

impl Shop {
    /// Add one unit of `product_id` to the caller's cart.
    ///
    /// Rejected when the product has no stock, or when the cart already
    /// holds every available unit. Stock is checked against the catalog's
    /// current state, not reserved.
    pub fn add_to_cart(&self, user_id: Uuid, product_id: Uuid) -> ShopResult<CartView> {
        let mut state = self.state();

        let (stock, name, unit_price) = {
            let product = state
                .products
                .iter()
                .find(|p| p.id == product_id)
                .ok_or(ShopError::ProductNotFound)?;
            (product.stock, product.name.clone(), product.price)
        };
        if stock == 0 {
            warn!("Rejected add to cart: {} is out of stock", name);
            return Err(ShopError::OutOfStock);
        }

        let cart = state.carts.entry(user_id).or_default();
        match cart.line_mut(product_id) {
            Some(line) if line.quantity >= stock => {
                warn!("Rejected add to cart: cart already holds all {} units of {}", stock, name);
                Err(ShopError::StockLimitReached)
            }
            Some(line) => {
                line.quantity += 1;
                Ok(cart.view())
            }
            None => {
                cart.lines.push(CartLine {
                    product_id,
                    name,
                    unit_price,
                    quantity: 1,
                });
                Ok(cart.view())
            }
        }
    }

    /// Set the quantity of an existing cart line.
    ///
    /// Accepted only for `1 <= quantity <= stock`; anything else leaves the
    /// prior quantity in place.
    pub fn set_quantity(&self, user_id: Uuid, product_id: Uuid, quantity: u32) -> ShopResult<CartView> {
        let mut state = self.state();

        let stock = state
            .products
            .iter()
            .find(|p| p.id == product_id)
            .map(|p| p.stock)
            .ok_or(ShopError::ProductNotFound)?;

        if quantity == 0 {
            return Err(ShopError::Validation("quantity must be at least 1".into()));
        }
        if quantity > stock {
            warn!("Rejected quantity {}: only {} units in stock", quantity, stock);
            return Err(ShopError::InsufficientStock { available: stock });
        }

        let cart = state.carts.entry(user_id).or_default();
        let line = cart.line_mut(product_id).ok_or(ShopError::LineNotFound)?;
        line.quantity = quantity;
        Ok(cart.view())
    }

    /// Drop a line from the cart. Removing an absent line is not an error.
    pub fn remove_line(&self, user_id: Uuid, product_id: Uuid) -> ShopResult<CartView> {
        let mut state = self.state();
        let cart = state.carts.entry(user_id).or_default();
        cart.lines.retain(|l| l.product_id != product_id);
        Ok(cart.view())
    }

    /// The caller's current cart.
    pub fn cart(&self, user_id: Uuid) -> CartView {
        let state = self.state();
        state
            .carts
            .get(&user_id)
            .map(Cart::view)
            .unwrap_or_else(|| Cart::default().view())
    }
}
