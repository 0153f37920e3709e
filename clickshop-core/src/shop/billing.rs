use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{ShopError, ShopResult};
use crate::models::invoice::{CheckoutRequest, Invoice, InvoiceStatus, DEFAULT_CUSTOMER};
use crate::shop::Shop;

impl Shop {
    /// Finalize the caller's cart as a paid invoice.
    ///
    /// Runs as one unit inside the shop lock: every line is re-validated
    /// against live stock, the invoice is prepended to the ledger, catalog
    /// stock is decremented per line, and the cart is discarded. A
    /// validation failure aborts before anything is mutated.
    pub fn checkout(&self, user_id: Uuid, request: CheckoutRequest) -> ShopResult<Invoice> {
        let mut state = self.state();

        let cart_lines = state
            .carts
            .get(&user_id)
            .map(|c| c.lines.clone())
            .unwrap_or_default();
        if cart_lines.is_empty() {
            warn!("Rejected checkout: cart is empty");
            return Err(ShopError::EmptyCart);
        }

        // The cart was validated line by line as it was built, but stock
        // may have moved since; re-check everything before touching it.
        for line in &cart_lines {
            let product = state
                .products
                .iter()
                .find(|p| p.id == line.product_id)
                .ok_or(ShopError::ProductNotFound)?;
            if line.quantity > product.stock {
                warn!(
                    "Rejected checkout: {} has {} units left, cart wants {}",
                    product.name, product.stock, line.quantity
                );
                return Err(ShopError::InsufficientStock {
                    available: product.stock,
                });
            }
        }

        let now = Utc::now();
        let lines: Vec<_> = cart_lines.iter().map(|l| l.freeze()).collect();
        let total = lines.iter().map(|l| l.subtotal()).sum();
        let customer_name = request
            .customer_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| DEFAULT_CUSTOMER.to_string());

        let invoice = Invoice {
            id: Uuid::new_v4(),
            number: format!("INV-{}", now.timestamp_millis()),
            created_at: now,
            customer_name,
            lines,
            total,
            payment_method: request.payment_method,
            status: InvoiceStatus::Paid,
        };

        for line in &cart_lines {
            if let Some(product) = state.products.iter_mut().find(|p| p.id == line.product_id) {
                product.stock -= line.quantity;
            }
        }
        state.invoices.insert(0, invoice.clone());
        state.carts.remove(&user_id);

        self.persist_products(&state)?;
        self.persist_invoices(&state)?;

        info!(
            "Invoice {} created: {} lines, total {}",
            invoice.number,
            invoice.lines.len(),
            invoice.total
        );
        Ok(invoice)
    }

    /// Void a paid invoice, restoring catalog stock for every original
    /// line. The transition happens at most once; a second void is
    /// rejected without touching stock.
    pub fn void_invoice(&self, invoice_id: Uuid) -> ShopResult<Invoice> {
        let mut state = self.state();

        let idx = state
            .invoices
            .iter()
            .position(|i| i.id == invoice_id)
            .ok_or(ShopError::InvoiceNotFound)?;
        if state.invoices[idx].status == InvoiceStatus::Void {
            warn!("Rejected void: invoice {} is already void", state.invoices[idx].number);
            return Err(ShopError::AlreadyVoid);
        }

        let lines = state.invoices[idx].lines.clone();
        for line in &lines {
            if let Some(product) = state.products.iter_mut().find(|p| p.id == line.product_id) {
                product.stock += line.quantity;
            }
        }
        state.invoices[idx].status = InvoiceStatus::Void;
        let invoice = state.invoices[idx].clone();

        self.persist_products(&state)?;
        self.persist_invoices(&state)?;

        info!("Invoice {} voided, stock restored", invoice.number);
        Ok(invoice)
    }

    /// The full ledger, newest first.
    pub fn invoices(&self) -> Vec<Invoice> {
        self.state().invoices.clone()
    }
}
