use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Customer name recorded when checkout leaves the field blank.
pub const DEFAULT_CUSTOMER: &str = "General Customer";

/// Invoice status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceStatus {
    Paid,
    Pending,
    Void,
}

/// Accepted payment methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    Cash,
    Transfer,
    MobilePayment,
    Other,
}

/// One line of a finalized sale.
///
/// A frozen copy of the cart line at checkout time: name and unit price are
/// captured when the product entered the cart and never track later catalog
/// edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceLine {
    /// Product the line refers to
    pub product_id: Uuid,

    /// Product name at sale time
    pub name: String,

    /// Unit price at sale time
    pub unit_price: Decimal,

    /// Units sold, at least 1
    pub quantity: u32,
}

impl InvoiceLine {
    /// `unit_price × quantity`.
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// A finalized, reversible record of a completed sale.
///
/// Appended to the ledger at checkout; the only later mutation is the
/// one-shot Paid → Void transition, which restores catalog stock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique identifier for the invoice
    pub id: Uuid,

    /// Human-facing invoice number (`INV-<millis>`)
    pub number: String,

    /// Timestamp when the sale was finalized
    pub created_at: DateTime<Utc>,

    /// Customer the sale was made to, or the placeholder
    pub customer_name: String,

    /// Frozen line items
    pub lines: Vec<InvoiceLine>,

    /// Σ line subtotals at creation time
    pub total: Decimal,

    /// How the customer paid
    pub payment_method: PaymentMethod,

    /// Current status
    pub status: InvoiceStatus,
}

/// Checkout request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    /// Optional customer name; blank falls back to [`DEFAULT_CUSTOMER`]
    pub customer_name: Option<String>,

    /// Payment method, required
    pub payment_method: PaymentMethod,
}
