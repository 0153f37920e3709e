use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Derived offer status; never stored, always computed from the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OfferStatus {
    Upcoming,
    Active,
    Expired,
}

/// A time-bounded price override for one catalog product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offer {
    /// Unique identifier for the offer
    pub id: Uuid,

    /// Product whose price is overridden
    pub product_id: Uuid,

    /// Override price; strictly below the product's price at save time
    pub discount_price: Decimal,

    /// First instant the offer applies, inclusive
    pub starts_at: DateTime<Utc>,

    /// Last instant the offer applies, inclusive
    pub ends_at: DateTime<Utc>,

    /// Short promotional description
    pub description: String,
}

impl Offer {
    /// Status at `now`: both window ends are inclusive.
    pub fn status(&self, now: DateTime<Utc>) -> OfferStatus {
        if now < self.starts_at {
            OfferStatus::Upcoming
        } else if now > self.ends_at {
            OfferStatus::Expired
        } else {
            OfferStatus::Active
        }
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.status(now) == OfferStatus::Active
    }
}

/// Create/update request for an offer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferPayload {
    pub product_id: Uuid,
    pub discount_price: Decimal,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub description: String,
}

/// Offer listing entry for the admin view: the offer plus the product it
/// targets and the derived status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferView {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub product_price: Decimal,
    pub discount_price: Decimal,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub description: String,
    pub status: OfferStatus,
}
