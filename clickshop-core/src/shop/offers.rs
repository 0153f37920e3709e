use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{ShopError, ShopResult};
use crate::models::offer::{Offer, OfferPayload, OfferView};
use crate::shop::{Shop, ShopState};

/// First registry entry targeting `product_id` that is active at `now`.
///
/// When several active offers overlap on one product, insertion order
/// decides; no other priority rule exists.
pub(crate) fn active_offer(offers: &[Offer], product_id: Uuid, now: DateTime<Utc>) -> Option<&Offer> {
    offers
        .iter()
        .find(|o| o.product_id == product_id && o.is_active(now))
}

/// Shared create/edit validation: the product must exist, the window must
/// not be inverted, and the discount must undercut the product's current
/// price strictly.
fn validate(state: &ShopState, payload: &OfferPayload) -> ShopResult<()> {
    let product = state
        .products
        .iter()
        .find(|p| p.id == payload.product_id)
        .ok_or(ShopError::ProductNotFound)?;

    if payload.discount_price <= Decimal::ZERO {
        return Err(ShopError::Validation("discount price must be positive".into()));
    }
    if payload.discount_price >= product.price {
        warn!(
            "Rejected offer on {}: discount {} is not below price {}",
            product.name, payload.discount_price, product.price
        );
        return Err(ShopError::DiscountNotBelowPrice);
    }
    if payload.ends_at < payload.starts_at {
        return Err(ShopError::OfferWindowInverted);
    }
    Ok(())
}

impl Shop {
    /// Publish a new offer.
    pub fn create_offer(&self, payload: OfferPayload) -> ShopResult<Offer> {
        let mut state = self.state();
        validate(&state, &payload)?;

        let offer = Offer {
            id: Uuid::new_v4(),
            product_id: payload.product_id,
            discount_price: payload.discount_price,
            starts_at: payload.starts_at,
            ends_at: payload.ends_at,
            description: payload.description,
        };
        state.offers.push(offer.clone());
        self.persist_offers(&state)?;

        info!("Offer {} published for product {}", offer.id, offer.product_id);
        Ok(offer)
    }

    /// Re-point an existing offer at the submitted values. Validated the
    /// same way as creation, against the product's current price.
    pub fn update_offer(&self, offer_id: Uuid, payload: OfferPayload) -> ShopResult<Offer> {
        let mut state = self.state();
        validate(&state, &payload)?;

        let offer = state
            .offers
            .iter_mut()
            .find(|o| o.id == offer_id)
            .ok_or(ShopError::OfferNotFound)?;
        offer.product_id = payload.product_id;
        offer.discount_price = payload.discount_price;
        offer.starts_at = payload.starts_at;
        offer.ends_at = payload.ends_at;
        offer.description = payload.description;
        let updated = offer.clone();

        self.persist_offers(&state)?;
        info!("Offer {} updated", updated.id);
        Ok(updated)
    }

    /// Remove an offer from the registry.
    pub fn delete_offer(&self, offer_id: Uuid) -> ShopResult<()> {
        let mut state = self.state();
        let before = state.offers.len();
        state.offers.retain(|o| o.id != offer_id);
        if state.offers.len() == before {
            return Err(ShopError::OfferNotFound);
        }
        self.persist_offers(&state)?;
        info!("Offer {} deleted", offer_id);
        Ok(())
    }

    /// Management listing: every offer with its product and derived status.
    pub fn offers_at(&self, now: DateTime<Utc>) -> Vec<OfferView> {
        let state = self.state();
        state
            .offers
            .iter()
            .filter_map(|o| {
                let product = state.products.iter().find(|p| p.id == o.product_id)?;
                Some(OfferView {
                    id: o.id,
                    product_id: o.product_id,
                    product_name: product.name.clone(),
                    product_price: product.price,
                    discount_price: o.discount_price,
                    starts_at: o.starts_at,
                    ends_at: o.ends_at,
                    description: o.description.clone(),
                    status: o.status(now),
                })
            })
            .collect()
    }

    pub fn offers(&self) -> Vec<OfferView> {
        self.offers_at(Utc::now())
    }
}
