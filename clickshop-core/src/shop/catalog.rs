use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use crate::error::{ShopError, ShopResult};
use crate::models::product::{CatalogItem, Product, RegisterStock, PLACEHOLDER_IMAGE};
use crate::shop::{offers, Shop};

impl Shop {
    /// Register incoming stock.
    ///
    /// A case-insensitive name match merges into the existing product:
    /// stock is incremented and price, category and description are
    /// overwritten with the submitted values. Otherwise a new product is
    /// created with a generated id and, absent an image, the placeholder.
    pub fn register_stock(&self, submission: RegisterStock) -> ShopResult<Product> {
        let name = submission.name.trim().to_string();
        if name.len() < 2 {
            return Err(ShopError::Validation(
                "product name must be at least 2 characters".into(),
            ));
        }
        if submission.price <= Decimal::ZERO {
            return Err(ShopError::Validation("price must be positive".into()));
        }

        let mut state = self.state();
        let needle = name.to_lowercase();

        let product = if let Some(existing) = state
            .products
            .iter_mut()
            .find(|p| p.name.to_lowercase() == needle)
        {
            existing.stock += submission.quantity;
            existing.price = submission.price;
            existing.category = submission.category;
            existing.description = submission.description;
            if let Some(image) = submission.image {
                existing.image = image;
            }
            info!(
                "Merged {} units into {}, stock now {}",
                submission.quantity, existing.name, existing.stock
            );
            existing.clone()
        } else {
            let product = Product {
                id: Uuid::new_v4(),
                name,
                price: submission.price,
                image: submission
                    .image
                    .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
                category: submission.category,
                description: submission.description,
                stock: submission.quantity,
            };
            info!("Registered new product {} with {} units", product.name, product.stock);
            state.products.push(product.clone());
            product
        };

        self.persist_products(&state)?;
        Ok(product)
    }

    /// Catalog listing with the active offer price, if any, per product.
    pub fn catalog_at(&self, now: DateTime<Utc>) -> Vec<CatalogItem> {
        let state = self.state();
        state
            .products
            .iter()
            .map(|p| {
                let offer_price =
                    offers::active_offer(&state.offers, p.id, now).map(|o| o.discount_price);
                CatalogItem::new(p, offer_price)
            })
            .collect()
    }

    /// Catalog listing as of now.
    pub fn catalog(&self) -> Vec<CatalogItem> {
        self.catalog_at(Utc::now())
    }

    /// Bump and persist the catalog visit counter.
    pub fn record_catalog_visit(&self) -> ShopResult<u64> {
        let mut state = self.state();
        state.visits += 1;
        self.persist_visits(&state)?;
        Ok(state.visits)
    }

    pub fn catalog_visits(&self) -> u64 {
        self.state().visits
    }
}
