use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Image used for products registered without one.
pub const PLACEHOLDER_IMAGE: &str = "https://placehold.co/600x400.png";

/// Catalog category of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductCategory {
    Womenswear,
    Dresses,
    Accessories,
    Clearance,
}

/// A sellable product and its live stock count.
///
/// Products are created by inventory registration and never deleted; stock
/// moves only through checkout and invoice voiding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier for the product
    pub id: Uuid,

    /// Display name (unique per catalog, case-insensitively)
    pub name: String,

    /// Unit price, always positive
    pub price: Decimal,

    /// Image URL
    pub image: String,

    /// Catalog category
    pub category: ProductCategory,

    /// Free-form description
    pub description: String,

    /// Units on hand, never negative
    pub stock: u32,
}

/// Inventory registration request.
///
/// Merges into an existing product when the name matches
/// case-insensitively; otherwise creates a new one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterStock {
    pub name: String,
    pub price: Decimal,
    pub category: ProductCategory,
    pub description: String,
    pub quantity: u32,
    pub image: Option<String>,
}

/// Catalog listing entry: a product plus its currently active offer price,
/// if any.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub offer_price: Option<Decimal>,
    pub image: String,
    pub category: ProductCategory,
    pub description: String,
    pub stock: u32,
}

impl CatalogItem {
    pub fn new(product: &Product, offer_price: Option<Decimal>) -> Self {
        CatalogItem {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            offer_price,
            image: product.image.clone(),
            category: product.category,
            description: product.description.clone(),
            stock: product.stock,
        }
    }
}
