use axum::http::StatusCode;
use thiserror::Error;

use crate::store::StoreError;

/// Result type for shop operations.
pub type ShopResult<T> = std::result::Result<T, ShopError>;

/// Everything a shop operation can fail with.
///
/// Validation failures abort the operation before any state is mutated and
/// carry a message fit to show the user. Storage and hashing failures are
/// the only internal class.
#[derive(Debug, Error)]
pub enum ShopError {
    #[error("product not found")]
    ProductNotFound,

    #[error("invoice not found")]
    InvoiceNotFound,

    #[error("offer not found")]
    OfferNotFound,

    #[error("account not found")]
    AccountNotFound,

    #[error("product is out of stock")]
    OutOfStock,

    #[error("cart already holds every unit in stock")]
    StockLimitReached,

    #[error("only {available} units in stock")]
    InsufficientStock { available: u32 },

    #[error("product is not in the cart")]
    LineNotFound,

    #[error("cart is empty")]
    EmptyCart,

    #[error("invoice is already void")]
    AlreadyVoid,

    #[error("discount price must be below the product price")]
    DiscountNotBelowPrice,

    #[error("offer ends before it starts")]
    OfferWindowInverted,

    #[error("email is already registered")]
    EmailTaken,

    #[error("account is blocked")]
    AccountBlocked,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("missing or incorrect secret key for the requested role")]
    InvalidSecretKey,

    #[error("{0}")]
    Validation(String),

    #[error("password hashing failed")]
    Hash(#[from] bcrypt::BcryptError),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl ShopError {
    /// HTTP status the API maps this error to.
    pub fn status(&self) -> StatusCode {
        match self {
            ShopError::ProductNotFound
            | ShopError::InvoiceNotFound
            | ShopError::OfferNotFound
            | ShopError::AccountNotFound => StatusCode::NOT_FOUND,

            ShopError::InvalidCredentials | ShopError::AccountBlocked => StatusCode::UNAUTHORIZED,

            ShopError::InvalidSecretKey => StatusCode::FORBIDDEN,

            ShopError::EmailTaken | ShopError::AlreadyVoid => StatusCode::CONFLICT,

            ShopError::OutOfStock
            | ShopError::StockLimitReached
            | ShopError::InsufficientStock { .. }
            | ShopError::LineNotFound
            | ShopError::EmptyCart
            | ShopError::DiscountNotBelowPrice
            | ShopError::OfferWindowInverted
            | ShopError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,

            ShopError::Hash(_) | ShopError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether this is an internal failure rather than a rejected request.
    pub fn is_internal(&self) -> bool {
        matches!(self, ShopError::Hash(_) | ShopError::Storage(_))
    }
}
