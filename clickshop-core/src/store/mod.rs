use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Fixed keys of the persisted state.
///
/// Every section of shop state lives under one well-known key and is
/// rewritten wholesale on each mutation. Per-account and per-user sections
/// use a prefix plus the account's lookup key.
pub mod keys {
    use uuid::Uuid;

    /// The whole product catalog.
    pub const PRODUCTS: &str = "clickshop-products";

    /// The whole invoice ledger.
    pub const INVOICES: &str = "clickshop-invoices";

    /// The whole offer registry.
    pub const OFFERS: &str = "clickshop-offers";

    /// Incrementing catalog visit counter.
    pub const CATALOG_VISITS: &str = "clickshop-catalog-visits";

    /// Prefix for per-account records, keyed by email.
    pub const USER_PREFIX: &str = "user-";

    /// Prefix for per-customer favorites lists, keyed by user id.
    pub const FAVORITES_PREFIX: &str = "clickshop-favorites-";

    /// Prefix for per-user support ticket histories, keyed by user id.
    pub const SUPPORT_PREFIX: &str = "clickshop-support-";

    /// Key of one account record. Emails are case-insensitive lookup keys,
    /// so the key is always built from the lowercased address.
    pub fn user(email: &str) -> String {
        format!("{USER_PREFIX}{}", email.to_lowercase())
    }

    /// Key of one customer's favorites list.
    pub fn favorites(user_id: Uuid) -> String {
        format!("{FAVORITES_PREFIX}{user_id}")
    }

    /// Key of one user's support ticket history.
    pub fn tickets(user_id: Uuid) -> String {
        format!("{SUPPORT_PREFIX}{user_id}")
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Failures of the storage substrate itself.
///
/// Unparsable persisted values are NOT an error here; they come back as
/// [`LoadState::Corrupt`] so callers can degrade deliberately instead of
/// the read failing outright.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The key contains characters the backend cannot address.
    #[error("storage key {0:?} is not addressable")]
    InvalidKey(String),

    /// The backing medium failed to read or write.
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be encoded for storage.
    #[error("storage encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Typed outcome of loading one key.
///
/// `Corrupt` carries the decode failure so it can be logged and reported;
/// the stored bytes are left in place untouched.
#[derive(Debug)]
pub enum LoadState<T> {
    /// The key held a well-formed value.
    Loaded(T),
    /// The key was absent.
    Empty,
    /// The key held bytes that no longer decode as `T`.
    Corrupt { detail: String },
}

/// A raw string-keyed, string-valued storage substrate.
///
/// Implementations must be safe to share across request handlers; the shop
/// only calls them from inside its own lock, so no per-key coordination is
/// required beyond interior mutability.
pub trait StorageBackend: Send + Sync {
    /// Read the raw value under `key`, `None` when absent.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value under `key` wholesale.
    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// All keys starting with `prefix`, in stable order.
    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>>;
}

/// Load and decode the value under `key`.
pub fn load<T: DeserializeOwned>(backend: &dyn StorageBackend, key: &str) -> Result<LoadState<T>> {
    match backend.read(key)? {
        None => Ok(LoadState::Empty),
        Some(raw) => match serde_json::from_str(&raw) {
            Ok(value) => Ok(LoadState::Loaded(value)),
            Err(err) => Ok(LoadState::Corrupt {
                detail: err.to_string(),
            }),
        },
    }
}

/// Encode `value` and overwrite `key` with it.
pub fn save<T: Serialize>(backend: &dyn StorageBackend, key: &str, value: &T) -> Result<()> {
    backend.write(key, &serde_json::to_string(value)?)
}
