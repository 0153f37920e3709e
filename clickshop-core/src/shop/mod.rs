//! The owning shop service.
//!
//! Every store section (catalog, invoice ledger, offer registry, user
//! directory, favorites, visit counter, support tickets) is held behind a
//! single lock inside [`Shop`]. All mutations are synchronous
//! read-modify-write units executed while the lock is held, so inventory
//! counts have a single writer and stock can never be overdrawn by
//! interleaved checkouts.

pub mod billing;
pub mod cart;
pub mod catalog;
pub mod directory;
pub mod offers;
pub mod support;

#[cfg(test)]
mod tests;

pub use cart::{Cart, CartLine, CartView};

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::de::DeserializeOwned;
use tracing::{error, warn};
use uuid::Uuid;

use crate::error::{ShopError, ShopResult};
use crate::models::{Invoice, Offer, Product, SupportTicket, User};
use crate::store::{self, keys, LoadState, StorageBackend};

/// What [`Shop::open`] found in the store.
///
/// Corrupt sections start empty but are reported here and logged; they are
/// never silently treated as absent.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Keys whose persisted bytes no longer decode.
    pub corrupt_keys: Vec<String>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.corrupt_keys.is_empty()
    }
}

/// All shop state. Carts are in-memory only; everything else is written
/// back to the store wholesale whenever it changes.
pub(crate) struct ShopState {
    pub products: Vec<Product>,
    pub invoices: Vec<Invoice>,
    pub offers: Vec<Offer>,
    /// Account records keyed by lowercased email.
    pub users: HashMap<String, User>,
    pub favorites: HashMap<Uuid, Vec<Uuid>>,
    pub tickets: HashMap<Uuid, Vec<SupportTicket>>,
    pub visits: u64,
    /// One prospective sale per authenticated user; discarded on checkout.
    pub carts: HashMap<Uuid, Cart>,
}

/// The storefront engine and its persistence substrate.
pub struct Shop {
    store: Box<dyn StorageBackend>,
    state: Mutex<ShopState>,
    report: LoadReport,
}

impl Shop {
    /// Load all persisted sections from `store` and take ownership of them.
    pub fn open(store: impl StorageBackend + 'static) -> ShopResult<Self> {
        let mut report = LoadReport::default();

        let products = section(&store, keys::PRODUCTS, &mut report)?;
        let invoices = section(&store, keys::INVOICES, &mut report)?;
        let offers = section(&store, keys::OFFERS, &mut report)?;
        let visits = match store::load::<u64>(&store, keys::CATALOG_VISITS)? {
            LoadState::Loaded(v) => v,
            LoadState::Empty => 0,
            LoadState::Corrupt { detail } => {
                report.mark(keys::CATALOG_VISITS, &detail);
                0
            }
        };

        let mut users = HashMap::new();
        for key in store.keys_with_prefix(keys::USER_PREFIX)? {
            match store::load::<User>(&store, &key)? {
                LoadState::Loaded(user) => {
                    users.insert(user.email.to_lowercase(), user);
                }
                LoadState::Empty => {}
                LoadState::Corrupt { detail } => report.mark(&key, &detail),
            }
        }

        let favorites = per_user_section(&store, keys::FAVORITES_PREFIX, &mut report)?;
        let tickets = per_user_section(&store, keys::SUPPORT_PREFIX, &mut report)?;

        Ok(Shop {
            store: Box::new(store),
            state: Mutex::new(ShopState {
                products,
                invoices,
                offers,
                users,
                favorites,
                tickets,
                visits,
                carts: HashMap::new(),
            }),
            report,
        })
    }

    /// What loading found; corrupt sections started empty.
    pub fn load_report(&self) -> &LoadReport {
        &self.report
    }

    pub(crate) fn state(&self) -> MutexGuard<'_, ShopState> {
        // A poisoned lock means a panic mid-operation; the persisted copy
        // is the authority, and the in-memory state is still usable for
        // reads, so recover the guard rather than propagating the panic.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn persist_products(&self, state: &ShopState) -> ShopResult<()> {
        Ok(store::save(self.store.as_ref(), keys::PRODUCTS, &state.products)?)
    }

    pub(crate) fn persist_invoices(&self, state: &ShopState) -> ShopResult<()> {
        Ok(store::save(self.store.as_ref(), keys::INVOICES, &state.invoices)?)
    }

    pub(crate) fn persist_offers(&self, state: &ShopState) -> ShopResult<()> {
        Ok(store::save(self.store.as_ref(), keys::OFFERS, &state.offers)?)
    }

    pub(crate) fn persist_user(&self, user: &User) -> ShopResult<()> {
        Ok(store::save(self.store.as_ref(), &keys::user(&user.email), user)?)
    }

    pub(crate) fn persist_visits(&self, state: &ShopState) -> ShopResult<()> {
        Ok(store::save(self.store.as_ref(), keys::CATALOG_VISITS, &state.visits)?)
    }

    pub(crate) fn persist_favorites(&self, state: &ShopState, user_id: Uuid) -> ShopResult<()> {
        let list = state.favorites.get(&user_id).cloned().unwrap_or_default();
        Ok(store::save(self.store.as_ref(), &keys::favorites(user_id), &list)?)
    }

    pub(crate) fn persist_tickets(&self, state: &ShopState, user_id: Uuid) -> ShopResult<()> {
        let list = state.tickets.get(&user_id).cloned().unwrap_or_default();
        Ok(store::save(self.store.as_ref(), &keys::tickets(user_id), &list)?)
    }
}

impl LoadReport {
    fn mark(&mut self, key: &str, detail: &str) {
        error!("Persisted state under {:?} is corrupt ({}); starting that section empty", key, detail);
        self.corrupt_keys.push(key.to_string());
    }
}

/// Load one whole-collection section, defaulting when absent and reporting
/// corruption.
fn section<T: DeserializeOwned + Default>(
    store: &dyn StorageBackend,
    key: &str,
    report: &mut LoadReport,
) -> ShopResult<T> {
    match store::load(store, key)? {
        LoadState::Loaded(value) => Ok(value),
        LoadState::Empty => Ok(T::default()),
        LoadState::Corrupt { detail } => {
            report.mark(key, &detail);
            Ok(T::default())
        }
    }
}

/// Load every `<prefix><user-id>` key into a per-user map.
fn per_user_section<T: DeserializeOwned>(
    store: &dyn StorageBackend,
    prefix: &str,
    report: &mut LoadReport,
) -> ShopResult<HashMap<Uuid, T>> {
    let mut map = HashMap::new();
    for key in store.keys_with_prefix(prefix)? {
        let Some(suffix) = key.strip_prefix(prefix) else {
            continue;
        };
        let Ok(user_id) = Uuid::from_str(suffix) else {
            warn!("Ignoring key {:?}: suffix is not a user id", key);
            continue;
        };
        match store::load::<T>(store, &key)? {
            LoadState::Loaded(value) => {
                map.insert(user_id, value);
            }
            LoadState::Empty => {}
            LoadState::Corrupt { detail } => report.mark(&key, &detail),
        }
    }
    Ok(map)
}

impl Shop {
    /// Directory lookup by user id.
    ///
    /// The directory is the single source of truth for session checks:
    /// authenticated requests re-resolve their account here every time.
    pub fn find_user(&self, user_id: Uuid) -> ShopResult<User> {
        let state = self.state();
        state
            .users
            .values()
            .find(|u| u.id == user_id)
            .cloned()
            .ok_or(ShopError::AccountNotFound)
    }
}
