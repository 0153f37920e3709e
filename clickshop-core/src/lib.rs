//! Click Shop back-office core.
//!
//! A small storefront engine: product catalog, cart/checkout
//! reconciliation, invoice ledger, time-bounded offers, user directory and
//! support tickets, persisted as JSON blobs under fixed keys in a
//! pluggable key-value store. All mutations serialize through the single
//! owning [`shop::Shop`] service; the `api` module fronts it as a JSON
//! HTTP API.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod shop;
pub mod store;

use std::sync::Arc;

use config::Config;
use shop::Shop;

/// Application state containing shared resources.
///
/// This struct holds the owning shop service and configuration, and is
/// cloned into every route handler.
#[derive(Clone)]
pub struct AppState {
    pub shop: Arc<Shop>,
    pub config: Arc<Config>,
}
