//! HTTP surface over the shop service.
//!
//! Handlers are thin: role gating, extraction, one shop call, and the
//! error-to-status mapping. All business rules live in `shop`.

pub mod auth;
pub mod billing;
pub mod catalog;
pub mod offers;
pub mod support;
pub mod users;

use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware;
use axum::response::Json;
use axum::routing::{get, post, put};
use axum::Router;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::error::ShopError;
use crate::models::user::{Role, User};
use crate::AppState;

/// Error payload for any rejected request.
pub(crate) type Rejection = (StatusCode, Json<Value>);

/// Map a shop error onto its status code and a user-facing message.
pub(crate) fn reject(err: ShopError) -> Rejection {
    if err.is_internal() {
        error!("Operation failed: {}", err);
    } else {
        warn!("Request rejected: {}", err);
    }
    (err.status(), Json(json!({ "error": err.to_string() })))
}

pub(crate) fn forbidden() -> Rejection {
    (
        StatusCode::FORBIDDEN,
        Json(json!({ "error": "insufficient role" })),
    )
}

/// Billing and inventory surfaces are for staff.
pub(crate) fn require_staff(user: &User) -> Result<(), Rejection> {
    if user.role.is_staff() {
        Ok(())
    } else {
        Err(forbidden())
    }
}

/// Offer and directory management, and invoice voiding, are for
/// administrators.
pub(crate) fn require_admin(user: &User) -> Result<(), Rejection> {
    if user.role == Role::Administrator {
        Ok(())
    } else {
        Err(forbidden())
    }
}

/// Health check endpoint.
///
/// Reports whether the store opened clean or with corrupt sections.
async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let report = state.shop.load_report();
    Json(json!({
        "status": "ok",
        "service": "clickshop-core",
        "version": env!("CARGO_PKG_VERSION"),
        "store": if report.is_clean() { "clean" } else { "degraded" },
        "corrupt_keys": report.corrupt_keys,
    }))
}

/// Creates the main application router.
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(health_check))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login));

    let authenticated = Router::new()
        .route("/auth/me", get(auth::me))
        .route("/catalog", get(catalog::list))
        .route("/catalog/visit", post(catalog::record_visit))
        .route("/inventory", post(catalog::register_stock))
        .route("/cart", get(billing::cart))
        .route(
            "/cart/items/:product_id",
            post(billing::add_to_cart)
                .put(billing::set_quantity)
                .delete(billing::remove_line),
        )
        .route("/checkout", post(billing::checkout))
        .route("/invoices", get(billing::invoices))
        .route("/invoices/:invoice_id/void", post(billing::void_invoice))
        .route("/offers", get(offers::list).post(offers::create))
        .route("/offers/:offer_id", put(offers::update).delete(offers::delete))
        .route("/users", get(users::list))
        .route("/users/:user_id/status", put(users::set_status))
        .route("/favorites", get(users::favorites))
        .route("/favorites/:product_id", post(users::toggle_favorite))
        .route("/support/tickets", get(support::list).post(support::submit))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            crate::auth::auth_middleware,
        ));

    Router::new()
        .merge(public)
        .merge(authenticated)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
