use axum::extract::State;
use axum::response::Json;
use axum::Extension;
use serde_json::{json, Value};

use crate::auth::CurrentUser;
use crate::models::product::{CatalogItem, Product, RegisterStock};
use crate::AppState;

use super::{reject, require_staff, Rejection};

/// `GET /catalog`: products annotated with any active offer price.
pub async fn list(State(state): State<AppState>) -> Json<Vec<CatalogItem>> {
    Json(state.shop.catalog())
}

/// `POST /catalog/visit`: bump the visit counter.
pub async fn record_visit(State(state): State<AppState>) -> Result<Json<Value>, Rejection> {
    let visits = state.shop.record_catalog_visit().map_err(reject)?;
    Ok(Json(json!({ "visits": visits })))
}

/// `POST /inventory`: register incoming stock (staff only).
pub async fn register_stock(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(submission): Json<RegisterStock>,
) -> Result<Json<Product>, Rejection> {
    require_staff(&user)?;
    let product = state.shop.register_stock(submission).map_err(reject)?;
    Ok(Json(product))
}
