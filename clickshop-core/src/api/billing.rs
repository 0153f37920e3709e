use axum::extract::{Path, State};
use axum::response::Json;
use axum::Extension;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::models::invoice::{CheckoutRequest, Invoice};
use crate::shop::CartView;
use crate::AppState;

use super::{reject, require_admin, require_staff, Rejection};

#[derive(Debug, Deserialize)]
pub struct SetQuantity {
    pub quantity: u32,
}

/// `GET /cart`
pub async fn cart(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<CartView>, Rejection> {
    require_staff(&user)?;
    Ok(Json(state.shop.cart(user.id)))
}

/// `POST /cart/items/:product_id`: add one unit.
pub async fn add_to_cart(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(product_id): Path<Uuid>,
) -> Result<Json<CartView>, Rejection> {
    require_staff(&user)?;
    let view = state.shop.add_to_cart(user.id, product_id).map_err(reject)?;
    Ok(Json(view))
}

/// `PUT /cart/items/:product_id`: set the line quantity.
pub async fn set_quantity(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(product_id): Path<Uuid>,
    Json(body): Json<SetQuantity>,
) -> Result<Json<CartView>, Rejection> {
    require_staff(&user)?;
    let view = state
        .shop
        .set_quantity(user.id, product_id, body.quantity)
        .map_err(reject)?;
    Ok(Json(view))
}

/// `DELETE /cart/items/:product_id`
pub async fn remove_line(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(product_id): Path<Uuid>,
) -> Result<Json<CartView>, Rejection> {
    require_staff(&user)?;
    let view = state.shop.remove_line(user.id, product_id).map_err(reject)?;
    Ok(Json(view))
}

/// `POST /checkout`: finalize the cart as a paid invoice.
pub async fn checkout(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<Invoice>, Rejection> {
    require_staff(&user)?;
    let invoice = state.shop.checkout(user.id, request).map_err(reject)?;
    Ok(Json(invoice))
}

/// `GET /invoices`: the ledger, newest first.
pub async fn invoices(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<Vec<Invoice>>, Rejection> {
    require_staff(&user)?;
    Ok(Json(state.shop.invoices()))
}

/// `POST /invoices/:invoice_id/void`: reverse a sale (admin only).
pub async fn void_invoice(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(invoice_id): Path<Uuid>,
) -> Result<Json<Invoice>, Rejection> {
    require_admin(&user)?;
    let invoice = state.shop.void_invoice(invoice_id).map_err(reject)?;
    Ok(Json(invoice))
}
