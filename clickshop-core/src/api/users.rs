use axum::extract::{Path, State};
use axum::response::Json;
use axum::Extension;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::models::user::{AccountStatus, UserResponse};
use crate::AppState;

use super::{reject, require_admin, Rejection};

#[derive(Debug, Deserialize)]
pub struct SetStatus {
    pub status: AccountStatus,
}

/// `GET /users`: directory listing (admin only).
pub async fn list(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<Vec<UserResponse>>, Rejection> {
    require_admin(&user)?;
    Ok(Json(state.shop.users()))
}

/// `PUT /users/:user_id/status`: block or unblock (admin only).
pub async fn set_status(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(user_id): Path<Uuid>,
    Json(body): Json<SetStatus>,
) -> Result<Json<UserResponse>, Rejection> {
    require_admin(&user)?;
    let updated = state
        .shop
        .set_user_status(user_id, body.status)
        .map_err(reject)?;
    Ok(Json(updated))
}

/// `GET /favorites`: the caller's favorite product ids.
pub async fn favorites(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Json<Vec<Uuid>> {
    Json(state.shop.favorites(user.id))
}

/// `POST /favorites/:product_id`: flip membership.
///
/// A no-op for staff roles; the response always carries the current set.
pub async fn toggle_favorite(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(product_id): Path<Uuid>,
) -> Result<Json<Value>, Rejection> {
    let favorites = state
        .shop
        .toggle_favorite(&user, product_id)
        .map_err(reject)?;
    Ok(Json(json!({ "favorites": favorites })))
}
