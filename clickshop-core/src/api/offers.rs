use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::Extension;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::models::offer::{Offer, OfferPayload, OfferView};
use crate::AppState;

use super::{reject, require_admin, require_staff, Rejection};

/// `GET /offers`: management listing with derived statuses (staff).
pub async fn list(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<Vec<OfferView>>, Rejection> {
    require_staff(&user)?;
    Ok(Json(state.shop.offers()))
}

/// `POST /offers` (admin only)
pub async fn create(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<OfferPayload>,
) -> Result<Json<Offer>, Rejection> {
    require_admin(&user)?;
    let offer = state.shop.create_offer(payload).map_err(reject)?;
    Ok(Json(offer))
}

/// `PUT /offers/:offer_id` (admin only)
pub async fn update(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(offer_id): Path<Uuid>,
    Json(payload): Json<OfferPayload>,
) -> Result<Json<Offer>, Rejection> {
    require_admin(&user)?;
    let offer = state.shop.update_offer(offer_id, payload).map_err(reject)?;
    Ok(Json(offer))
}

/// `DELETE /offers/:offer_id` (admin only)
pub async fn delete(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(offer_id): Path<Uuid>,
) -> Result<StatusCode, Rejection> {
    require_admin(&user)?;
    state.shop.delete_offer(offer_id).map_err(reject)?;
    Ok(StatusCode::NO_CONTENT)
}
