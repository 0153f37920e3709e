use axum::extract::State;
use axum::response::Json;
use axum::Extension;

use crate::auth::CurrentUser;
use crate::models::ticket::{SupportTicket, TicketRequest};
use crate::AppState;

use super::{reject, Rejection};

/// `POST /support/tickets`
pub async fn submit(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(request): Json<TicketRequest>,
) -> Result<Json<SupportTicket>, Rejection> {
    let ticket = state.shop.submit_ticket(user.id, request).map_err(reject)?;
    Ok(Json(ticket))
}

/// `GET /support/tickets`: the caller's own history.
pub async fn list(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Json<Vec<SupportTicket>> {
    Json(state.shop.tickets(user.id))
}
