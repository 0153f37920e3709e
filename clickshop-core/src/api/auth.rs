use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::Extension;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use crate::auth::{issue_token, CurrentUser};
use crate::models::user::{LoginRequest, RegisterUser, User, UserResponse};
use crate::AppState;

use super::{reject, Rejection};

/// Session established: the bearer token plus the public account view.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

fn establish_session(state: &AppState, user: User) -> Result<Json<AuthResponse>, Rejection> {
    let token = issue_token(user.id, &state.config.jwt_secret).map_err(|e| {
        error!("Token issuance failed: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "could not establish session" })),
        )
    })?;
    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

/// `POST /auth/register`: create an account and log it straight in.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterUser>,
) -> Result<Json<AuthResponse>, Rejection> {
    let user = state
        .shop
        .register(request, &state.config.secrets)
        .map_err(reject)?;
    establish_session(&state, user)
}

/// `POST /auth/login`
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, Rejection> {
    let user = state
        .shop
        .login(&request.email, &request.password)
        .map_err(reject)?;
    establish_session(&state, user)
}

/// `GET /auth/me`: the account behind the presented token.
pub async fn me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<UserResponse> {
    Json(user.into())
}
