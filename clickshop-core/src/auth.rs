use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::{AccountStatus, User};
use crate::AppState;

/// Container for the authenticated account stored in request extensions.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

/// Claims expected inside the JWT for authenticated users.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - should be the user's UUID as a string.
    pub sub: String,
    pub exp: usize,
}

/// Session token lifetime.
const TOKEN_TTL_SECS: i64 = 60 * 60 * 24;

/// Issue a session token naming `user_id`.
pub fn issue_token(user_id: Uuid, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (Utc::now().timestamp() + TOKEN_TTL_SECS) as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Middleware to validate a Bearer JWT in the `Authorization` header.
///
/// The token only names an account; the user directory stays the source of
/// truth. Every request re-resolves the record and is refused with `401`
/// when the token is bad or the account is gone, and `403` when the
/// account has been blocked since the token was issued.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    // Extract token from Authorization header
    let auth_header = req.headers().get("authorization");
    let token = match auth_header.and_then(|v| v.to_str().ok()) {
        Some(s) if s.starts_with("Bearer ") => &s[7..],
        _ => return Err(StatusCode::UNAUTHORIZED),
    };

    let decoding_key = DecodingKey::from_secret(state.config.jwt_secret.as_bytes());
    let claims = match decode::<Claims>(token, &decoding_key, &Validation::new(Algorithm::HS256)) {
        Ok(data) => data.claims,
        Err(_) => return Err(StatusCode::UNAUTHORIZED),
    };

    let user_id = match Uuid::parse_str(&claims.sub) {
        Ok(id) => id,
        Err(_) => return Err(StatusCode::UNAUTHORIZED),
    };

    let user = match state.shop.find_user(user_id) {
        Ok(user) => user,
        Err(_) => return Err(StatusCode::UNAUTHORIZED),
    };
    if user.status == AccountStatus::Blocked {
        return Err(StatusCode::FORBIDDEN);
    }

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}
