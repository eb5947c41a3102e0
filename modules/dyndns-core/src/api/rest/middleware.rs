//! Bearer-token authentication middleware (C7 × C3). Every route except
//! `POST /sessions` runs behind this; on success it inserts the verified
//! user id as a request extension so handlers never read identity from the
//! request body (`spec.md` §4.6 "Ordering and tie-breaks").

use super::AppState;
use crate::domain::error::EngineError;
use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

/// The verified caller identity, inserted by [`require_bearer_token`] and
/// read by handlers via `Extension<AuthenticatedUser>`.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser(pub i64);

pub async fn require_bearer_token(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, EngineError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(EngineError::AuthenticationRequired)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(EngineError::AuthenticationRequired)?;

    let claims = state
        .tokens
        .verify(token)
        .map_err(|_| EngineError::AuthenticationInvalid)?;

    request
        .extensions_mut()
        .insert(AuthenticatedUser(claims.user_id));

    Ok(next.run(request).await)
}
