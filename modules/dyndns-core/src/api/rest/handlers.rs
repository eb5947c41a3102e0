//! Route handlers (C7). Each mirrors its entry in `spec.md` §4.7's table
//! one-for-one; no handler ever reads a user identifier from the request
//! body — only from the verified `AuthenticatedUser` extension.

use super::dto::{AliasRequest, CredentialsRequest, DomainResponse, SessionResponse};
use super::error::ValidJson;
use super::middleware::AuthenticatedUser;
use super::AppState;
use crate::domain::error::EngineError;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::Json;

pub async fn create_session(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<CredentialsRequest>,
) -> Result<Json<SessionResponse>, EngineError> {
    let token = state.engine.authenticate(&body.email, &body.password).await?;
    Ok(Json(SessionResponse { token }))
}

pub async fn list_aliases(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<crate::domain::models::AliasView>>, EngineError> {
    let aliases = state.engine.get_aliases(user.0).await?;
    Ok(Json(aliases))
}

pub async fn register_alias(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(body): Json<AliasRequest>,
) -> Result<(StatusCode, Json<crate::domain::models::AliasView>), EngineError> {
    let view = state
        .engine
        .register_alias(user.0, &body.domain, &body.value)
        .await?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn update_alias(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(body): Json<AliasRequest>,
) -> Result<Json<crate::domain::models::AliasView>, EngineError> {
    let view = state
        .engine
        .update_alias(user.0, &body.domain, &body.value)
        .await?;
    Ok(Json(view))
}

pub async fn delete_alias(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(name): Path<String>,
) -> Result<StatusCode, EngineError> {
    state.engine.delete_alias(user.0, &name).await?;
    Ok(StatusCode::OK)
}

pub async fn list_domains(
    State(state): State<AppState>,
    Extension(_user): Extension<AuthenticatedUser>,
) -> Json<Vec<DomainResponse>> {
    let domains = state
        .engine
        .get_domains()
        .into_iter()
        .map(|domain| DomainResponse { domain })
        .collect();
    Json(domains)
}
