//! HTTP Surface (C7): a stateless axum router wrapping the Alias Engine.
//! `spec.md` §4.7.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;

use crate::domain::engine::AliasEngine;
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post, put};
use axum::Router;
use dyndns_auth::TokenCodec;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared state every handler (and the auth middleware) closes over.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<AliasEngine>,
    pub tokens: Arc<TokenCodec>,
}

/// Build the full router: `POST /sessions` is unauthenticated; every other
/// route runs behind [`middleware::require_bearer_token`].
#[must_use]
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/aliases", get(handlers::list_aliases))
        .route("/aliases", post(handlers::register_alias))
        .route("/aliases", put(handlers::update_alias))
        .route("/aliases/{name}", delete(handlers::delete_alias))
        .route("/domains", get(handlers::list_domains))
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware::require_bearer_token,
        ));

    Router::new()
        .route("/sessions", post(handlers::create_session))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
