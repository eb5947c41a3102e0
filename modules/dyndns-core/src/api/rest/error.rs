//! Maps `EngineError` onto HTTP responses (C7). `spec.md` §7: each kind maps
//! to exactly one status code and a `{message}` body; internal detail never
//! reaches the client.

use crate::domain::error::EngineError;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use dyndns_errors::ErrorBody;

impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.kind().status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if matches!(self, Self::StorageFailure(_)) {
            tracing::error!(error = %self, "storage failure surfaced to client");
        }

        (status, Json(ErrorBody::new(self.wire_message()))).into_response()
    }
}

/// A malformed JSON body (axum `JsonRejection`) is not an `EngineError` —
/// it never reached the engine. Mapped to 422, matching `spec.md` §4.7's
/// "422 malformed" row for `POST /sessions`.
pub struct MalformedBody;

impl IntoResponse for MalformedBody {
    fn into_response(self) -> Response {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorBody::new("malformed request body")),
        )
            .into_response()
    }
}

/// Drop-in replacement for `axum::Json<T>` that maps any extraction
/// failure (invalid UTF-8, malformed JSON, missing/wrong content-type) to
/// [`MalformedBody`] instead of axum's default JSON rejection, so the
/// `POST /sessions` route actually returns the spec's 422, not a bare 400.
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: serde::de::DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(_rejection) => Err(MalformedBody.into_response()),
        }
    }
}
