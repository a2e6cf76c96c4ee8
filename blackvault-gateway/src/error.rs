use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use blackvault_core::Error;

/// Request-level failure taxonomy, mapped onto HTTP statuses.
#[derive(Debug)]
pub enum ApiError {
    /// `prompt` or `playerId` missing or empty.
    MissingFields,
    /// Bridge token did not match the configured secret.
    InvalidToken,
    /// Player has a live cooldown marker.
    Cooldown,
    /// Provider, exchange log, or cooldown store failed mid-request. The
    /// underlying message is logged; the caller sees a generic error.
    Upstream(Error),
}

impl ApiError {
    pub fn upstream(err: impl Into<Error>) -> Self {
        Self::Upstream(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::MissingFields => (
                StatusCode::BAD_REQUEST,
                "Prompt and playerId are required.".to_owned(),
            ),
            Self::InvalidToken => (StatusCode::FORBIDDEN, "Invalid token.".to_owned()),
            Self::Cooldown => (
                StatusCode::TOO_MANY_REQUESTS,
                "You're on cooldown. Try again soon.".to_owned(),
            ),
            Self::Upstream(err) => {
                error!(?err, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to contact AI developer.".to_owned(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
