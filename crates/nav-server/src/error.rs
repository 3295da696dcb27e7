//! API error responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use nav_tree::NavError;
use serde::Serialize;

/// JSON body for error responses.
#[derive(Serialize)]
pub(crate) struct ErrorBody {
    /// Human-readable error message.
    pub(crate) error: String,
}

/// Error returned by API handlers.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ApiError {
    /// Navigation resolution failed.
    #[error(transparent)]
    Nav(#[from] NavError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            // Store failures are transient from the client's perspective.
            Self::Nav(NavError::Store(_)) => StatusCode::SERVICE_UNAVAILABLE,
        };

        tracing::warn!(error = %self, "request failed");

        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
