//! Error types for the API layer.
//!
//! [`ApiError`] unifies all failure modes into a single enum that can be
//! converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation. Every
//! error body has the shape `{ "error": message, "status": code }`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use foodmap_catalog::CatalogError;
use foodmap_store::{CodecError, ParseError, ValidationError};

/// Errors that can occur in the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// A query parameter or request body field was invalid.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A submitted experience was rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Imported text could not be decoded.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The store could not be encoded for export.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// A catalog load failed; the previous catalog is still in effect.
    #[error("catalog load failed: {0}")]
    CatalogLoad(#[from] CatalogError),

    /// A newer catalog load started while this one was running.
    #[error("catalog load {generation} was superseded by load {latest}")]
    Superseded {
        /// The discarded load.
        generation: u64,
        /// The newest load.
        latest: u64,
    },

    /// Live city search is not configured.
    #[error("live city search is disabled")]
    LiveDisabled,

    /// The status page template failed to render.
    #[error("page render failed: {0}")]
    Render(#[from] askama::Error),

    /// A blocking store task did not complete.
    #[error("store task failed: {0}")]
    Task(String),

    /// A serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ApiError {
    /// The HTTP status this error maps to.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidRequest(_) | Self::Parse(_) => StatusCode::BAD_REQUEST,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::CatalogLoad(_) => StatusCode::BAD_GATEWAY,
            Self::Superseded { .. } => StatusCode::CONFLICT,
            Self::LiveDisabled => StatusCode::SERVICE_UNAVAILABLE,
            Self::Codec(_) | Self::Render(_) | Self::Task(_) | Self::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(error = %self, status = status.as_u16(), "Request failed");
        }

        let body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses() {
        assert_eq!(
            ApiError::Validation(ValidationError::EmptyFood).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::Parse(ParseError::new("bad")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::CatalogLoad(CatalogError::Source(String::from("down"))).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::Superseded {
                generation: 1,
                latest: 2
            }
            .status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn validation_message_is_passed_through() {
        let err = ApiError::from(ValidationError::EmptyFood);
        assert_eq!(err.to_string(), "food must not be empty");
    }
}
