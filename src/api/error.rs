use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::app::NewswireError;

/// Errors a request can end in. Both render as plain text.
#[derive(Debug, Error)]
pub enum ApiError {
    /// `n` was not an integer.
    #[error("Invalid parameter")]
    InvalidParameter(String),

    /// The store failed; the message is passed through to the caller.
    #[error("{0}")]
    Store(#[from] NewswireError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidParameter(raw) => {
                tracing::debug!("Rejected news count {:?}", raw);
                StatusCode::BAD_REQUEST
            }
            ApiError::Store(e) => {
                tracing::error!("Store error: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (
            status,
            [(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
            self.to_string(),
        )
            .into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
