//! API error responses.

use axum::{
    extract::multipart::MultipartError,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::error::SquishError;

/// Error returned by API handlers.
///
/// Rendered as a plain-text body holding the error message. Client faults map to
/// 400, everything else to 500. Every error is logged before it is rendered.
#[derive(Debug)]
pub struct ApiError {
    /// HTTP status code
    pub status: StatusCode,
    /// Message sent as the response body
    pub message: String,
}

impl ApiError {
    /// Create a 400 error.
    pub fn validation(error: SquishError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: error.to_string(),
        }
    }

    /// Create a 500 error.
    pub fn internal(error: SquishError) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: error.to_string(),
        }
    }

    /// Map a multipart parsing failure, keeping axum's status (400, or 413 for oversized fields).
    pub fn multipart(error: MultipartError) -> Self {
        Self {
            status: error.status(),
            message: error.body_text(),
        }
    }
}

impl From<SquishError> for ApiError {
    fn from(error: SquishError) -> Self {
        if error.is_client_error() {
            Self::validation(error)
        } else {
            Self::internal(error)
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = self.status.as_u16(), "Request failed: {}", self.message);
        } else {
            tracing::warn!(status = self.status.as_u16(), "Request rejected: {}", self.message);
        }

        (
            self.status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.message,
        )
            .into_response()
    }
}
