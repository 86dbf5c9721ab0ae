//! API request and response types.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::CompressionConfig;

/// API server size limit configuration.
///
/// Controls maximum sizes for request bodies and multipart uploads.
///
/// # Default Values
///
/// - `max_request_body_bytes`: 100 MB (104,857,600 bytes)
/// - `max_multipart_field_bytes`: 100 MB (104,857,600 bytes)
///
/// # Configuration via Environment Variables
///
/// ```bash
/// # In bytes:
/// export SQUISH_MAX_REQUEST_BODY_BYTES=104857600     # 100 MB
/// export SQUISH_MAX_MULTIPART_FIELD_BYTES=104857600  # 100 MB
///
/// # In MB (applies to both limits):
/// export SQUISH_MAX_UPLOAD_SIZE_MB=100
/// ```
///
/// # Examples
///
/// ```
/// use squish::api::ApiSizeLimits;
///
/// let limits = ApiSizeLimits::default();
/// assert_eq!(limits.max_request_body_bytes, 100 * 1024 * 1024);
///
/// let limits = ApiSizeLimits::from_mb(20, 10);
/// assert_eq!(limits.max_multipart_field_bytes, 10 * 1024 * 1024);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ApiSizeLimits {
    /// Maximum size of the entire request body in bytes.
    pub max_request_body_bytes: usize,

    /// Maximum size of a single multipart field in bytes.
    pub max_multipart_field_bytes: usize,
}

impl Default for ApiSizeLimits {
    fn default() -> Self {
        Self {
            max_request_body_bytes: 100 * 1024 * 1024,
            max_multipart_field_bytes: 100 * 1024 * 1024,
        }
    }
}

impl ApiSizeLimits {
    /// Create new size limits with custom values.
    pub fn new(max_request_body_bytes: usize, max_multipart_field_bytes: usize) -> Self {
        Self {
            max_request_body_bytes,
            max_multipart_field_bytes,
        }
    }

    /// Create size limits from MB values, saturating at `usize::MAX` bytes.
    pub fn from_mb(max_request_body_mb: usize, max_multipart_field_mb: usize) -> Self {
        Self {
            max_request_body_bytes: max_request_body_mb.saturating_mul(1024 * 1024),
            max_multipart_field_bytes: max_multipart_field_mb.saturating_mul(1024 * 1024),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_mb_converts_to_bytes() {
        let limits = ApiSizeLimits::from_mb(20, 10);
        assert_eq!(limits.max_request_body_bytes, 20 * 1024 * 1024);
        assert_eq!(limits.max_multipart_field_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn test_from_mb_saturates_instead_of_overflowing() {
        let limits = ApiSizeLimits::from_mb(usize::MAX, usize::MAX / 1024);
        assert_eq!(limits.max_request_body_bytes, usize::MAX);
        assert_eq!(limits.max_multipart_field_bytes, usize::MAX);
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Health status
    pub status: String,
    /// API version
    pub version: String,
}

/// Server information response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfoResponse {
    /// API version
    pub version: String,
    /// Extensions compressed as images
    pub image_extensions: Vec<String>,
    /// Extensions compressed as documents
    pub document_extensions: Vec<String>,
    /// Whether Ghostscript answered `--version`
    pub ghostscript_available: bool,
}

/// API server state.
#[derive(Debug, Clone)]
pub struct ApiState {
    /// Compression configuration shared by all requests
    pub config: Arc<CompressionConfig>,
    /// Upper bound on a single multipart field
    pub max_multipart_field_bytes: usize,
}
