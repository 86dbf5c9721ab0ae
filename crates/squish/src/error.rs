//! Error types for Squish.
//!
//! Every fallible operation in the crate returns [`SquishError`]. Variants are
//! split into client faults (the upload itself is unacceptable) and server
//! faults (decoding, encoding, or the external tool failed). The split is
//! exposed through [`SquishError::is_client_error`] so the HTTP layer never
//! has to guess.
//!
//! - `MissingFile`, `UnsupportedFileType`, `Validation` - client faults
//! - `Decode`, `ImageProcessing` - image codec failures
//! - `ToolNotFound`, `ExternalTool`, `ToolTimeout` - Ghostscript failures
//! - `Io` - file system errors, always bubbled up unchanged
//!
//! # Example
//!
//! ```rust
//! use squish::{SquishError, Result};
//!
//! fn require_bytes(bytes: &[u8]) -> Result<&[u8]> {
//!     if bytes.is_empty() {
//!         return Err(SquishError::MissingFile);
//!     }
//!     Ok(bytes)
//! }
//!
//! assert!(require_bytes(b"").unwrap_err().is_client_error());
//! ```
use thiserror::Error;

/// Result type alias using `SquishError`.
pub type Result<T> = std::result::Result<T, SquishError>;

/// Main error type for all Squish operations.
#[derive(Debug, Error)]
pub enum SquishError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No file uploaded")]
    MissingFile,

    #[error("Unsupported file type: {0}. Please upload an Image or PDF.")]
    UnsupportedFileType(String),

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Failed to decode image: {message}")]
    Decode {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Image processing error: {message}")]
    ImageProcessing {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Ghostscript execution failed. Error log: {stderr}")]
    ExternalTool { stderr: String, exit_code: Option<i32> },

    #[error("Ghostscript timed out after {seconds} seconds")]
    ToolTimeout { seconds: u64 },

    #[error("{0}")]
    Other(String),
}

impl SquishError {
    /// Whether the failure was caused by the caller's input rather than the server.
    ///
    /// Decode failures are reported as server faults even though malformed input
    /// is usually the caller's mistake.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            SquishError::MissingFile | SquishError::UnsupportedFileType(_) | SquishError::Validation { .. }
        )
    }
}

macro_rules! error_constructor {
    ($name:ident, $variant:ident) => {
        paste::paste! {
            #[doc = "Create a " $variant " error"]
            pub fn $name<S: Into<String>>(message: S) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: None,
                }
            }

            #[doc = "Create a " $variant " error with source"]
            pub fn [<$name _with_source>]<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
                message: S,
                source: E,
            ) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: Some(Box::new(source)),
                }
            }
        }
    };
}

impl SquishError {
    error_constructor!(validation, Validation);
    error_constructor!(decode, Decode);
    error_constructor!(image_processing, ImageProcessing);
}
