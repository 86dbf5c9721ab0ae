use serde::{Deserialize, Serialize};

use crate::core::level::CompressionLevel;

/// Content type of every image produced by the image compressor.
pub const JPEG_MIME_TYPE: &str = "image/jpeg";
/// Content type of every document produced by the document compressor.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Download name suggested for compressed images.
pub const COMPRESSED_IMAGE_FILENAME: &str = "compressed_image.jpg";
/// Download name suggested for compressed documents.
pub const COMPRESSED_DOCUMENT_FILENAME: &str = "compressed_document.pdf";

/// A single uploaded file awaiting compression.
///
/// The filename is only consulted for its extension; the bytes are never
/// sniffed to pick a category.
#[derive(Debug, Clone)]
pub struct Upload {
    pub data: Vec<u8>,
    pub filename: Option<String>,
    pub level: CompressionLevel,
}

impl Upload {
    pub fn new(data: impl Into<Vec<u8>>, filename: Option<String>, level: CompressionLevel) -> Self {
        Self {
            data: data.into(),
            filename,
            level,
        }
    }
}

/// Output of a successful compression.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionResult {
    /// Compressed file content
    #[serde(skip)]
    pub data: Vec<u8>,
    /// MIME type of `data`
    pub content_type: String,
    /// Suggested download filename
    pub filename: String,
}

impl CompressionResult {
    pub(crate) fn jpeg(data: Vec<u8>) -> Self {
        Self {
            data,
            content_type: JPEG_MIME_TYPE.to_string(),
            filename: COMPRESSED_IMAGE_FILENAME.to_string(),
        }
    }

    pub(crate) fn pdf(data: Vec<u8>) -> Self {
        Self {
            data,
            content_type: PDF_MIME_TYPE.to_string(),
            filename: COMPRESSED_DOCUMENT_FILENAME.to_string(),
        }
    }

    /// Size of the compressed output in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
