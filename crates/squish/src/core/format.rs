//! File category detection by extension.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SquishError};

/// Extensions routed to the image compressor.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "bmp"];

/// Extensions routed to the document compressor.
pub const DOCUMENT_EXTENSIONS: &[&str] = &["pdf"];

/// Which compressor handles an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Image,
    Document,
}

/// Lower-cased text after the last `.` of `filename`, if any.
pub fn extension_of(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.trim().to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
}

/// Classify an upload by its declared filename.
///
/// # Errors
///
/// Returns `SquishError::UnsupportedFileType` when the filename is missing or
/// empty, has no extension, or its extension belongs to neither group.
pub fn classify_filename(filename: Option<&str>) -> Result<FileCategory> {
    let filename = filename.map(str::trim).filter(|name| !name.is_empty()).ok_or_else(|| {
        SquishError::UnsupportedFileType("no file selected".to_string())
    })?;

    let extension = extension_of(filename)
        .ok_or_else(|| SquishError::UnsupportedFileType(format!("'{}' has no extension", filename)))?;

    if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        Ok(FileCategory::Image)
    } else if DOCUMENT_EXTENSIONS.contains(&extension.as_str()) {
        Ok(FileCategory::Document)
    } else {
        Err(SquishError::UnsupportedFileType(format!("'.{}'", extension)))
    }
}
