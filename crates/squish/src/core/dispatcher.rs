//! Main compression entry points.
//!
//! Classifies an upload by its filename extension and hands it to the image or
//! document compressor. Nothing is compressed until classification succeeds.
//!
//! # Functions
//!
//! - [`compress_upload`] - Compress an [`Upload`]
//! - [`compress_bytes`] - Compress raw bytes given a filename and level
//! - [`compress_file`] - Compress a file on disk

use crate::compression::{ghostscript, image};
use crate::core::config::CompressionConfig;
use crate::core::format::{FileCategory, classify_filename};
use crate::core::level::CompressionLevel;
use crate::types::{CompressionResult, Upload};
use crate::{Result, SquishError};
use std::path::Path;

/// Compress an upload according to its category and level.
///
/// # Errors
///
/// - `UnsupportedFileType` if the filename is missing or its extension is not recognised
/// - `Decode` / `ImageProcessing` for image codec failures
/// - `ToolNotFound`, `ExternalTool` or `ToolTimeout` for Ghostscript failures
///
/// # Example
///
/// ```rust,no_run
/// use squish::{CompressionConfig, CompressionLevel, Upload, compress_upload};
///
/// # async fn example() -> squish::Result<()> {
/// let bytes = std::fs::read("photo.png")?;
/// let upload = Upload::new(bytes, Some("photo.png".to_string()), CompressionLevel::High);
/// let result = compress_upload(upload, &CompressionConfig::default()).await?;
/// assert_eq!(result.content_type, "image/jpeg");
/// # Ok(())
/// # }
/// ```
#[tracing::instrument(
    skip(upload, config),
    fields(
        compression.filename = upload.filename.as_deref().unwrap_or(""),
        compression.level = %upload.level,
        compression.size_bytes = upload.data.len(),
    )
)]
pub async fn compress_upload(upload: Upload, config: &CompressionConfig) -> Result<CompressionResult> {
    let category = classify_filename(upload.filename.as_deref())?;

    let result = match category {
        FileCategory::Image => image::compress_image(upload.data, upload.level).await?,
        FileCategory::Document => ghostscript::compress_pdf(&upload.data, upload.level, config).await?,
    };

    tracing::info!(
        "Compressed {:?} upload at level '{}' to {} bytes",
        category,
        upload.level,
        result.len()
    );

    Ok(result)
}

/// Compress raw bytes declared under `filename`.
pub async fn compress_bytes(
    content: &[u8],
    filename: &str,
    level: CompressionLevel,
    config: &CompressionConfig,
) -> Result<CompressionResult> {
    let upload = Upload::new(content, Some(filename.to_string()), level);
    compress_upload(upload, config).await
}

/// Compress a file from disk, classifying it by its own filename.
///
/// # Errors
///
/// Returns `SquishError::Validation` if the path does not name a file; otherwise
/// the same errors as [`compress_upload`].
pub async fn compress_file(
    path: impl AsRef<Path>,
    level: CompressionLevel,
    config: &CompressionConfig,
) -> Result<CompressionResult> {
    let path = path.as_ref();

    if !path.is_file() {
        return Err(SquishError::validation(format!("File does not exist: {}", path.display())));
    }

    let filename = path.file_name().map(|name| name.to_string_lossy().into_owned());
    let content = tokio::fs::read(path).await?;

    compress_upload(Upload::new(content, filename, level), config).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;
    use std::path::PathBuf;

    fn png_bytes() -> Vec<u8> {
        let img = RgbaImage::from_pixel(16, 16, Rgba([0, 128, 255, 200]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn no_ghostscript() -> CompressionConfig {
        CompressionConfig {
            ghostscript_path: Some(PathBuf::from("/nonexistent/bin/gs")),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_image_upload_routes_to_jpeg() {
        let result = compress_bytes(&png_bytes(), "logo.PNG", CompressionLevel::Low, &CompressionConfig::default())
            .await
            .unwrap();

        assert_eq!(result.content_type, "image/jpeg");
        assert_eq!(result.filename, "compressed_image.jpg");
    }

    #[tokio::test]
    async fn test_pdf_upload_routes_to_ghostscript() {
        let err = compress_bytes(b"%PDF-1.4\n%%EOF\n", "doc.pdf", CompressionLevel::Mid, &no_ghostscript())
            .await
            .unwrap_err();

        assert!(matches!(err, SquishError::ToolNotFound(_)));
    }

    #[tokio::test]
    async fn test_unsupported_extension_does_not_touch_content() {
        // Content is a valid PNG, but the extension decides.
        let err = compress_bytes(&png_bytes(), "notes.txt", CompressionLevel::Mid, &CompressionConfig::default())
            .await
            .unwrap_err();

        assert!(matches!(err, SquishError::UnsupportedFileType(_)));
        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn test_missing_filename_is_unsupported() {
        let upload = Upload::new(png_bytes(), None, CompressionLevel::Mid);
        let err = compress_upload(upload, &CompressionConfig::default()).await.unwrap_err();
        assert!(matches!(err, SquishError::UnsupportedFileType(_)));
    }

    #[tokio::test]
    async fn test_image_extension_with_garbage_is_decode_error() {
        let err = compress_bytes(b"garbage", "photo.jpg", CompressionLevel::Mid, &CompressionConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SquishError::Decode { .. }));
        assert!(!err.is_client_error());
    }

    #[tokio::test]
    async fn test_compress_file_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("picture.png");
        std::fs::write(&path, png_bytes()).unwrap();

        let result = compress_file(&path, CompressionLevel::High, &CompressionConfig::default())
            .await
            .unwrap();
        assert_eq!(::image::guess_format(&result.data).unwrap(), ImageFormat::Jpeg);
    }

    #[tokio::test]
    async fn test_compress_file_missing_path() {
        let err = compress_file("/nonexistent/picture.png", CompressionLevel::Mid, &CompressionConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SquishError::Validation { .. }));
    }
}
