//! JPEG re-encoding for raster images.
//!
//! Every supported input (JPEG, PNG, WebP, BMP) comes out as a JPEG. Inputs with
//! transparency or a color type the JPEG encoder cannot take are flattened to
//! 8-bit RGB first; the alpha channel is dropped, not composited. Output uses
//! optimized Huffman tables.

use crate::core::level::CompressionLevel;
use crate::error::{Result, SquishError};
use crate::types::CompressionResult;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use jpeg_encoder::{ColorType, Encoder};
use std::io::Cursor;

/// Longest side allowed for images compressed at `High`.
pub const HIGH_LEVEL_MAX_DIMENSION: u32 = 1200;

/// Encoder settings derived from a compression level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JpegParams {
    /// JPEG quality, 1-100
    pub quality: u8,
    /// Bounding box for downscaling (None = keep original size)
    pub max_dimension: Option<u32>,
}

impl JpegParams {
    pub fn for_level(level: CompressionLevel) -> Self {
        match level {
            CompressionLevel::Low => Self {
                quality: 85,
                max_dimension: None,
            },
            CompressionLevel::Mid => Self {
                quality: 50,
                max_dimension: None,
            },
            CompressionLevel::High => Self {
                quality: 20,
                max_dimension: Some(HIGH_LEVEL_MAX_DIMENSION),
            },
        }
    }
}

/// Compress image bytes on the blocking thread pool.
pub async fn compress_image(data: Vec<u8>, level: CompressionLevel) -> Result<CompressionResult> {
    tokio::task::spawn_blocking(move || compress_image_sync(&data, level))
        .await
        .map_err(|e| SquishError::Other(format!("Image compression task failed: {}", e)))?
}

/// Decode, flatten, optionally downscale and re-encode an image as JPEG.
pub fn compress_image_sync(data: &[u8], level: CompressionLevel) -> Result<CompressionResult> {
    let params = JpegParams::for_level(level);

    let image = decode_image(data)?;
    let (original_width, original_height) = (image.width(), image.height());

    let mut image = flatten_for_jpeg(image);

    if let Some(max_dimension) = params.max_dimension
        && (image.width() > max_dimension || image.height() > max_dimension)
    {
        image = image.resize(max_dimension, max_dimension, FilterType::Lanczos3);
    }

    let output = encode_jpeg(&image, params.quality)?;

    tracing::debug!(
        "Compressed {}x{} image to {}x{} JPEG at quality {} ({} -> {} bytes)",
        original_width,
        original_height,
        image.width(),
        image.height(),
        params.quality,
        data.len(),
        output.len()
    );

    Ok(CompressionResult::jpeg(output))
}

fn decode_image(data: &[u8]) -> Result<DynamicImage> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| SquishError::decode_with_source(e.to_string(), e))?;

    reader
        .decode()
        .map_err(|e| SquishError::decode_with_source(e.to_string(), e))
}

/// Reduce an image to a color type the JPEG encoder accepts.
///
/// 8-bit grayscale and 8-bit RGB pass through untouched; everything else
/// (alpha, 16-bit, float) becomes 8-bit RGB.
fn flatten_for_jpeg(image: DynamicImage) -> DynamicImage {
    match image {
        DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => image,
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    }
}

fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    encode_jpeg_with(image, quality, true)
}

/// Encode with optional Huffman table optimization (two passes over the scan data).
fn encode_jpeg_with(image: &DynamicImage, quality: u8, optimize: bool) -> Result<Vec<u8>> {
    let (width, height) = match (u16::try_from(image.width()), u16::try_from(image.height())) {
        (Ok(width), Ok(height)) => (width, height),
        _ => {
            return Err(SquishError::image_processing(format!(
                "JPEG encoding failed: {}x{} exceeds the 65535 pixel JPEG limit",
                image.width(),
                image.height()
            )));
        }
    };

    let mut output = Vec::new();
    let mut encoder = Encoder::new(&mut output, quality);
    encoder.set_optimized_huffman_tables(optimize);

    let encoded = match image {
        DynamicImage::ImageLuma8(gray) => encoder.encode(gray.as_raw(), width, height, ColorType::Luma),
        other => {
            let rgb = other.to_rgb8();
            encoder.encode(rgb.as_raw(), width, height, ColorType::Rgb)
        }
    };

    encoded.map_err(|e| SquishError::image_processing_with_source(format!("JPEG encoding failed: {}", e), e))?;

    Ok(output)
}
