//! Squish - image and PDF shrinking
//!
//! Squish takes an uploaded image or PDF and returns a smaller version of it,
//! chosen by a coarse compression level (`low`, `mid`, `high`).
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use squish::{CompressionConfig, CompressionLevel, compress_file};
//!
//! # #[tokio::main]
//! # async fn main() -> squish::Result<()> {
//! let config = CompressionConfig::default();
//! let result = compress_file("scan.pdf", CompressionLevel::High, &config).await?;
//! std::fs::write(&result.filename, &result.data)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Core Module** (`core`): dispatcher, level parsing, extension classification, config loading
//! - **Compression** (`compression`): JPEG re-encoding and Ghostscript-driven PDF rewriting
//! - **API** (`api`, feature `api`): axum router exposing `POST /compress`
//!
//! # Levels
//!
//! | level | images | PDFs |
//! |-------|--------|------|
//! | low   | JPEG quality 85 | `/printer` |
//! | mid   | JPEG quality 50 | `/ebook` |
//! | high  | JPEG quality 20, longest side capped at 1200px | `/screen` |

#![deny(unsafe_code)]

pub mod compression;
pub mod core;
pub mod error;
pub mod types;

#[cfg(feature = "api")]
pub mod api;

pub use error::{Result, SquishError};
pub use types::*;

pub use crate::core::config::CompressionConfig;
pub use crate::core::dispatcher::{compress_bytes, compress_file, compress_upload};
pub use crate::core::format::{DOCUMENT_EXTENSIONS, FileCategory, IMAGE_EXTENSIONS, classify_filename};
pub use crate::core::level::CompressionLevel;
