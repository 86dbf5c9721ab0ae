//! Format-specific compressors.
//!
//! - [`image`]: re-encodes raster images as JPEG with the `image` crate
//! - [`ghostscript`]: rewrites PDFs through an external Ghostscript process

pub mod ghostscript;
pub mod image;

pub use self::ghostscript::{PdfPreset, check_ghostscript_available, compress_pdf, locate_ghostscript};
pub use self::image::{JpegParams, compress_image, compress_image_sync};
