//! Compression level selection.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SquishError;

/// Coarse compression aggressiveness chosen by the caller.
///
/// Each format maps a level to its own parameters: JPEG quality and resizing
/// for images, a Ghostscript `PDFSETTINGS` preset for documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionLevel {
    /// Highest quality, largest output.
    Low,
    /// Balanced.
    #[default]
    Mid,
    /// Lowest quality, smallest output.
    High,
}

impl CompressionLevel {
    pub const ALL: [CompressionLevel; 3] = [CompressionLevel::Low, CompressionLevel::Mid, CompressionLevel::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            CompressionLevel::Low => "low",
            CompressionLevel::Mid => "mid",
            CompressionLevel::High => "high",
        }
    }

    /// Parse a caller-supplied level, falling back to `Mid` for anything unrecognized.
    pub fn parse_or_default(value: &str) -> Self {
        match value.parse() {
            Ok(level) => level,
            Err(_) => {
                tracing::warn!("Unrecognized compression level '{}', using 'mid'", value);
                CompressionLevel::Mid
            }
        }
    }
}

impl FromStr for CompressionLevel {
    type Err = SquishError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(CompressionLevel::Low),
            "mid" => Ok(CompressionLevel::Mid),
            "high" => Ok(CompressionLevel::High),
            other => Err(SquishError::validation(format!(
                "Invalid compression level '{}', expected one of: low, mid, high",
                other
            ))),
        }
    }
}

impl fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
