//! Configuration loading and management.
//!
//! This module provides utilities for loading compression configuration from
//! TOML, YAML, or JSON files and discovering a `squish.toml` in the directory
//! hierarchy.

use crate::core::level::CompressionLevel;
use crate::{Result, SquishError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default timeout for a Ghostscript run (300 seconds)
pub const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 300;

/// Main compression configuration.
///
/// # Example
///
/// ```rust
/// use squish::core::config::CompressionConfig;
///
/// let config = CompressionConfig::default();
/// assert_eq!(config.tool_timeout_secs, 300);
///
/// // let config = CompressionConfig::from_toml_file("squish.toml")?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    /// Level applied when a request does not carry one
    #[serde(default)]
    pub default_level: CompressionLevel,

    /// Explicit Ghostscript executable (None = search PATH)
    #[serde(default)]
    pub ghostscript_path: Option<PathBuf>,

    /// Upper bound on a single Ghostscript run, in seconds
    #[serde(default = "default_tool_timeout_secs")]
    pub tool_timeout_secs: u64,

    /// Directory for per-request scratch files (None = OS temp dir)
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,

    /// HTML file served at `GET /`
    #[serde(default = "default_landing_page")]
    pub landing_page: PathBuf,
}

fn default_tool_timeout_secs() -> u64 {
    DEFAULT_TOOL_TIMEOUT_SECS
}

fn default_landing_page() -> PathBuf {
    PathBuf::from("index.html")
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            default_level: CompressionLevel::default(),
            ghostscript_path: None,
            tool_timeout_secs: DEFAULT_TOOL_TIMEOUT_SECS,
            temp_dir: None,
            landing_page: default_landing_page(),
        }
    }
}

impl CompressionConfig {
    /// Directory used for scratch files.
    pub fn scratch_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Reject settings no request could succeed with.
    ///
    /// # Errors
    ///
    /// Returns `SquishError::Validation` when `tool_timeout_secs` is zero.
    pub fn validate(self) -> Result<Self> {
        if self.tool_timeout_secs == 0 {
            return Err(SquishError::validation(
                "tool_timeout_secs must be greater than zero",
            ));
        }
        Ok(self)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `SquishError::Validation` if the file cannot be read or is invalid TOML.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_config(path.as_ref())?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| SquishError::validation(format!("Invalid TOML in {}: {}", path.as_ref().display(), e)))?;
        config.validate()
    }

    /// Load configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_config(path.as_ref())?;

        let config: Self = serde_yaml_ng::from_str(&content)
            .map_err(|e| SquishError::validation(format!("Invalid YAML in {}: {}", path.as_ref().display(), e)))?;
        config.validate()
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_config(path.as_ref())?;

        let config: Self = serde_json::from_str(&content)
            .map_err(|e| SquishError::validation(format!("Invalid JSON in {}: {}", path.as_ref().display(), e)))?;
        config.validate()
    }

    /// Load configuration from a file, picking the parser by extension.
    ///
    /// `.toml`, `.yaml`/`.yml` and `.json` are recognised.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("toml") => Self::from_toml_file(path),
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(SquishError::validation(format!(
                "Unsupported config file format: {} (expected .toml, .yaml, .yml or .json)",
                path.display()
            ))),
        }
    }

    /// Discover configuration file in parent directories.
    ///
    /// Searches for `squish.toml` in the current directory and its parents.
    ///
    /// # Returns
    ///
    /// - `Some(config)` if found
    /// - `None` if no config file found
    pub fn discover() -> Result<Option<Self>> {
        let mut current = std::env::current_dir().map_err(SquishError::Io)?;

        loop {
            let squish_toml = current.join("squish.toml");
            if squish_toml.exists() {
                return Ok(Some(Self::from_toml_file(squish_toml)?));
            }

            if let Some(parent) = current.parent() {
                current = parent.to_path_buf();
            } else {
                break;
            }
        }

        Ok(None)
    }
}

fn read_config(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| SquishError::validation(format!("Failed to read config file {}: {}", path.display(), e)))
}
