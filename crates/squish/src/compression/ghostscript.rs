//! PDF compression through Ghostscript.
//!
//! Ghostscript's `pdfwrite` device re-renders the document with one of its
//! `PDFSETTINGS` presets, which resamples embedded images and drops unused
//! resources.
//!
//! # System Requirement
//!
//! Ghostscript must be installed and its console executable reachable:
//! - **macOS**: `brew install ghostscript`
//! - **Linux**: `apt install ghostscript` or `dnf install ghostscript`
//! - **Windows**: install from ghostscript.com and add its `bin` directory to PATH
//!
//! The executable is `gswin64c` on Windows and `gs` everywhere else. Set
//! `SQUISH_GHOSTSCRIPT_PATH` or the `ghostscript_path` config field to point at
//! a custom location.

use crate::core::config::CompressionConfig;
use crate::core::level::CompressionLevel;
use crate::error::{Result, SquishError};
use crate::types::CompressionResult;
use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::fs;
use tokio::process::Command;
use tokio::time::{Duration, timeout};

/// Environment variable overriding the Ghostscript executable.
pub const GHOSTSCRIPT_PATH_ENV: &str = "SQUISH_GHOSTSCRIPT_PATH";

/// Ghostscript `PDFSETTINGS` preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfPreset {
    /// 300 dpi images, larger output
    Printer,
    /// 150 dpi images
    Ebook,
    /// 72 dpi images, smallest output
    Screen,
}

impl PdfPreset {
    pub fn for_level(level: CompressionLevel) -> Self {
        match level {
            CompressionLevel::Low => PdfPreset::Printer,
            CompressionLevel::Mid => PdfPreset::Ebook,
            CompressionLevel::High => PdfPreset::Screen,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PdfPreset::Printer => "printer",
            PdfPreset::Ebook => "ebook",
            PdfPreset::Screen => "screen",
        }
    }

    /// The `-dPDFSETTINGS=` argument for this preset.
    pub fn as_arg(&self) -> String {
        format!("-dPDFSETTINGS=/{}", self.as_str())
    }
}

/// Platform name of the Ghostscript console executable.
pub fn ghostscript_command() -> &'static str {
    if cfg!(target_os = "windows") { "gswin64c" } else { "gs" }
}

fn ghostscript_not_found_message(name: &str) -> String {
    format!(
        "cannot find '{}' in your system PATH, so Ghostscript is not installed or not visible to this process. \
Install Ghostscript, or set the {} environment variable to the executable.",
        name, GHOSTSCRIPT_PATH_ENV
    )
}

fn command_names() -> Vec<&'static str> {
    if cfg!(target_os = "windows") {
        vec!["gswin64c.exe", "gswin32c.exe", "gswin64c", "gswin32c"]
    } else {
        vec![ghostscript_command()]
    }
}

#[cfg(unix)]
fn is_executable_file(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable_file(path: &Path) -> bool {
    std::fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}

/// Resolve the Ghostscript executable without running it.
///
/// Lookup order: `config.ghostscript_path`, `SQUISH_GHOSTSCRIPT_PATH`, then
/// the platform command name on `PATH`.
///
/// # Errors
///
/// Returns `SquishError::ToolNotFound` naming the expected executable.
pub fn locate_ghostscript(config: &CompressionConfig) -> Result<PathBuf> {
    let explicit = config
        .ghostscript_path
        .clone()
        .or_else(|| env::var_os(GHOSTSCRIPT_PATH_ENV).filter(|v| !v.is_empty()).map(PathBuf::from));

    if let Some(path) = explicit {
        if path.components().count() > 1 {
            if is_executable_file(&path) {
                return Ok(path);
            }
            return Err(SquishError::ToolNotFound(format!(
                "configured Ghostscript executable '{}' does not exist or is not executable",
                path.display()
            )));
        }

        let name = path.to_string_lossy().into_owned();
        return search_path(&[name.as_str()])
            .ok_or_else(|| SquishError::ToolNotFound(ghostscript_not_found_message(&name)));
    }

    search_path(&command_names())
        .ok_or_else(|| SquishError::ToolNotFound(ghostscript_not_found_message(ghostscript_command())))
}

fn search_path(names: &[&str]) -> Option<PathBuf> {
    search_path_in(&env::var_os("PATH")?, names)
}

fn search_path_in(path_env: &OsStr, names: &[&str]) -> Option<PathBuf> {
    env::split_paths(path_env)
        .flat_map(|dir| names.iter().map(move |name| dir.join(name)))
        .find(|candidate| is_executable_file(candidate))
}

/// Check that Ghostscript is available and answers `--version`.
pub async fn check_ghostscript_available(config: &CompressionConfig) -> Result<PathBuf> {
    let gs_path = locate_ghostscript(config)?;

    let result = Command::new(&gs_path)
        .arg("--version")
        .stdin(Stdio::null())
        .output()
        .await;

    match result {
        Ok(output) if output.status.success() => Ok(gs_path),
        Ok(_) => Err(SquishError::ToolNotFound(format!(
            "Ghostscript executable '{}' failed when checking '--version'. Please reinstall Ghostscript.",
            gs_path.display()
        ))),
        Err(err) => Err(SquishError::ToolNotFound(format!(
            "Ghostscript executable '{}' could not be executed: {}",
            gs_path.display(),
            err
        ))),
    }
}

/// RAII guard deleting a scratch file when dropped.
///
/// Removal is synchronous so the file is gone by the time the owning call returns.
struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    /// Reserve a unique path in `dir` without creating the file.
    fn reserve(dir: &Path, role: &str) -> Self {
        let unique_id = uuid::Uuid::new_v4();
        Self {
            path: dir.join(format!("squish_{}_{}.pdf", role, unique_id)),
        }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            tracing::warn!("Failed to remove scratch file {}: {}", self.path.display(), e);
        }
    }
}

/// Build the Ghostscript argument list.
pub fn ghostscript_args(preset: PdfPreset, output_path: &Path, input_path: &Path) -> Vec<String> {
    vec![
        "-sDEVICE=pdfwrite".to_string(),
        "-dCompatibilityLevel=1.4".to_string(),
        preset.as_arg(),
        "-dNOPAUSE".to_string(),
        "-dQUIET".to_string(),
        "-dBATCH".to_string(),
        format!("-sOutputFile={}", output_path.display()),
        input_path.display().to_string(),
    ]
}

/// Compress PDF bytes with Ghostscript.
///
/// Both scratch files are deleted before this returns, on every path.
///
/// # Errors
///
/// - `ToolNotFound` if Ghostscript cannot be located (checked before any file is written)
/// - `ExternalTool` if Ghostscript exits non-zero or writes no output
/// - `ToolTimeout` if Ghostscript runs longer than `config.tool_timeout_secs`
/// - `Io` for scratch file failures
pub async fn compress_pdf(
    data: &[u8],
    level: CompressionLevel,
    config: &CompressionConfig,
) -> Result<CompressionResult> {
    let gs_path = locate_ghostscript(config)?;
    let preset = PdfPreset::for_level(level);

    let scratch_dir = config.scratch_dir();
    fs::create_dir_all(&scratch_dir).await?;

    let input = ScratchFile::reserve(&scratch_dir, "in");
    let output = ScratchFile::reserve(&scratch_dir, "out");

    fs::write(input.path(), data).await?;

    run_ghostscript(&gs_path, preset, input.path(), output.path(), config.tool_timeout_secs).await?;

    let compressed = fs::read(output.path()).await.map_err(|e| SquishError::ExternalTool {
        stderr: format!("Ghostscript completed but output file not found: {}", e),
        exit_code: Some(0),
    })?;

    if compressed.is_empty() {
        return Err(SquishError::ExternalTool {
            stderr: "Ghostscript produced an empty file".to_string(),
            exit_code: Some(0),
        });
    }

    tracing::debug!(
        "Compressed PDF with /{} preset ({} -> {} bytes)",
        preset.as_str(),
        data.len(),
        compressed.len()
    );

    Ok(CompressionResult::pdf(compressed))
}

async fn run_ghostscript(
    gs_path: &Path,
    preset: PdfPreset,
    input_path: &Path,
    output_path: &Path,
    timeout_seconds: u64,
) -> Result<()> {
    let child = Command::new(gs_path)
        .args(ghostscript_args(preset, output_path, input_path))
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| {
            SquishError::ToolNotFound(format!(
                "Failed to execute Ghostscript at '{}': {}",
                gs_path.display(),
                e
            ))
        })?;

    let child_id = child.id();

    let output = match timeout(Duration::from_secs(timeout_seconds), child.wait_with_output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            return Err(SquishError::Io(std::io::Error::other(format!(
                "Failed to wait for Ghostscript: {}",
                e
            ))));
        }
        Err(_) => {
            // wait_with_output was cancelled; kill_on_drop reaps the child
            tracing::error!(
                "Ghostscript (PID {:?}) exceeded {} second timeout",
                child_id,
                timeout_seconds
            );
            return Err(SquishError::ToolTimeout {
                seconds: timeout_seconds,
            });
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        tracing::error!(
            "Ghostscript exited with code {:?}: {}",
            output.status.code(),
            stderr.trim()
        );
        return Err(SquishError::ExternalTool {
            stderr,
            exit_code: output.status.code(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_per_level() {
        assert_eq!(PdfPreset::for_level(CompressionLevel::Low), PdfPreset::Printer);
        assert_eq!(PdfPreset::for_level(CompressionLevel::Mid), PdfPreset::Ebook);
        assert_eq!(PdfPreset::for_level(CompressionLevel::High), PdfPreset::Screen);
    }

    #[test]
    fn test_unknown_level_string_maps_to_ebook() {
        let level = CompressionLevel::parse_or_default("ultra");
        assert_eq!(PdfPreset::for_level(level), PdfPreset::Ebook);
    }

    #[test]
    fn test_ghostscript_args_order() {
        let args = ghostscript_args(PdfPreset::Screen, Path::new("/tmp/out.pdf"), Path::new("/tmp/in.pdf"));
        assert_eq!(
            args,
            vec![
                "-sDEVICE=pdfwrite",
                "-dCompatibilityLevel=1.4",
                "-dPDFSETTINGS=/screen",
                "-dNOPAUSE",
                "-dQUIET",
                "-dBATCH",
                "-sOutputFile=/tmp/out.pdf",
                "/tmp/in.pdf",
            ]
        );
    }

    #[test]
    fn test_command_name_for_platform() {
        if cfg!(target_os = "windows") {
            assert_eq!(ghostscript_command(), "gswin64c");
        } else {
            assert_eq!(ghostscript_command(), "gs");
        }
    }

    #[test]
    fn test_missing_configured_path_is_tool_not_found() {
        let config = CompressionConfig {
            ghostscript_path: Some(PathBuf::from("/nonexistent/bin/gs")),
            ..Default::default()
        };

        let err = locate_ghostscript(&config).unwrap_err();
        assert!(matches!(err, SquishError::ToolNotFound(_)));
        assert!(err.to_string().contains("/nonexistent/bin/gs"));
    }

    #[test]
    fn test_unknown_command_name_is_tool_not_found() {
        let config = CompressionConfig {
            ghostscript_path: Some(PathBuf::from("squish-no-such-ghostscript")),
            ..Default::default()
        };

        let err = locate_ghostscript(&config).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("'squish-no-such-ghostscript'"));
        assert!(message.contains("PATH"));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_executable_configured_path_is_tool_not_found() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let gs = dir.path().join("gs");
        std::fs::write(&gs, "#!/bin/sh\nexit 0\n").unwrap();
        std::fs::set_permissions(&gs, std::fs::Permissions::from_mode(0o644)).unwrap();

        let config = CompressionConfig {
            ghostscript_path: Some(gs.clone()),
            ..Default::default()
        };
        let err = locate_ghostscript(&config).unwrap_err();
        assert!(matches!(err, SquishError::ToolNotFound(_)));
        assert!(err.to_string().contains("not executable"));

        std::fs::set_permissions(&gs, std::fs::Permissions::from_mode(0o755)).unwrap();
        assert_eq!(locate_ghostscript(&config).unwrap(), gs);
    }

    #[cfg(unix)]
    #[test]
    fn test_path_search_skips_non_executable_candidates() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let shadowed = dir.path().join("first");
        let real = dir.path().join("second");
        std::fs::create_dir_all(&shadowed).unwrap();
        std::fs::create_dir_all(&real).unwrap();

        let name = "squish-test-gs";
        std::fs::write(shadowed.join(name), "not a program").unwrap();
        std::fs::set_permissions(shadowed.join(name), std::fs::Permissions::from_mode(0o644)).unwrap();
        std::fs::write(real.join(name), "#!/bin/sh\nexit 0\n").unwrap();
        std::fs::set_permissions(real.join(name), std::fs::Permissions::from_mode(0o755)).unwrap();

        let path_env = env::join_paths([&shadowed, &real]).unwrap();
        assert_eq!(search_path_in(&path_env, &[name]), Some(real.join(name)));
    }

    #[test]
    fn test_scratch_file_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = {
            let scratch = ScratchFile::reserve(dir.path(), "in");
            std::fs::write(scratch.path(), b"%PDF-1.4").unwrap();
            assert!(scratch.path().exists());
            scratch.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_scratch_file_drop_tolerates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = ScratchFile::reserve(dir.path(), "out");
        assert!(!scratch.path().exists());
        drop(scratch);
    }

    #[test]
    fn test_scratch_names_are_unique() {
        let dir = tempfile::tempdir().unwrap();
        let a = ScratchFile::reserve(dir.path(), "in");
        let b = ScratchFile::reserve(dir.path(), "in");
        assert_ne!(a.path(), b.path());
    }

    #[tokio::test]
    async fn test_tool_not_found_writes_no_scratch_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = CompressionConfig {
            ghostscript_path: Some(PathBuf::from("/nonexistent/bin/gs")),
            temp_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };

        let err = compress_pdf(b"%PDF-1.4", CompressionLevel::Mid, &config).await.unwrap_err();
        assert!(matches!(err, SquishError::ToolNotFound(_)));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_check_ghostscript_available() {
        let result = check_ghostscript_available(&CompressionConfig::default()).await;
        if let Err(err) = result {
            assert!(matches!(err, SquishError::ToolNotFound(_)));
        }
    }
}
