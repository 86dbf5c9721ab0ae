//! Squish command-line interface.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use squish::{CompressionConfig, CompressionLevel};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// CLI enum for compression level
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLevel {
    /// Light compression, best quality
    Low,
    /// Balanced compression
    Mid,
    /// Strongest compression, images capped at 1200px
    High,
}

impl From<CliLevel> for CompressionLevel {
    fn from(level: CliLevel) -> Self {
        match level {
            CliLevel::Low => CompressionLevel::Low,
            CliLevel::Mid => CompressionLevel::Mid,
            CliLevel::High => CompressionLevel::High,
        }
    }
}

#[derive(Parser)]
#[command(name = "squish", version)]
#[command(about = "Compress images and PDFs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Address to bind
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value_t = 5000)]
        port: u16,

        /// Configuration file (TOML, YAML or JSON); squish.toml is discovered when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Compress a single file
    Compress {
        /// Image or PDF to compress
        input: PathBuf,

        /// Compression level; defaults to the configured level
        #[arg(short, long, value_enum)]
        level: Option<CliLevel>,

        /// Where to write the result; defaults to compressed_image.jpg or compressed_document.pdf
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Configuration file (TOML, YAML or JSON); squish.toml is discovered when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print a JSON summary instead of plain text
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<CompressionConfig> {
    match path {
        Some(path) => {
            let config = CompressionConfig::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            tracing::info!("Loaded config from {}", path.display());
            Ok(config)
        }
        None => match CompressionConfig::discover().context("Failed to load discovered squish.toml")? {
            Some(config) => {
                tracing::info!("Loaded discovered squish.toml");
                Ok(config)
            }
            None => {
                tracing::debug!("No squish.toml found, using default configuration");
                Ok(CompressionConfig::default())
            }
        },
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port, config } => {
            let config = load_config(config.as_deref())?;
            squish::api::serve_with_config(&host, port, config).await?;
            Ok(())
        }

        Commands::Compress {
            input,
            level,
            output,
            config,
            json,
        } => {
            let config = load_config(config.as_deref())?;
            let level = level.map(CompressionLevel::from).unwrap_or(config.default_level);

            let result = squish::compress_file(&input, level, &config)
                .await
                .with_context(|| format!("Failed to compress {}", input.display()))?;

            let output = output.unwrap_or_else(|| PathBuf::from(&result.filename));
            tokio::fs::write(&output, &result.data)
                .await
                .with_context(|| format!("Failed to write {}", output.display()))?;

            let original_bytes = tokio::fs::metadata(&input).await?.len();

            if json {
                let summary = serde_json::json!({
                    "input": input.display().to_string(),
                    "output": output.display().to_string(),
                    "level": level,
                    "content_type": result.content_type,
                    "original_bytes": original_bytes,
                    "compressed_bytes": result.len(),
                });
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!(
                    "{} -> {} ({} -> {} bytes, level {})",
                    input.display(),
                    output.display(),
                    original_bytes,
                    result.len(),
                    level
                );
            }

            Ok(())
        }
    }
}
