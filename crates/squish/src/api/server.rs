//! API server setup and configuration.

use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::{CompressionConfig, Result, SquishError};

use super::{
    handlers::{compress_handler, health_handler, info_handler, landing_page_handler},
    types::{ApiSizeLimits, ApiState},
};

/// Parse size limits from environment variables.
///
/// Reads environment variables in the following order of preference:
/// 1. `SQUISH_MAX_REQUEST_BODY_BYTES` - Maximum total request body size (in bytes)
/// 2. `SQUISH_MAX_MULTIPART_FIELD_BYTES` - Maximum individual multipart field size (in bytes)
/// 3. `SQUISH_MAX_UPLOAD_SIZE_MB` - Maximum upload size in MB (applies to both limits)
///
/// Falls back to default (100 MB) if not set or invalid.
pub(crate) fn parse_size_limits_from_env() -> ApiSizeLimits {
    const DEFAULT_100MB_MB: usize = 100;

    if let Ok(value) = std::env::var("SQUISH_MAX_REQUEST_BODY_BYTES") {
        match value.parse::<usize>() {
            Ok(bytes) if bytes > 0 => {
                let multipart_bytes = std::env::var("SQUISH_MAX_MULTIPART_FIELD_BYTES")
                    .ok()
                    .and_then(|v| v.parse::<usize>().ok())
                    .unwrap_or(bytes);

                tracing::info!(
                    "Upload size limits configured from environment: request_body={} bytes, multipart_field={} bytes",
                    bytes,
                    multipart_bytes
                );

                return ApiSizeLimits::new(bytes, multipart_bytes);
            }
            _ => tracing::warn!(
                "Failed to parse SQUISH_MAX_REQUEST_BODY_BYTES='{}', must be a positive integer",
                value
            ),
        }
    }

    if let Ok(value) = std::env::var("SQUISH_MAX_UPLOAD_SIZE_MB") {
        match value.parse::<usize>() {
            Ok(mb) if mb > 0 => {
                tracing::info!("Upload size limit configured from environment: {} MB", mb);
                return ApiSizeLimits::from_mb(mb, mb);
            }
            _ => tracing::warn!(
                "Failed to parse SQUISH_MAX_UPLOAD_SIZE_MB='{}', must be a positive integer",
                value
            ),
        }
    }

    let limits = ApiSizeLimits::from_mb(DEFAULT_100MB_MB, DEFAULT_100MB_MB);
    tracing::info!(
        "Upload size limit: 100 MB (default, {} bytes) - Configure with SQUISH_MAX_REQUEST_BODY_BYTES or SQUISH_MAX_UPLOAD_SIZE_MB",
        limits.max_request_body_bytes
    );
    limits
}

fn cors_layer_from_env() -> CorsLayer {
    let Ok(origins_str) = std::env::var("SQUISH_CORS_ORIGINS") else {
        tracing::warn!(
            "CORS configured to allow all origins (default). Set SQUISH_CORS_ORIGINS to a \
             comma-separated list of allowed origins to restrict it."
        );
        return CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);
    };

    let origins: Vec<_> = origins_str
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .filter_map(|s| s.trim().parse::<axum::http::HeaderValue>().ok())
        .collect();

    if origins.is_empty() {
        tracing::warn!("SQUISH_CORS_ORIGINS set but empty/invalid - falling back to permissive CORS");
        return CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);
    }

    tracing::info!("CORS configured with {} explicit allowed origin(s)", origins.len());
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Create the API router with all routes configured.
///
/// This is public to allow users to embed the router in their own applications.
///
/// # Examples
///
/// ```no_run
/// use squish::{CompressionConfig, api::create_router};
/// use axum::Router;
///
/// let app = Router::new().nest("/api", create_router(CompressionConfig::default()));
/// ```
pub fn create_router(config: CompressionConfig) -> Router {
    create_router_with_limits(config, ApiSizeLimits::default())
}

/// Create the API router with custom size limits.
pub fn create_router_with_limits(config: CompressionConfig, limits: ApiSizeLimits) -> Router {
    let state = ApiState {
        config: Arc::new(config),
        max_multipart_field_bytes: limits.max_multipart_field_bytes,
    };

    Router::new()
        .route("/", get(landing_page_handler))
        .route("/compress", post(compress_handler))
        .route("/health", get(health_handler))
        .route("/info", get(info_handler))
        .layer(DefaultBodyLimit::max(limits.max_request_body_bytes))
        .layer(RequestBodyLimitLayer::new(limits.max_request_body_bytes))
        .layer(cors_layer_from_env())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the API server with config file discovery.
///
/// Searches for `squish.toml` in the current and parent directories and falls
/// back to the default configuration.
///
/// # Environment Variables
///
/// ```bash
/// export SQUISH_CORS_ORIGINS="https://app.example.com"
/// export SQUISH_MAX_UPLOAD_SIZE_MB=50
/// export SQUISH_GHOSTSCRIPT_PATH=/opt/ghostscript/bin/gs
/// ```
pub async fn serve(host: impl AsRef<str>, port: u16) -> Result<()> {
    let config = match CompressionConfig::discover()? {
        Some(config) => {
            tracing::info!("Loaded compression config from discovered file");
            config
        }
        None => {
            tracing::info!("No config file found, using default configuration");
            CompressionConfig::default()
        }
    };

    serve_with_config(host, port, config).await
}

/// Start the API server with explicit config.
///
/// Size limits are read from the environment.
pub async fn serve_with_config(host: impl AsRef<str>, port: u16, config: CompressionConfig) -> Result<()> {
    let limits = parse_size_limits_from_env();
    serve_with_config_and_limits(host, port, config, limits).await
}

/// Start the API server with explicit config and size limits.
pub async fn serve_with_config_and_limits(
    host: impl AsRef<str>,
    port: u16,
    config: CompressionConfig,
    limits: ApiSizeLimits,
) -> Result<()> {
    let ip: IpAddr = host
        .as_ref()
        .parse()
        .map_err(|e| SquishError::validation(format!("Invalid host address: {}", e)))?;

    let config = config.validate()?;

    let addr = SocketAddr::new(ip, port);
    let app = create_router_with_limits(config, limits);

    tracing::info!("Starting Squish API server on http://{}:{}", ip, port);

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(SquishError::Io)?;

    axum::serve(listener, app)
        .await
        .map_err(|e| SquishError::Other(e.to_string()))?;

    Ok(())
}

/// Start the API server with default host and port.
///
/// Defaults: host = "127.0.0.1", port = 5000
pub async fn serve_default() -> Result<()> {
    serve("127.0.0.1", 5000).await
}
