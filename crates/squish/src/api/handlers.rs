//! API request handlers.

use axum::{
    Json,
    extract::{Multipart, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};

use crate::{
    CompressionLevel, DOCUMENT_EXTENSIONS, IMAGE_EXTENSIONS, SquishError, Upload,
    compression::check_ghostscript_available, compress_upload,
};

use super::{
    error::ApiError,
    types::{ApiState, HealthResponse, InfoResponse},
};

/// Compress endpoint handler.
///
/// POST /compress
///
/// Accepts multipart form data with:
/// - `file`: the image or PDF to compress
/// - `level` (optional): `low`, `mid` or `high`; unrecognized values fall back to `mid`,
///   and an absent field uses the server's configured default level
///
/// Responds with the compressed file as an attachment, or a plain-text error:
/// 400 for a missing file (a `file` part without a filename counts as missing),
/// an empty filename or an unsupported extension, 500 when compression itself
/// fails.
pub async fn compress_handler(State(state): State<ApiState>, mut multipart: Multipart) -> Result<Response, ApiError> {
    let mut file: Option<(Vec<u8>, String)> = None;
    let mut level: Option<CompressionLevel> = None;

    while let Some(field) = multipart.next_field().await.map_err(ApiError::multipart)? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" => {
                // A `file` part without a filename is a plain form value, not an upload.
                let Some(file_name) = field.file_name().map(|s| s.to_string()) else {
                    tracing::debug!("Ignoring 'file' form field without a filename");
                    continue;
                };
                let data = field.bytes().await.map_err(ApiError::multipart)?;

                if data.len() > state.max_multipart_field_bytes {
                    return Err(ApiError {
                        status: StatusCode::PAYLOAD_TOO_LARGE,
                        message: format!(
                            "Uploaded file is {} bytes, larger than the {} byte limit",
                            data.len(),
                            state.max_multipart_field_bytes
                        ),
                    });
                }

                file = Some((data.to_vec(), file_name));
            }
            "level" => {
                let value = field.text().await.map_err(ApiError::multipart)?;
                level = Some(CompressionLevel::parse_or_default(&value));
            }
            _ => {}
        }
    }

    let (data, filename) = file.ok_or(SquishError::MissingFile)?;
    let level = level.unwrap_or(state.config.default_level);

    let result = compress_upload(Upload::new(data, Some(filename), level), &state.config).await?;

    let disposition = format!("attachment; filename=\"{}\"", result.filename);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, result.content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        result.data,
    )
        .into_response())
}

/// Landing page handler.
///
/// GET /
///
/// Serves the HTML file named by `landing_page` in the server config.
pub async fn landing_page_handler(State(state): State<ApiState>) -> Result<Response, ApiError> {
    match tokio::fs::read_to_string(&state.config.landing_page).await {
        Ok(content) => Ok(Html(content).into_response()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ApiError {
            status: StatusCode::NOT_FOUND,
            message: format!("Landing page not found: {}", state.config.landing_page.display()),
        }),
        Err(e) => Err(ApiError::internal(SquishError::Io(e))),
    }
}

/// Health check endpoint handler.
///
/// GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Server info endpoint handler.
///
/// GET /info
pub async fn info_handler(State(state): State<ApiState>) -> Json<InfoResponse> {
    let ghostscript_available = check_ghostscript_available(&state.config).await.is_ok();

    Json(InfoResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        image_extensions: IMAGE_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        document_extensions: DOCUMENT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        ghostscript_available,
    })
}
