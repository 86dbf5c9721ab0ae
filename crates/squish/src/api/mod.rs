//! REST API server for Squish.
//!
//! This module provides an Axum-based HTTP server that compresses uploaded
//! images and PDFs.
//!
//! # Endpoints
//!
//! - `POST /compress` - Compress an uploaded file (multipart form data)
//! - `GET /` - Landing page
//! - `GET /health` - Health check endpoint
//! - `GET /info` - Server information
//!
//! # Examples
//!
//! ## Starting the server
//!
//! ```no_run
//! use squish::api::serve;
//!
//! #[tokio::main]
//! async fn main() -> squish::Result<()> {
//!     serve("127.0.0.1", 5000).await?;
//!     Ok(())
//! }
//! ```
//!
//! # cURL Examples
//!
//! ```bash
//! # Compress a photo aggressively
//! curl -F "file=@photo.png" -F "level=high" -OJ http://localhost:5000/compress
//!
//! # Compress a PDF with the default level
//! curl -F "file=@report.pdf" -OJ http://localhost:5000/compress
//!
//! # Health check
//! curl http://localhost:5000/health
//! ```

mod error;
mod handlers;
mod server;
mod types;

pub use error::ApiError;
pub use server::{
    create_router, create_router_with_limits, serve, serve_default, serve_with_config, serve_with_config_and_limits,
};
pub use types::{ApiSizeLimits, ApiState, HealthResponse, InfoResponse};
