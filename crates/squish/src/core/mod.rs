//! Core compression orchestration.
//!
//! This module contains the dispatcher that routes uploads to a compressor,
//! along with level parsing, extension classification and configuration.

pub mod config;
pub mod dispatcher;
pub mod format;
pub mod level;
