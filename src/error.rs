//! # Error Types
//!
//! This module defines error types used throughout the lgtm library.

use thiserror::Error;

/// Main error type for lgtm operations
#[derive(Debug, Error)]
pub enum LgtmError {
    /// Font bytes could not be parsed, or a face could not be built from them
    #[error("Font error: {0}")]
    FontParse(String),

    /// Canvas with a zero dimension
    #[error("Degenerate geometry: {width}x{height}")]
    DegenerateGeometry { width: u32, height: u32 },

    /// Input decoded fine but is not JPEG, PNG or GIF
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// Invalid user-supplied value
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Image decode/encode error wrapper
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error wrapper
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LgtmError>;
