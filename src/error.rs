//! Error types for the rendering pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for rendering operations.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Failures that abort a single render. Parsing never produces one of these.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The generated SVG was rejected by the rasteriser.
    #[error("failed to parse generated SVG: {0}")]
    SvgParse(String),

    #[error("failed to allocate a {width}x{height} pixmap")]
    PixmapAlloc { width: u32, height: u32 },

    #[error("failed to encode PNG: {0}")]
    PngEncode(String),

    /// An icon bitmap exists on disk but cannot be decoded.
    #[error("invalid icon bitmap {path}: {reason}")]
    Icon { path: PathBuf, reason: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    /// A render running on the blocking pool panicked or was cancelled.
    #[error("render task failed: {0}")]
    Join(String),
}
