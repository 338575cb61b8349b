use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the whiteboard to its host
#[derive(Debug, Error)]
pub enum WhiteboardError {
    /// The drawing surface reported a non-positive size; the previous raster is kept
    #[error("Surface not ready: width {width}, height {height}")]
    SurfaceNotReady { width: i32, height: i32 },

    /// Export target is missing or is not a directory
    #[error("No writable destination: {}", .0.display())]
    NoDestination(PathBuf),

    #[error("Failed to encode image: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Failed to write image: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type for whiteboard operations that can fail
pub type WhiteboardResult<T> = Result<T, WhiteboardError>;
