//! Platform error types

use thiserror::Error;

/// Platform-related errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlatformError {
    /// The event loop could not run
    #[error("Event loop error: {0}")]
    EventLoop(String),

    /// A scripted event targets a frame the loop never reaches
    #[error("Scripted event at frame {frame} is past the last frame ({frames})")]
    ScriptOutOfRange { frame: u64, frames: u64 },

    /// Window geometry the platform can't represent
    #[error("Invalid window size {width}x{height}")]
    InvalidWindowSize { width: f32, height: f32 },

    /// Platform not available
    #[error("Platform not available: {0}")]
    Unavailable(String),
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;
