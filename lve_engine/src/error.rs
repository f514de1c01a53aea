//! Error types for the LVE engine
//!
//! This module defines the error types used throughout the engine,
//! including shader loading, pipeline configuration and pipeline creation.

use std::fmt;
use std::path::PathBuf;

/// Result type for LVE engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// LVE engine errors
#[derive(Debug, Clone)]
pub enum Error {
    /// A shader bytecode file could not be opened or fully read
    FileOpen {
        /// Path that was requested
        path: PathBuf,
        /// Underlying I/O failure
        reason: String,
    },

    /// Framebuffer dimensions must both be non-zero
    InvalidDimension {
        width: u32,
        height: u32,
    },

    /// The device rejected shader bytecode
    ShaderModuleCreation(String),

    /// The graphics pipeline could not be assembled (including unset required config fields)
    PipelineCreation(String),

    /// Backend-specific error (Vulkan, etc.)
    BackendError(String),

    /// Initialization failed (engine, graphics device)
    InitializationFailed(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::FileOpen { path, reason } => {
                write!(f, "Failed to open file '{}': {}", path.display(), reason)
            }
            Error::InvalidDimension { width, height } => {
                write!(f, "Invalid dimension: {}x{} (width and height must be non-zero)", width, height)
            }
            Error::ShaderModuleCreation(msg) => write!(f, "Shader module creation failed: {}", msg),
            Error::PipelineCreation(msg) => write!(f, "Pipeline creation failed: {}", msg),
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
