//! Error types for the Glint engine
//!
//! This module defines the error type used throughout the engine:
//! file access, shader compilation and linking, image decoding,
//! resource misuse and driver failures.

use std::fmt;

use crate::graphics_device::ShaderStage;

/// Result type for Glint engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Glint engine errors
#[derive(Debug, Clone)]
pub enum Error {
    /// A file could not be found or opened (shader source, etc.)
    ResourceUnavailable {
        path: String,
        reason: String,
    },

    /// The driver rejected a shader stage; `log` is the full compiler output
    ShaderCompileError {
        stage: ShaderStage,
        log: String,
    },

    /// The driver failed to link a program; `log` is the full linker output
    LinkError {
        log: String,
    },

    /// An image file is missing or could not be decoded
    ImageDecodeError {
        path: String,
        reason: String,
    },

    /// Invalid use of a resource (out of range slot, oversized write, ...)
    InvalidResource(String),

    /// Driver-specific error (handle allocation refused, etc.)
    BackendError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ResourceUnavailable { path, reason } => {
                write!(f, "Resource unavailable: {} ({})", path, reason)
            }
            Error::ShaderCompileError { stage, log } => {
                write!(f, "Could not compile {} shader:\n{}", stage, log)
            }
            Error::LinkError { log } => write!(f, "Could not link shader program:\n{}", log),
            Error::ImageDecodeError { path, reason } => {
                write!(f, "Could not decode image {}: {}", path, reason)
            }
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Log an ERROR and build an `Error::InvalidResource` from a format string
///
/// # Example
///
/// ```no_run
/// # use glint_engine::engine_err;
/// let err = engine_err!("glint::VertexArray", "Slot {} already in use", 3);
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::glint::Error::InvalidResource(message)
    }};
}

/// Log an ERROR and return early with an `Error::InvalidResource`
///
/// # Example
///
/// ```no_run
/// # use glint_engine::engine_bail;
/// fn check(slot: u32) -> glint_engine::glint::Result<()> {
///     if slot > 15 {
///         engine_bail!("glint::Texture", "Texture unit {} out of range", slot);
///     }
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::engine_err!($source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
