//! Engine error types
//!
//! Only setup and configuration can fail. The per-block processing path
//! never returns an error; out-of-range values are clamped instead.

use thiserror::Error;

/// Errors that can occur while configuring the engine or its parameters
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Sample rate of zero, or beyond what the filters are designed for
    #[error("Invalid sample rate: {0} Hz")]
    InvalidSampleRate(u32),

    /// Maximum block size of zero or above the pre-allocation limit
    #[error("Invalid block size: {size} frames (must be 1..={max})")]
    InvalidBlockSize { size: usize, max: usize },

    /// Parameter display name that does not match any known parameter
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    /// Parameter assignment that could not be parsed ("Name=value")
    #[error("Invalid parameter assignment: {0}")]
    InvalidAssignment(String),
}

/// Result type for engine setup operations
pub type EngineResult<T> = Result<T, EngineError>;
