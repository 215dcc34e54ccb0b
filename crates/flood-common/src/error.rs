//! Error types for the flood overlay viewer.

use thiserror::Error;

use crate::crs::CrsParseError;
use crate::time::TimeCodecError;

/// Result type alias using ViewerError.
pub type ViewerResult<T> = Result<T, ViewerError>;

/// Primary error type for viewer operations.
///
/// None of these are fatal to a running session: callers report them and
/// keep the viewer interactive.
#[derive(Debug, Error)]
pub enum ViewerError {
    // === Configuration Errors ===
    #[error("Failed to read config file '{path}': {message}")]
    ConfigRead { path: String, message: String },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    // === Selection Errors ===
    #[error("Time step {step} is outside 1..={max}")]
    InvalidTimeStep { step: u32, max: u32 },

    #[error("Invalid time value: {0}")]
    InvalidTime(#[from] TimeCodecError),

    #[error("Invalid CRS: {0}")]
    InvalidCrs(#[from] CrsParseError),
}

impl From<serde_yaml::Error> for ViewerError {
    fn from(err: serde_yaml::Error) -> Self {
        ViewerError::InvalidConfig(format!("YAML error: {}", err))
    }
}
