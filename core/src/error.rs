//! Error types for environment resolution, pattern compilation and rendering

use thiserror::Error;

/// Result type alias for synthesis operations
pub type Result<T> = std::result::Result<T, SynthError>;

/// Synthesis error with a stable key for reporting
#[derive(Error, Debug)]
pub enum SynthError {
    #[error("unresolved environment: {message}")]
    UnresolvedEnvironment { message: String },

    #[error("invalid environment: {message}")]
    InvalidEnvironment { message: String },

    #[error("invalid pattern: {message}")]
    InvalidPattern { message: String },

    #[error("serialization error: {message}")]
    Serialization { message: String },

    #[error("io error: {message}")]
    Io { message: String },
}

impl SynthError {
    pub fn unresolved_environment(message: impl Into<String>) -> Self {
        Self::UnresolvedEnvironment {
            message: message.into(),
        }
    }

    pub fn invalid_environment(message: impl Into<String>) -> Self {
        Self::InvalidEnvironment {
            message: message.into(),
        }
    }

    pub fn invalid_pattern(message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            message: message.into(),
        }
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Get the error key for this error
    pub fn error_key(&self) -> &'static str {
        match self {
            Self::UnresolvedEnvironment { .. } => "unresolved_environment",
            Self::InvalidEnvironment { .. } => "invalid_environment",
            Self::InvalidPattern { .. } => "invalid_pattern",
            Self::Serialization { .. } => "serialization_error",
            Self::Io { .. } => "io_error",
        }
    }
}
