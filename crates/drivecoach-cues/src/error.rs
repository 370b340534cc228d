//! Error types for the cue engine crate.
//!
//! Normal sample processing never fails; these errors cover configuration
//! loading and validation and multi-session bookkeeping.

use thiserror::Error;

/// Errors raised around the cue engine.
#[derive(Debug, Error)]
pub enum CoachError {
    /// A configuration value breaks the construction contract.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The configuration file extension is not one we know how to parse.
    #[error("Unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    /// Reading a configuration file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML configuration could not be parsed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON configuration could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No session with this identifier is open.
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// A session with this identifier is already open.
    #[error("Session already open: {0}")]
    SessionAlreadyOpen(String),

    /// The task owning the session has stopped.
    #[error("Session closed: {0}")]
    SessionClosed(String),
}

impl CoachError {
    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_configuration(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration(reason.into())
    }

    /// Create a session not found error.
    #[must_use]
    pub fn session_not_found(session_id: impl Into<String>) -> Self {
        Self::SessionNotFound(session_id.into())
    }

    /// Create a session already open error.
    #[must_use]
    pub fn session_already_open(session_id: impl Into<String>) -> Self {
        Self::SessionAlreadyOpen(session_id.into())
    }

    /// Create a session closed error.
    #[must_use]
    pub fn session_closed(session_id: impl Into<String>) -> Self {
        Self::SessionClosed(session_id.into())
    }

    /// Whether the error came from configuration parsing or validation.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfiguration(_)
                | Self::UnsupportedFormat(_)
                | Self::Yaml(_)
                | Self::Json(_)
        )
    }
}

/// A specialized `Result` type for cue engine operations.
pub type CoachResult<T> = std::result::Result<T, CoachError>;
