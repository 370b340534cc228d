//! Error types for coachctl

use drivecoach_cues::CoachError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Input not found: {0}")]
    InputNotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Coach(#[from] CoachError),

    #[error("Output error: {0}")]
    OutputError(String),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::InputNotFound(_) => 2,
            CliError::ValidationError(_) | CliError::ParseError(_) => 4,
            CliError::Coach(err) if err.is_configuration_error() => 4,
            _ => 1,
        }
    }

    /// Short machine-readable name used in JSON output.
    pub fn kind(&self) -> &'static str {
        match self {
            CliError::InputNotFound(_) => "input_not_found",
            CliError::ValidationError(_) => "validation",
            CliError::ParseError(_) => "parse",
            CliError::InvalidArgument(_) => "invalid_argument",
            CliError::Coach(_) => "configuration",
            CliError::OutputError(_) => "output",
        }
    }
}

/// Exit code for any error reaching `main`.
pub fn exit_code(error: &anyhow::Error) -> u8 {
    error.downcast_ref::<CliError>().map_or(1, CliError::exit_code)
}
