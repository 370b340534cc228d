//! Command implementations for coachctl

pub mod config;
pub mod replay;
pub mod synth;

use anyhow::Result;
use clap::Subcommand;
use drivecoach_cues::CoachConfig;
use std::path::{Path, PathBuf};

use crate::error::CliError;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show {
        /// Configuration file to load instead of the defaults
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Check a configuration file against the construction rules
    Validate {
        /// YAML or JSON configuration file
        file: PathBuf,
    },
}

/// Fail with exit code 2 when `path` does not exist.
pub(crate) fn require_input(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(CliError::InputNotFound(path.display().to_string()).into());
    }
    Ok(())
}

/// Load and validate a configuration file, or fall back to the defaults.
pub(crate) fn load_config(path: Option<&Path>) -> Result<CoachConfig> {
    let Some(path) = path else {
        return Ok(CoachConfig::default());
    };
    require_input(path)?;
    let config = CoachConfig::load(path).map_err(CliError::from)?;
    config
        .validate()
        .map_err(|err| CliError::ValidationError(err.to_string()))?;
    tracing::info!(path = %path.display(), "Using configuration file");
    Ok(config)
}
