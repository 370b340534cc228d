//! `coachctl config`

use anyhow::Result;
use drivecoach_cues::CoachConfig;

use super::{ConfigCommands, load_config, require_input};
use crate::error::CliError;
use crate::output;

pub fn execute(cmd: &ConfigCommands, json: bool) -> Result<()> {
    match cmd {
        ConfigCommands::Show { config } => {
            let config = load_config(config.as_deref())?;
            output::print_config(&config, json)
        }
        ConfigCommands::Validate { file } => {
            require_input(file)?;
            let config = CoachConfig::load(file).map_err(CliError::from)?;
            if let Err(err) = config.validate() {
                return Err(CliError::ValidationError(err.to_string()).into());
            }
            let weight_total = config.weights.total();
            if (weight_total - 1.0).abs() > 1e-6 {
                tracing::warn!(weight_total, "Score weights do not sum to 1.0; final scores will be scaled");
            }
            output::print_validation_ok(file, weight_total, json);
            Ok(())
        }
    }
}
