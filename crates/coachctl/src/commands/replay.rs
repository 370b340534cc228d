//! `coachctl replay`

use anyhow::Result;
use drivecoach_recorder::{Replay, TelemetryRecording};
use std::path::Path;

use super::{load_config, require_input};
use crate::error::CliError;
use crate::output;

pub struct ReplayArgs<'a> {
    pub file: &'a Path,
    pub config: Option<&'a Path>,
    pub trace: bool,
}

pub fn execute(args: &ReplayArgs<'_>, json: bool) -> Result<()> {
    require_input(args.file)?;
    let config = load_config(args.config)?;
    let recording = TelemetryRecording::load(args.file)
        .map_err(|err| CliError::ParseError(format!("{err:#}")))?;
    tracing::info!(
        source = %recording.metadata.source,
        frames = recording.frames.len(),
        "Replaying recording"
    );

    let outcome = Replay::new(config).with_trace(args.trace).run(&recording.frames);
    output::print_outcome(&recording.metadata, &outcome, json)
}

