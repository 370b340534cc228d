//! `coachctl synth`

use anyhow::Result;
use drivecoach_recorder::{Replay, SyntheticDrive};
use std::path::Path;

use super::load_config;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Clone, Copy)]
pub struct SynthArgs<'a> {
    pub duration_s: f64,
    pub rate_hz: f64,
    pub limit_mph: f64,
    pub lead_proxy: Option<f64>,
    pub out: Option<&'a Path>,
    pub config: Option<&'a Path>,
    pub trace: bool,
}

pub fn execute(args: &SynthArgs<'_>, json: bool) -> Result<()> {
    let config = load_config(args.config)?;
    let mut drive = SyntheticDrive::new(args.duration_s, args.rate_hz)
        .map_err(|err| CliError::InvalidArgument(err.to_string()))?
        .with_limit_mph(args.limit_mph);
    if let Some(proxy) = args.lead_proxy {
        drive = drive.with_lead_proxy(proxy);
    }

    let recording = drive.recording();
    if let Some(out) = args.out {
        recording
            .save(out)
            .map_err(|err| CliError::OutputError(format!("{err:#}")))?;
        tracing::info!(path = %out.display(), frames = recording.frames.len(), "Wrote synthetic recording");
    }

    let outcome = Replay::new(config).with_trace(args.trace).run(&recording.frames);
    output::print_outcome(&recording.metadata, &outcome, json)
}
