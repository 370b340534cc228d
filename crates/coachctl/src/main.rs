//! coachctl - DriveCoach command-line tools
//!
//! Replays telemetry recordings through the cue engine, generates and scores
//! synthetic drives, and inspects scoring configuration.

mod commands;
mod error;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::ConfigCommands;
use crate::commands::replay::ReplayArgs;
use crate::commands::synth::SynthArgs;

#[derive(Parser, Debug)]
#[command(name = "coachctl")]
#[command(about = "DriveCoach CLI - Replay, score and inspect driving telemetry")]
#[command(version)]
#[command(long_about = "
coachctl drives the DriveCoach cue engine from the command line.
It replays JSON or JSON Lines telemetry recordings, generates synthetic drives,
and prints the resulting coaching cues and session scorecard.

Use --json for machine-readable output suitable for scripting.
")]
struct Cli {
    /// Output in JSON format for machine parsing
    #[arg(long, global = true)]
    json: bool,

    /// Verbose logging (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a recording and print its scorecard
    Replay {
        /// Recording file (.json or .jsonl)
        file: PathBuf,

        /// Configuration file (.yaml, .yml or .json)
        #[arg(short, long, env = "COACHCTL_CONFIG")]
        config: Option<PathBuf>,

        /// Print the display cues after every frame
        #[arg(long)]
        trace: bool,
    },

    /// Generate a synthetic drive and score it
    Synth {
        /// Drive length in seconds
        #[arg(long, default_value_t = 60.0)]
        duration: f64,

        /// Sample rate in hertz
        #[arg(long, default_value_t = 10.0)]
        hz: f64,

        /// Posted speed limit in miles per hour
        #[arg(long, default_value_t = 30.0)]
        limit_mph: f64,

        /// Follow a lead vehicle at this perception distance proxy
        #[arg(long)]
        lead_proxy: Option<f64>,

        /// Also write the generated recording here (.json or .jsonl)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Configuration file (.yaml, .yml or .json)
        #[arg(short, long, env = "COACHCTL_CONFIG")]
        config: Option<PathBuf>,

        /// Print the display cues after every frame
        #[arg(long)]
        trace: bool,
    },

    /// Configuration commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("coachctl={level},drivecoach_cues={level},drivecoach_recorder={level}").into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match execute_command(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                output::print_error_json(&e);
            } else {
                output::print_error_human(&e);
            }
            ExitCode::from(error::exit_code(&e))
        }
    }
}

fn execute_command(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Replay {
            file,
            config,
            trace,
        } => commands::replay::execute(
            &ReplayArgs {
                file,
                config: config.as_deref(),
                trace: *trace,
            },
            cli.json,
        ),
        Commands::Synth {
            duration,
            hz,
            limit_mph,
            lead_proxy,
            out,
            config,
            trace,
        } => commands::synth::execute(
            &SynthArgs {
                duration_s: *duration,
                rate_hz: *hz,
                limit_mph: *limit_mph,
                lead_proxy: *lead_proxy,
                out: out.as_deref(),
                config: config.as_deref(),
                trace: *trace,
            },
            cli.json,
        ),
        Commands::Config(cmd) => commands::config::execute(cmd, cli.json),
    }
}
