//! Output formatting for CLI responses

use anyhow::Error;
use colored::{ColoredString, Colorize};
use drivecoach_cues::{CoachConfig, Grade, Scorecard};
use drivecoach_recorder::{RecordingMetadata, ReplayOutcome};
use serde_json::json;
use std::path::Path;

use crate::error::CliError;

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Failed to format output as JSON: {e}"),
    }
}

/// Print error in JSON format
pub fn print_error_json(error: &Error) {
    let kind = error.downcast_ref::<CliError>().map_or("error", CliError::kind);
    print_json(&json!({
        "success": false,
        "error": {
            "message": format!("{error:#}"),
            "type": kind,
        }
    }));
}

/// Print error in human-readable format
pub fn print_error_human(error: &Error) {
    eprintln!("{} {}", "Error:".red().bold(), error);

    for cause in error.chain().skip(1) {
        eprintln!("  {} {}", "Caused by:".yellow(), cause);
    }
}

fn grade_label(grade: Grade) -> ColoredString {
    let label = grade.to_string();
    match grade {
        Grade::A => label.green().bold(),
        Grade::B | Grade::C => label.yellow().bold(),
        Grade::D | Grade::F => label.red().bold(),
    }
}

fn print_scorecard_human(card: &Scorecard) {
    println!(
        "  {} {:.1} ({})",
        "Final score:".bold(),
        card.final_score,
        grade_label(card.grade())
    );
    let rows = [
        ("Speeding", card.subscores.speeding, card.penalties.speeding),
        ("Lane keeping", card.subscores.lane, card.penalties.lane),
        ("Headway", card.subscores.headway, card.penalties.headway),
        ("Smooth braking", card.subscores.smooth, card.penalties.smooth),
        ("Compliance", card.subscores.compliance, card.penalties.compliance),
    ];
    for (label, subscore, penalty) in rows {
        let penalty_text = format!("-{penalty:.1}");
        let penalty_text = if penalty > 0.0 {
            penalty_text.red()
        } else {
            penalty_text.dimmed()
        };
        println!("    {label:<15} {subscore:>6.1}  {penalty_text}");
    }
    println!(
        "  {} red light {}, collisions {}, harsh brakes {}",
        "Violations:".bold(),
        card.violations.red_light,
        card.violations.collisions,
        card.violations.harsh_brakes
    );
}

/// Print a replay result
pub fn print_outcome(metadata: &RecordingMetadata, outcome: &ReplayOutcome, json: bool) -> anyhow::Result<()> {
    if json {
        print_json(&json!({
            "success": true,
            "recording": metadata,
            "outcome": serde_json::to_value(outcome)?,
        }));
        return Ok(());
    }

    println!(
        "{} {} ({} frames, {:.1} s)",
        "Session:".bold(),
        metadata.source,
        outcome.frames,
        outcome.scorecard.total_time_s
    );
    print_scorecard_human(&outcome.scorecard);

    if outcome.cue_onsets.is_empty() {
        println!("  {} none", "Cues raised:".bold());
    } else {
        let raised: Vec<String> = outcome
            .cue_onsets
            .iter()
            .map(|(name, count)| format!("{name} x{count}"))
            .collect();
        println!("  {} {}", "Cues raised:".bold(), raised.join(", "));
    }

    if !outcome.trace.is_empty() {
        println!("{}", "Cue trace:".bold());
        for entry in outcome.trace.iter().filter(|entry| !entry.cues.is_empty()) {
            let cues: Vec<String> = entry
                .cues
                .iter()
                .map(|cue| format!("{} {:.2}", cue.name, cue.level))
                .collect();
            println!("  {:>8.2}s  {}", entry.t, cues.join(", ").cyan());
        }
    }
    Ok(())
}

/// Print a configuration
pub fn print_config(config: &CoachConfig, json: bool) -> anyhow::Result<()> {
    if json {
        print_json(&json!({
            "success": true,
            "config": config,
        }));
    } else {
        print!("{}", config.to_yaml_string()?);
    }
    Ok(())
}

/// Print a successful validation
pub fn print_validation_ok(path: &Path, weight_total: f64, json: bool) {
    if json {
        print_json(&json!({
            "success": true,
            "file": path.display().to_string(),
            "weight_total": weight_total,
        }));
    } else {
        println!("{} {} is valid", "✓".green(), path.display());
    }
}
