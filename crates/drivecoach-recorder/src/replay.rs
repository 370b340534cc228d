//! Deterministic replay of recorded frames through the cue engine.
//!
//! The engine's clock is pinned to each sample's timestamp, so cue expiry and
//! cooldown run in recording time rather than wall time.

use drivecoach_cues::{CoachConfig, CueEngine, CueName, DisplayCue, ManualClock, Scorecard};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::frame::RecordedFrame;

/// Display cues as they stood after one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceEntry {
    /// Sample time of the frame.
    pub t: f64,
    /// What the display showed after the frame was applied.
    pub cues: Vec<DisplayCue>,
}

/// What a replay produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayOutcome {
    /// Final session score.
    pub scorecard: Scorecard,
    /// Frames fed to the engine.
    pub frames: usize,
    /// How many times each cue appeared on screen.
    pub cue_onsets: BTreeMap<CueName, u32>,
    /// Per-frame display, when tracing was requested.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub trace: Vec<TraceEntry>,
}

/// Replay driver.
#[derive(Debug, Clone, Default)]
pub struct Replay {
    config: CoachConfig,
    trace: bool,
}

impl Replay {
    /// Replay with `config` and no per-frame trace.
    #[must_use]
    pub fn new(config: CoachConfig) -> Self {
        Self {
            config,
            trace: false,
        }
    }

    /// Record the display cues after every frame.
    #[must_use]
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// Run `frames` through a fresh engine and score the session.
    #[must_use]
    pub fn run(&self, frames: &[RecordedFrame]) -> ReplayOutcome {
        let clock = ManualClock::new(frames.first().map_or(0.0, |frame| frame.sample.t));
        let mut engine = CueEngine::with_clock(self.config.cues.clone(), self.config.weights, clock.clone());

        let mut cue_onsets = BTreeMap::new();
        let mut trace = Vec::new();
        let mut showing: Vec<CueName> = Vec::new();

        for frame in frames {
            if frame.sample.t.is_finite() {
                clock.set(frame.sample.t);
            }
            engine.update(&frame.sample, frame.lead_ttc_s);

            let cues = engine.display_cues();
            for cue in &cues {
                if !showing.contains(&cue.name) {
                    let count = cue_onsets.entry(cue.name).or_insert(0u32);
                    *count = count.saturating_add(1);
                }
            }
            showing = cues.iter().map(|cue| cue.name).collect();

            if self.trace {
                trace.push(TraceEntry {
                    t: frame.sample.t,
                    cues,
                });
            }
        }

        tracing::debug!(frames = frames.len(), onsets = ?cue_onsets, "Replay complete");
        ReplayOutcome {
            scorecard: engine.finalize(),
            frames: frames.len(),
            cue_onsets,
            trace,
        }
    }
}
