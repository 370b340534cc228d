//! # drivecoach-cues
//!
//! Real-time driving cues and end-of-session scoring for DriveCoach.
//!
//! A [`CueEngine`] consumes one [`TelemetrySample`] at a time, tracks how
//! long the driver spends in each kind of violation, and keeps a small
//! registry of active coaching cues. Every threshold has a warn and a clear
//! level, so a signal hovering near its limit raises a cue once and then
//! holds it instead of flickering. A presentation layer polls
//! [`CueEngine::display_cues`] at its own rate; the session controller calls
//! [`CueEngine::finalize`] once at the end for a [`Scorecard`].
//!
//! ## Modules
//!
//! - [`engine`] - the per-session rule evaluator
//! - [`cue`] - cue vocabulary and the live cue registry
//! - [`display`] - top-N projection for a user interface
//! - [`score`] - tallies, penalties and the weighted scorecard
//! - [`config`] - thresholds, weights and file loading
//! - [`clock`] - injectable clock used for cue expiry and cooldown
//! - [`session`] - many sessions behind one registry
//! - `actor` - one tokio task per session (feature `actor`)
//!
//! ## Example
//!
//! ```rust
//! use drivecoach_cues::prelude::*;
//!
//! let clock = ManualClock::new(0.0);
//! let mut engine = CueEngine::with_clock(CueConfig::default(), ScoreWeights::default(), clock.clone());
//!
//! for tick in 0..20u32 {
//!     let t = f64::from(tick) * 0.1;
//!     clock.set(t);
//!     let sample = TelemetrySample::new(t, 12.0, 13.4).with_lane_offset(0.5);
//!     engine.update(&sample, Some(3.0));
//! }
//!
//! let cues = engine.display_cues();
//! assert_eq!(cues.first().map(|cue| cue.name), Some(CueName::KeepLane));
//!
//! let card = engine.finalize();
//! assert!(card.subscores.lane < 100.0);
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::panic,
    missing_docs,
    missing_debug_implementations
)]
#![warn(clippy::pedantic)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod clock;
pub mod config;
pub mod cue;
pub mod display;
pub mod engine;
pub mod error;
pub mod sample;
pub mod score;
pub mod session;

#[cfg(feature = "actor")]
#[cfg_attr(docsrs, doc(cfg(feature = "actor")))]
pub mod actor;

pub mod prelude;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::{CoachConfig, CueConfig, CueConfigBuilder, ScoreWeights};
pub use cue::{Activation, ActiveCue, CueName, CueRegistry, CueTable, clamp01};
pub use display::{DisplayCue, DisplayCueSelector};
pub use engine::{CueEngine, CueEvent, ScoringState};
pub use error::{CoachError, CoachResult};
pub use sample::{MPS_TO_MPH, TelemetrySample, TrafficLight};
pub use score::{CategoryScores, Grade, ScoreAggregator, Scorecard, SessionTallies, Violations};
pub use session::SessionRegistry;

#[cfg(feature = "actor")]
pub use actor::{SessionHandle, spawn_session};
