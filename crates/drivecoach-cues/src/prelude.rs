//! Commonly used types in one import.
//!
//! ```rust
//! use drivecoach_cues::prelude::*;
//!
//! let engine = CueEngine::new(CueConfig::default(), ScoreWeights::default());
//! assert_eq!(engine.samples_processed(), 0);
//! ```

pub use crate::clock::{Clock, ManualClock, MonotonicClock};
pub use crate::config::{CoachConfig, CueConfig, ScoreWeights};
pub use crate::cue::CueName;
pub use crate::display::DisplayCue;
pub use crate::engine::CueEngine;
pub use crate::error::{CoachError, CoachResult};
pub use crate::sample::{TelemetrySample, TrafficLight};
pub use crate::score::{Grade, Scorecard};
pub use crate::session::SessionRegistry;

#[cfg(feature = "actor")]
pub use crate::actor::{SessionHandle, spawn_session};
