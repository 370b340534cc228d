//! Telemetry recordings, synthetic drives and deterministic replay.
//!
//! Recordings are plain JSON documents or JSON Lines streams of
//! [`RecordedFrame`]s. [`Replay`] runs them through a
//! [`drivecoach_cues::CueEngine`] whose clock follows sample time, so the same
//! file always produces the same cues and the same scorecard.

#![deny(missing_docs, missing_debug_implementations)]

pub mod frame;
pub mod recording;
pub mod replay;
pub mod synthetic;

pub use frame::{RecordedFrame, lead_proxy_ttc};
pub use recording::{RecordingMetadata, TelemetryRecording, read_jsonl, write_jsonl};
pub use replay::{Replay, ReplayOutcome, TraceEntry};
pub use synthetic::{MPH_TO_MPS, SyntheticDrive};
