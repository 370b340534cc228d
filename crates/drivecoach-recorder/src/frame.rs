//! A telemetry sample paired with its externally estimated headway.

use drivecoach_cues::TelemetrySample;
use serde::{Deserialize, Serialize};

/// Distance in metres represented by one unit of the perception proxy.
const PROXY_DISTANCE_M: f64 = 40.0;

/// Below this speed a time-to-collision is not meaningful (m/s).
const MIN_TTC_SPEED_MPS: f64 = 0.1;

/// One frame of a recording.
///
/// Sample fields sit at the top level of the JSON object next to
/// `lead_ttc_s`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    /// The telemetry observation.
    #[serde(flatten)]
    pub sample: TelemetrySample,
    /// Time-to-collision with the lead vehicle, when one was tracked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_ttc_s: Option<f64>,
}

impl RecordedFrame {
    /// Pair a sample with its lead-vehicle time-to-collision.
    #[must_use]
    pub fn new(sample: TelemetrySample, lead_ttc_s: Option<f64>) -> Self {
        Self { sample, lead_ttc_s }
    }
}

impl From<TelemetrySample> for RecordedFrame {
    fn from(sample: TelemetrySample) -> Self {
        Self::new(sample, None)
    }
}

/// Time-to-collision from a perception distance proxy.
///
/// The proxy is a unitless lead-vehicle distance estimate; it is scaled to
/// metres and divided by the current speed. Returns `None` without a proxy
/// or when the vehicle is practically stationary.
#[must_use]
pub fn lead_proxy_ttc(px_proxy: Option<f64>, speed_mps: f64) -> Option<f64> {
    let proxy = px_proxy?;
    if speed_mps.is_nan() || speed_mps < MIN_TTC_SPEED_MPS {
        return None;
    }
    Some(PROXY_DISTANCE_M * proxy / speed_mps.max(MIN_TTC_SPEED_MPS))
}
