//! Deterministic synthetic drives for demos and fixtures.
//!
//! The drive is a set of slow sinusoids: speed swings around the limit,
//! the brake is stabbed periodically, the car weaves gently in its lane and
//! every minute there is a red light between 20 s and 25 s inside a stop
//! zone spanning 19 s to 26 s.

use anyhow::ensure;
use drivecoach_cues::{TelemetrySample, TrafficLight};

use crate::frame::{RecordedFrame, lead_proxy_ttc};
use crate::recording::TelemetryRecording;

/// Conversion factor from miles per hour to metres per second.
pub const MPH_TO_MPS: f64 = 0.447_04;

/// Default posted limit, roughly 30 mph.
const DEFAULT_LIMIT_MPS: f64 = 13.4;

/// Length of the traffic light cycle (s).
const LIGHT_CYCLE_S: f64 = 60.0;

/// Synthetic drive generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticDrive {
    duration_s: f64,
    rate_hz: f64,
    speed_limit_mps: f64,
    lead_proxy: Option<f64>,
}

impl SyntheticDrive {
    /// A drive of `duration_s` seconds sampled at `rate_hz`.
    ///
    /// # Errors
    ///
    /// Returns an error unless both values are finite, the duration is
    /// non-negative and the rate is positive.
    pub fn new(duration_s: f64, rate_hz: f64) -> anyhow::Result<Self> {
        ensure!(
            duration_s.is_finite() && duration_s >= 0.0,
            "duration must be a finite non-negative number of seconds, got {duration_s}"
        );
        ensure!(
            rate_hz.is_finite() && rate_hz > 0.0,
            "sample rate must be a positive number of hertz, got {rate_hz}"
        );
        Ok(Self {
            duration_s,
            rate_hz,
            speed_limit_mps: DEFAULT_LIMIT_MPS,
            lead_proxy: None,
        })
    }

    /// Override the posted limit, given in miles per hour.
    #[must_use]
    pub fn with_limit_mph(mut self, limit_mph: f64) -> Self {
        self.speed_limit_mps = limit_mph * MPH_TO_MPS;
        self
    }

    /// Follow a lead vehicle at a constant perception distance proxy.
    #[must_use]
    pub fn with_lead_proxy(mut self, proxy: f64) -> Self {
        self.lead_proxy = Some(proxy);
        self
    }

    /// Posted limit used for every frame (m/s).
    #[must_use]
    pub fn speed_limit_mps(&self) -> f64 {
        self.speed_limit_mps
    }

    /// The frame at session time `t`.
    #[must_use]
    pub fn frame_at(&self, t: f64) -> RecordedFrame {
        let speed = (13.0 + 5.0 * (0.2 * t).sin()).max(0.0);
        let phase = t.rem_euclid(LIGHT_CYCLE_S);
        let light = if (20.0..=25.0).contains(&phase) {
            TrafficLight::Red
        } else {
            TrafficLight::Green
        };

        let sample = TelemetrySample::new(t, speed, self.speed_limit_mps)
            .with_throttle((0.6 * (0.7 * t).cos()).max(0.0))
            .with_brake((0.4 * (1.3 * t).sin()).max(0.0))
            .with_steer(5.0 * (0.5 * t).sin())
            .with_lane_offset(0.25 * (0.15 * t).sin())
            .with_traffic_light(light)
            .with_stop_zone((19.0..=26.0).contains(&phase));

        RecordedFrame::new(sample, lead_proxy_ttc(self.lead_proxy, speed))
    }

    /// Every frame from `t = 0` through the duration, inclusive.
    #[must_use]
    pub fn frames(&self) -> Vec<RecordedFrame> {
        let mut frames = Vec::new();
        let mut tick: u32 = 0;
        loop {
            let t = f64::from(tick) / self.rate_hz;
            if t > self.duration_s {
                break;
            }
            frames.push(self.frame_at(t));
            match tick.checked_add(1) {
                Some(next) => tick = next,
                None => break,
            }
        }
        frames
    }

    /// Package the frames as a recording.
    #[must_use]
    pub fn recording(&self) -> TelemetryRecording {
        TelemetryRecording::new("synthetic", self.frames()).with_description(format!(
            "Synthetic drive, {:.1} s at {:.1} Hz, limit {:.1} m/s",
            self.duration_s, self.rate_hz, self.speed_limit_mps
        ))
    }
}
