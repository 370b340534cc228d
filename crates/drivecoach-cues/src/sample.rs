//! Per-frame telemetry observations.

use serde::{Deserialize, Serialize};

/// Conversion factor from metres per second to miles per hour.
pub const MPS_TO_MPH: f64 = 2.236_936;

/// Traffic light state reported by perception.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TrafficLight {
    /// Stop.
    Red,
    /// Go.
    Green,
    /// Anything perception could not classify.
    #[default]
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for TrafficLight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrafficLight::Red => write!(f, "red"),
            TrafficLight::Green => write!(f, "green"),
            TrafficLight::Unknown => write!(f, "unknown"),
        }
    }
}

/// One time-stamped driving observation.
///
/// Pedal values are nominally in `[0, 1]` but sources do not always clamp;
/// the engine tolerates anything, including non-finite values, by skipping
/// whichever rule the bad value feeds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    /// Session time in seconds, expected non-decreasing.
    pub t: f64,
    /// Vehicle speed in m/s.
    pub speed_mps: f64,
    /// Posted speed limit in m/s.
    pub speed_limit_mps: f64,
    /// Throttle pedal position.
    #[serde(default)]
    pub throttle: f64,
    /// Brake pedal position.
    #[serde(default)]
    pub brake: f64,
    /// Steering angle in degrees. Carried but not scored.
    #[serde(default)]
    pub steer_deg: f64,
    /// Signed lateral offset from lane centre in metres, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lane_offset_m: Option<f64>,
    /// Traffic light ahead, if one was seen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tl_state: Option<TrafficLight>,
    /// Whether the vehicle is inside a stop zone, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_stop_zone: Option<bool>,
    /// A collision was registered on this frame.
    #[serde(default)]
    pub collision: bool,
}

impl TelemetrySample {
    /// Create a sample with the three mandatory signals; everything else is
    /// neutral.
    #[must_use]
    pub fn new(t: f64, speed_mps: f64, speed_limit_mps: f64) -> Self {
        Self {
            t,
            speed_mps,
            speed_limit_mps,
            throttle: 0.0,
            brake: 0.0,
            steer_deg: 0.0,
            lane_offset_m: None,
            tl_state: None,
            in_stop_zone: None,
            collision: false,
        }
    }

    /// Set the brake pedal position.
    #[must_use]
    pub fn with_brake(mut self, brake: f64) -> Self {
        self.brake = brake;
        self
    }

    /// Set the throttle pedal position.
    #[must_use]
    pub fn with_throttle(mut self, throttle: f64) -> Self {
        self.throttle = throttle;
        self
    }

    /// Set the steering angle.
    #[must_use]
    pub fn with_steer(mut self, steer_deg: f64) -> Self {
        self.steer_deg = steer_deg;
        self
    }

    /// Set the lateral lane offset.
    #[must_use]
    pub fn with_lane_offset(mut self, lane_offset_m: f64) -> Self {
        self.lane_offset_m = Some(lane_offset_m);
        self
    }

    /// Set the traffic light state.
    #[must_use]
    pub fn with_traffic_light(mut self, state: TrafficLight) -> Self {
        self.tl_state = Some(state);
        self
    }

    /// Set the stop zone flag.
    #[must_use]
    pub fn with_stop_zone(mut self, in_stop_zone: bool) -> Self {
        self.in_stop_zone = Some(in_stop_zone);
        self
    }

    /// Mark this frame as a collision.
    #[must_use]
    pub fn with_collision(mut self) -> Self {
        self.collision = true;
        self
    }

    /// Speed in miles per hour.
    #[must_use]
    pub fn speed_mph(&self) -> f64 {
        self.speed_mps * MPS_TO_MPH
    }

    /// Inside a stop zone facing a red light.
    #[must_use]
    pub fn at_red_stop_zone(&self) -> bool {
        self.in_stop_zone == Some(true) && self.tl_state == Some(TrafficLight::Red)
    }
}
