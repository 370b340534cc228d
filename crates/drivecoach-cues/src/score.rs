//! End-of-session scoring.
//!
//! Five categories, each penalised by at most [`PENALTY_CAP`] points out of
//! 100, combined with [`ScoreWeights`] into one final score.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::ScoreWeights;

/// Largest penalty any single category can take.
pub const PENALTY_CAP: f64 = 25.0;

/// Penalty points per harsh-brake event.
pub const HARSH_BRAKE_PENALTY: f64 = 5.0;

/// Penalty points per red-light violation or collision.
pub const COMPLIANCE_EVENT_PENALTY: f64 = 10.0;

/// Sessions shorter than this are scored as if no time passed.
const MIN_TOTAL_TIME_S: f64 = 1e-6;

/// Running tallies accumulated by the engine.
///
/// Every field only ever grows during a session.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionTallies {
    /// Elapsed sample time (s).
    pub total_time_s: f64,
    /// Time spent above the speed warn threshold (s).
    pub over_speed_time_s: f64,
    /// Time spent beyond the lane warn offset (s).
    pub out_of_lane_time_s: f64,
    /// Time spent below the headway warn threshold (s).
    pub bad_headway_time_s: f64,
    /// Harsh-brake events.
    pub harsh_brakes: u32,
    /// Ticks spent moving through a stop zone on red.
    pub red_light: u32,
    /// Frames flagged as collisions.
    pub collisions: u32,
}

/// One value per scoring category.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoryScores {
    /// Time over the speed limit.
    pub speeding: f64,
    /// Time out of lane.
    pub lane: f64,
    /// Time following too closely.
    pub headway: f64,
    /// Harsh braking.
    pub smooth: f64,
    /// Red-light violations and collisions.
    pub compliance: f64,
}

impl CategoryScores {
    fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            speeding: f(self.speeding),
            lane: f(self.lane),
            headway: f(self.headway),
            smooth: f(self.smooth),
            compliance: f(self.compliance),
        }
    }

    /// Weighted sum over the five categories.
    #[must_use]
    pub fn weighted_sum(&self, weights: &ScoreWeights) -> f64 {
        self.speeding * weights.speeding
            + self.lane * weights.lane
            + self.headway * weights.headway
            + self.smooth * weights.smooth
            + self.compliance * weights.compliance
    }
}

/// Raw event counts reported with the scorecard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Violations {
    /// Ticks spent moving through a stop zone on red.
    pub red_light: u32,
    /// Collision frames.
    pub collisions: u32,
    /// Harsh-brake events.
    pub harsh_brakes: u32,
}

/// Letter grade for a final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    /// 90 and above.
    A,
    /// 80 to 90.
    B,
    /// 70 to 80.
    C,
    /// 60 to 70.
    D,
    /// Below 60.
    F,
}

impl Grade {
    /// A from 90, then one letter per 10 points down to D at 60.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Grade::A
        } else if score >= 80.0 {
            Grade::B
        } else if score >= 70.0 {
            Grade::C
        } else if score >= 60.0 {
            Grade::D
        } else {
            Grade::F
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        f.write_str(letter)
    }
}

/// The session result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scorecard {
    /// `100 - penalty` per category.
    pub subscores: CategoryScores,
    /// Capped penalty per category.
    pub penalties: CategoryScores,
    /// Weighted sum of subscores, rounded to one decimal place.
    #[serde(rename = "final")]
    pub final_score: f64,
    /// Event counts behind the compliance and braking penalties.
    pub violations: Violations,
    /// Scored session length (s).
    pub total_time_s: f64,
}

impl Scorecard {
    /// Letter grade for [`Scorecard::final_score`].
    #[must_use]
    pub fn grade(&self) -> Grade {
        Grade::from_score(self.final_score)
    }
}

/// Turns tallies into a [`Scorecard`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreAggregator {
    weights: ScoreWeights,
}

impl ScoreAggregator {
    /// Create an aggregator applying `weights`.
    #[must_use]
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    /// Score a session. Never fails; degenerate input yields all-100 subscores.
    #[must_use]
    pub fn aggregate(&self, tallies: &SessionTallies) -> Scorecard {
        let total = tallies.total_time_s;
        let penalties = CategoryScores {
            speeding: time_penalty(tallies.over_speed_time_s, total),
            lane: time_penalty(tallies.out_of_lane_time_s, total),
            headway: time_penalty(tallies.bad_headway_time_s, total),
            smooth: event_penalty(f64::from(tallies.harsh_brakes) * HARSH_BRAKE_PENALTY),
            compliance: event_penalty(
                (f64::from(tallies.red_light) + f64::from(tallies.collisions))
                    * COMPLIANCE_EVENT_PENALTY,
            ),
        };
        let subscores = penalties.map(|penalty| (100.0 - penalty).max(0.0));
        let final_score = round_tenth(subscores.weighted_sum(&self.weights));

        Scorecard {
            subscores,
            penalties,
            final_score,
            violations: Violations {
                red_light: tallies.red_light,
                collisions: tallies.collisions,
                harsh_brakes: tallies.harsh_brakes,
            },
            total_time_s: if total.is_finite() { total } else { 0.0 },
        }
    }
}

fn time_penalty(violation_s: f64, total_s: f64) -> f64 {
    if total_s.is_nan() || total_s < MIN_TOTAL_TIME_S {
        return 0.0;
    }
    let ratio = violation_s / total_s;
    if !ratio.is_finite() {
        return 0.0;
    }
    event_penalty(100.0 * ratio)
}

fn event_penalty(points: f64) -> f64 {
    points.clamp(0.0, PENALTY_CAP)
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_session_scores_100() {
        let card = ScoreAggregator::default().aggregate(&SessionTallies::default());
        assert!((card.final_score - 100.0).abs() < 1e-9);
        assert!((card.subscores.speeding - 100.0).abs() < 1e-9);
        assert!((card.subscores.compliance - 100.0).abs() < 1e-9);
        assert_eq!(card.grade(), Grade::A);
    }

    #[test]
    fn test_zero_time_ignores_time_tallies() {
        let tallies = SessionTallies {
            over_speed_time_s: 5.0,
            ..SessionTallies::default()
        };
        let card = ScoreAggregator::default().aggregate(&tallies);
        assert!((card.subscores.speeding - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_time_penalty_is_capped() {
        let tallies = SessionTallies {
            total_time_s: 10.0,
            out_of_lane_time_s: 1.0,
            bad_headway_time_s: 10.0,
            ..SessionTallies::default()
        };
        let card = ScoreAggregator::default().aggregate(&tallies);
        assert!((card.penalties.lane - 10.0).abs() < 1e-9);
        assert!((card.subscores.lane - 90.0).abs() < 1e-9);
        assert!((card.penalties.headway - PENALTY_CAP).abs() < 1e-9);
        assert!((card.subscores.headway - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_event_penalties() {
        let tallies = SessionTallies {
            total_time_s: 60.0,
            harsh_brakes: 3,
            red_light: 1,
            ..SessionTallies::default()
        };
        let card = ScoreAggregator::default().aggregate(&tallies);
        assert!((card.subscores.smooth - 85.0).abs() < 1e-9);
        assert!((card.subscores.compliance - 90.0).abs() < 1e-9);
        assert_eq!(card.violations.harsh_brakes, 3);
    }

    #[test]
    fn test_compliance_penalty_caps_at_25() {
        let tallies = SessionTallies {
            total_time_s: 60.0,
            red_light: 2,
            collisions: 1,
            ..SessionTallies::default()
        };
        let card = ScoreAggregator::default().aggregate(&tallies);
        assert!((card.penalties.compliance - 25.0).abs() < 1e-9);
        assert!((card.subscores.compliance - 75.0).abs() < 1e-9);
        assert_eq!(card.violations.red_light, 2);
        assert_eq!(card.violations.collisions, 1);
    }

    #[test]
    fn test_weights_are_not_renormalised() {
        let weights = ScoreWeights {
            speeding: 0.5,
            lane: 0.5,
            headway: 0.5,
            smooth: 0.5,
            compliance: 0.5,
        };
        let card = ScoreAggregator::new(weights).aggregate(&SessionTallies::default());
        assert!((card.final_score - 250.0).abs() < 1e-9);
    }

    #[test]
    fn test_nan_total_time_is_treated_as_empty() {
        let tallies = SessionTallies {
            total_time_s: f64::NAN,
            over_speed_time_s: 1.0,
            ..SessionTallies::default()
        };
        let card = ScoreAggregator::default().aggregate(&tallies);
        assert!((card.subscores.speeding - 100.0).abs() < 1e-9);
        assert!(card.total_time_s.abs() < 1e-12);
    }

    #[test]
    fn test_grade_boundaries() {
        assert_eq!(Grade::from_score(90.0), Grade::A);
        assert_eq!(Grade::from_score(89.9), Grade::B);
        assert_eq!(Grade::from_score(70.0), Grade::C);
        assert_eq!(Grade::from_score(60.0), Grade::D);
        assert_eq!(Grade::from_score(59.9), Grade::F);
        assert_eq!(Grade::from_score(f64::NAN), Grade::F);
    }

    #[test]
    fn test_rounding() {
        assert!((round_tenth(93.75) - 93.8).abs() < 1e-9);
        assert!((round_tenth(81.24) - 81.2).abs() < 1e-9);
    }
}
