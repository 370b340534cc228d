//! Property-based tests for tally, score and display invariants.

use drivecoach_cues::{
    CueConfig, CueEngine, ManualClock, ScoreAggregator, ScoreWeights, SessionTallies,
    TelemetrySample, TrafficLight,
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
struct Frame {
    dt: f64,
    speed: f64,
    lane: Option<f64>,
    ttc: Option<f64>,
    brake: f64,
    red: bool,
    stop_zone: bool,
    collision: bool,
}

fn frame() -> impl Strategy<Value = Frame> {
    (
        -0.2..0.5f64,
        0.0..40.0f64,
        prop::option::of(-1.5..1.5f64),
        prop::option::of(0.0..5.0f64),
        -0.2..1.2f64,
        any::<bool>(),
        any::<bool>(),
        prop::bool::weighted(0.05),
    )
        .prop_map(|(dt, speed, lane, ttc, brake, red, stop_zone, collision)| Frame {
            dt,
            speed,
            lane,
            ttc,
            brake,
            red,
            stop_zone,
            collision,
        })
}

fn to_sample(t: f64, frame: &Frame) -> TelemetrySample {
    let mut sample = TelemetrySample::new(t, frame.speed, 13.4)
        .with_brake(frame.brake)
        .with_stop_zone(frame.stop_zone)
        .with_traffic_light(if frame.red { TrafficLight::Red } else { TrafficLight::Green });
    if let Some(lane) = frame.lane {
        sample = sample.with_lane_offset(lane);
    }
    if frame.collision {
        sample = sample.with_collision();
    }
    sample
}

proptest! {
    #[test]
    fn test_tallies_never_decrease(frames in prop::collection::vec(frame(), 1..200)) {
        let clock = ManualClock::new(0.0);
        let mut engine = CueEngine::with_clock(CueConfig::default(), ScoreWeights::default(), clock.clone());
        let mut t = 0.0;
        let mut previous = SessionTallies::default();

        for frame in &frames {
            // Negative steps exercise time regression.
            t += frame.dt;
            clock.set(t);
            engine.update(&to_sample(t, frame), frame.ttc);

            let now = engine.state().tallies;
            prop_assert!(now.total_time_s >= previous.total_time_s);
            prop_assert!(now.over_speed_time_s >= previous.over_speed_time_s);
            prop_assert!(now.out_of_lane_time_s >= previous.out_of_lane_time_s);
            prop_assert!(now.bad_headway_time_s >= previous.bad_headway_time_s);
            prop_assert!(now.harsh_brakes >= previous.harsh_brakes);
            prop_assert!(now.red_light >= previous.red_light);
            prop_assert!(now.collisions >= previous.collisions);
            prop_assert!(now.over_speed_time_s <= now.total_time_s + 1e-9);
            previous = now;
        }
    }

    #[test]
    fn test_levels_and_display_bounds(frames in prop::collection::vec(frame(), 1..200), max_cues in 1usize..5) {
        let clock = ManualClock::new(0.0);
        let config = CueConfig { max_concurrent_cues: max_cues, ..CueConfig::default() };
        let mut engine = CueEngine::with_clock(config, ScoreWeights::default(), clock.clone());
        let mut t = 0.0;

        for frame in &frames {
            t += frame.dt.abs();
            clock.set(t);
            engine.update(&to_sample(t, frame), frame.ttc);

            let cues = engine.display_cues();
            prop_assert!(cues.len() <= max_cues);
            for cue in &cues {
                prop_assert!((0.0..=1.0).contains(&cue.level));
            }
            for pair in cues.windows(2) {
                if let [first, second] = pair {
                    prop_assert!(first.level >= second.level);
                }
            }
        }
    }

    #[test]
    fn test_subscores_stay_in_range(
        total in 0.0..1000.0f64,
        over_speed in 0.0..2000.0f64,
        out_of_lane in 0.0..2000.0f64,
        bad_headway in 0.0..2000.0f64,
        harsh_brakes in 0..1000u32,
        red_light in 0..1000u32,
        collisions in 0..1000u32,
    ) {
        let tallies = SessionTallies {
            total_time_s: total,
            over_speed_time_s: over_speed,
            out_of_lane_time_s: out_of_lane,
            bad_headway_time_s: bad_headway,
            harsh_brakes,
            red_light,
            collisions,
        };
        let card = ScoreAggregator::new(ScoreWeights::default()).aggregate(&tallies);
        let subscores = [
            card.subscores.speeding,
            card.subscores.lane,
            card.subscores.headway,
            card.subscores.smooth,
            card.subscores.compliance,
        ];
        for subscore in subscores {
            prop_assert!((75.0..=100.0).contains(&subscore));
        }
        prop_assert!((0.0..=100.0).contains(&card.final_score));
    }

    #[test]
    fn test_zero_time_scores_weighted_hundreds(
        over_speed in 0.0..100.0f64,
        weights in (0.0..1.0f64, 0.0..1.0f64, 0.0..1.0f64, 0.0..1.0f64, 0.0..1.0f64),
    ) {
        let weights = ScoreWeights {
            speeding: weights.0,
            lane: weights.1,
            headway: weights.2,
            smooth: weights.3,
            compliance: weights.4,
        };
        let tallies = SessionTallies { over_speed_time_s: over_speed, ..SessionTallies::default() };
        let card = ScoreAggregator::new(weights).aggregate(&tallies);

        prop_assert!((card.subscores.speeding - 100.0).abs() < 1e-9);
        prop_assert!((card.subscores.lane - 100.0).abs() < 1e-9);
        let weighted = 100.0 * weights.speeding
            + 100.0 * weights.lane
            + 100.0 * weights.headway
            + 100.0 * weights.smooth
            + 100.0 * weights.compliance;
        let expected = (weighted * 10.0).round() / 10.0;
        prop_assert!((card.final_score - expected).abs() < 1e-9);
    }
}
