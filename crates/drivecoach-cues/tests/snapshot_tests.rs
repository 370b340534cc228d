//! Snapshot tests for user-facing formatting.
//!
//! Error text, cue wire names and the scorecard JSON shape are consumed by
//! other processes and should only change on purpose.

use drivecoach_cues::{CoachError, CueName, ScoreAggregator, ScoreWeights, SessionTallies};
use insta::assert_snapshot;

type TestResult = Result<(), Box<dyn std::error::Error>>;

mod error_snapshots {
    use super::*;

    #[test]
    fn test_invalid_configuration() {
        assert_snapshot!(
            CoachError::invalid_configuration("lane_offset_clear_m must be less than lane_offset_warn_m").to_string(),
            @"Invalid configuration: lane_offset_clear_m must be less than lane_offset_warn_m"
        );
    }

    #[test]
    fn test_session_errors() {
        assert_snapshot!(CoachError::session_not_found("drive-7").to_string(), @"Session not found: drive-7");
        assert_snapshot!(CoachError::session_already_open("drive-7").to_string(), @"Session already open: drive-7");
        assert_snapshot!(CoachError::session_closed("drive-7").to_string(), @"Session closed: drive-7");
    }

    #[test]
    fn test_unsupported_format() {
        assert_snapshot!(
            CoachError::UnsupportedFormat("coach.toml".to_string()).to_string(),
            @"Unsupported configuration format: coach.toml"
        );
    }
}

mod cue_snapshots {
    use super::*;

    #[test]
    fn test_cue_vocabulary() {
        let names: Vec<String> = CueName::ALL.iter().map(ToString::to_string).collect();
        assert_snapshot!(names.join("\n"), @r"
        SLOW_DOWN
        KEEP_LANE
        INCREASE_HEADWAY
        SMOOTHER_BRAKE
        BRAKE_NOW
        ");
    }
}

mod scorecard_snapshots {
    use super::*;

    #[test]
    fn test_scorecard_json() -> TestResult {
        let tallies = SessionTallies {
            total_time_s: 8.0,
            over_speed_time_s: 2.0,
            out_of_lane_time_s: 1.0,
            bad_headway_time_s: 0.0,
            harsh_brakes: 1,
            red_light: 1,
            collisions: 0,
        };
        let card = ScoreAggregator::new(ScoreWeights::default()).aggregate(&tallies);
        assert_snapshot!(card.grade().to_string(), @"B");
        assert_snapshot!(serde_json::to_string_pretty(&card)?, @r#"
        {
          "subscores": {
            "speeding": 75.0,
            "lane": 87.5,
            "headway": 100.0,
            "smooth": 95.0,
            "compliance": 90.0
          },
          "penalties": {
            "speeding": 25.0,
            "lane": 12.5,
            "headway": 0.0,
            "smooth": 5.0,
            "compliance": 10.0
          },
          "final": 88.4,
          "violations": {
            "red_light": 1,
            "collisions": 0,
            "harsh_brakes": 1
          },
          "total_time_s": 8.0
        }
        "#);
        Ok(())
    }
}
