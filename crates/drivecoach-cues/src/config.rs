//! Session configuration: cue thresholds, display timing and score weights.
//!
//! Configuration is immutable for the life of a session. The engine never
//! validates what it is given; [`CueConfig::validate`] and
//! [`ScoreWeights::validate`] are for the layer that builds sessions.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CoachError, CoachResult};

/// Thresholds and display timing for the cue engine.
///
/// Every `*_warn` / `*_clear` pair forms a hysteresis band: a cue fires
/// beyond the warn threshold and is only sustained, never re-fired, in the
/// band between warn and clear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CueConfig {
    /// Speed above the limit that triggers `SLOW_DOWN` (m/s).
    pub speed_margin_warn_mps: f64,
    /// Speed above the limit below which `SLOW_DOWN` stops being sustained (m/s).
    pub speed_margin_clear_mps: f64,
    /// Absolute lane offset that triggers `KEEP_LANE` (m).
    pub lane_offset_warn_m: f64,
    /// Absolute lane offset below which `KEEP_LANE` stops being sustained (m).
    pub lane_offset_clear_m: f64,
    /// Time-to-collision that triggers `INCREASE_HEADWAY` (s).
    pub ttc_warn_s: f64,
    /// Time-to-collision above which `INCREASE_HEADWAY` stops being sustained (s).
    pub ttc_clear_s: f64,
    /// Harsh-brake threshold; brake must rise faster than ten times this per second.
    pub harsh_brake_threshold: f64,
    /// Lower bound applied to `dt` in the brake derivative.
    pub min_harsh_brake_dt_s: f64,
    /// Minimum gap before an expired cue may be activated again (s).
    pub cue_cooldown_s: f64,
    /// How long an activation keeps a cue on screen (s).
    pub min_display_s: f64,
    /// How long a clear-band sample extends an already visible cue (s).
    pub sustain_after_clear_s: f64,
    /// Maximum number of cues surfaced at once.
    pub max_concurrent_cues: usize,
    /// Exponential smoothing factor applied to cue levels, in `(0, 1]`.
    pub level_ema_alpha: f64,
}

impl Default for CueConfig {
    fn default() -> Self {
        Self {
            speed_margin_warn_mps: 2.0,
            speed_margin_clear_mps: 1.0,
            lane_offset_warn_m: 0.35,
            lane_offset_clear_m: 0.25,
            ttc_warn_s: 1.6,
            ttc_clear_s: 1.9,
            harsh_brake_threshold: 0.35,
            min_harsh_brake_dt_s: 0.001,
            cue_cooldown_s: 1.5,
            min_display_s: 1.6,
            sustain_after_clear_s: 0.8,
            max_concurrent_cues: 2,
            level_ema_alpha: 0.65,
        }
    }
}

impl CueConfig {
    /// Create a configuration builder starting from the defaults.
    #[must_use]
    pub fn builder() -> CueConfigBuilder {
        CueConfigBuilder::default()
    }

    /// Check the construction contract.
    ///
    /// # Errors
    ///
    /// Returns [`CoachError::InvalidConfiguration`] when a hysteresis band is
    /// inverted or empty, a duration is negative or non-finite, the smoothing
    /// factor is outside `(0, 1]`, or no cues could ever be displayed.
    pub fn validate(&self) -> CoachResult<()> {
        let durations = [
            ("ttc_warn_s", self.ttc_warn_s),
            ("harsh_brake_threshold", self.harsh_brake_threshold),
            ("min_harsh_brake_dt_s", self.min_harsh_brake_dt_s),
            ("cue_cooldown_s", self.cue_cooldown_s),
            ("min_display_s", self.min_display_s),
            ("sustain_after_clear_s", self.sustain_after_clear_s),
        ];
        for (name, value) in durations {
            if !value.is_finite() || value < 0.0 {
                return Err(CoachError::invalid_configuration(format!(
                    "{name} must be a finite non-negative number, got {value}"
                )));
            }
        }

        if !strictly_less(self.speed_margin_clear_mps, self.speed_margin_warn_mps) {
            return Err(CoachError::invalid_configuration(
                "speed_margin_clear_mps must be less than speed_margin_warn_mps",
            ));
        }
        if !strictly_less(self.lane_offset_clear_m, self.lane_offset_warn_m) {
            return Err(CoachError::invalid_configuration(
                "lane_offset_clear_m must be less than lane_offset_warn_m",
            ));
        }
        // For time-to-collision smaller is worse, so the band is inverted.
        if !strictly_less(self.ttc_warn_s, self.ttc_clear_s) {
            return Err(CoachError::invalid_configuration(
                "ttc_clear_s must be greater than ttc_warn_s",
            ));
        }
        if !strictly_less(0.0, self.level_ema_alpha) || self.level_ema_alpha > 1.0 {
            return Err(CoachError::invalid_configuration(format!(
                "level_ema_alpha must be in (0, 1], got {}",
                self.level_ema_alpha
            )));
        }
        if self.max_concurrent_cues == 0 {
            return Err(CoachError::invalid_configuration(
                "max_concurrent_cues must be greater than 0",
            ));
        }
        Ok(())
    }
}

fn strictly_less(a: f64, b: f64) -> bool {
    a.partial_cmp(&b) == Some(std::cmp::Ordering::Less)
}

/// Builder for [`CueConfig`].
#[derive(Debug, Default)]
pub struct CueConfigBuilder {
    config: CueConfig,
}

impl CueConfigBuilder {
    /// Set the speed hysteresis band (m/s above the limit).
    #[must_use]
    pub fn speed_margins(mut self, warn_mps: f64, clear_mps: f64) -> Self {
        self.config.speed_margin_warn_mps = warn_mps;
        self.config.speed_margin_clear_mps = clear_mps;
        self
    }

    /// Set the lane offset hysteresis band (m).
    #[must_use]
    pub fn lane_offsets(mut self, warn_m: f64, clear_m: f64) -> Self {
        self.config.lane_offset_warn_m = warn_m;
        self.config.lane_offset_clear_m = clear_m;
        self
    }

    /// Set the time-to-collision hysteresis band (s).
    #[must_use]
    pub fn ttc(mut self, warn_s: f64, clear_s: f64) -> Self {
        self.config.ttc_warn_s = warn_s;
        self.config.ttc_clear_s = clear_s;
        self
    }

    /// Set the harsh-brake threshold.
    #[must_use]
    pub fn harsh_brake_threshold(mut self, threshold: f64) -> Self {
        self.config.harsh_brake_threshold = threshold;
        self
    }

    /// Set the minimum `dt` used by the brake derivative.
    #[must_use]
    pub fn min_harsh_brake_dt_s(mut self, dt_s: f64) -> Self {
        self.config.min_harsh_brake_dt_s = dt_s;
        self
    }

    /// Set the re-activation cooldown.
    #[must_use]
    pub fn cooldown_s(mut self, seconds: f64) -> Self {
        self.config.cue_cooldown_s = seconds;
        self
    }

    /// Set the minimum display duration.
    #[must_use]
    pub fn min_display_s(mut self, seconds: f64) -> Self {
        self.config.min_display_s = seconds;
        self
    }

    /// Set the post-clear sustain duration.
    #[must_use]
    pub fn sustain_after_clear_s(mut self, seconds: f64) -> Self {
        self.config.sustain_after_clear_s = seconds;
        self
    }

    /// Set the number of cues surfaced at once.
    #[must_use]
    pub fn max_concurrent_cues(mut self, count: usize) -> Self {
        self.config.max_concurrent_cues = count;
        self
    }

    /// Set the level smoothing factor.
    #[must_use]
    pub fn level_ema_alpha(mut self, alpha: f64) -> Self {
        self.config.level_ema_alpha = alpha;
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> CoachResult<CueConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Category weights for the final score.
///
/// Weights are meant to sum to 1.0 but are applied as given; a
/// misconfigured total shows up directly in the final score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    /// Weight of the speeding subscore.
    pub speeding: f64,
    /// Weight of the lane keeping subscore.
    pub lane: f64,
    /// Weight of the headway subscore.
    pub headway: f64,
    /// Weight of the smooth braking subscore.
    pub smooth: f64,
    /// Weight of the compliance subscore.
    pub compliance: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            speeding: 0.25,
            lane: 0.25,
            headway: 0.20,
            smooth: 0.15,
            compliance: 0.15,
        }
    }
}

impl ScoreWeights {
    /// Sum of all weights.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.speeding + self.lane + self.headway + self.smooth + self.compliance
    }

    /// Check that every weight is a finite non-negative number.
    ///
    /// The total is deliberately not checked.
    ///
    /// # Errors
    ///
    /// Returns [`CoachError::InvalidConfiguration`] naming the first bad weight.
    pub fn validate(&self) -> CoachResult<()> {
        let weights = [
            ("speeding", self.speeding),
            ("lane", self.lane),
            ("headway", self.headway),
            ("smooth", self.smooth),
            ("compliance", self.compliance),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(CoachError::invalid_configuration(format!(
                    "weight {name} must be a finite non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Complete per-session configuration as stored on disk.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CoachConfig {
    /// Cue thresholds and timing.
    pub cues: CueConfig,
    /// Score weights.
    pub weights: ScoreWeights,
}

impl CoachConfig {
    /// Parse a YAML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid YAML for this schema.
    pub fn from_yaml_str(source: &str) -> CoachResult<Self> {
        Ok(serde_yaml::from_str(source)?)
    }

    /// Parse a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid JSON for this schema.
    pub fn from_json_str(source: &str) -> CoachResult<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// Load a configuration file, choosing the parser by extension
    /// (`.yaml`, `.yml` or `.json`).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, has an unknown extension,
    /// or does not parse.
    pub fn load(path: impl AsRef<Path>) -> CoachResult<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let config = match extension.as_str() {
            "yaml" | "yml" => Self::from_yaml_str(&std::fs::read_to_string(path)?)?,
            "json" => Self::from_json_str(&std::fs::read_to_string(path)?)?,
            _ => return Err(CoachError::UnsupportedFormat(path.display().to_string())),
        };
        tracing::debug!(path = %path.display(), "Loaded coach configuration");
        Ok(config)
    }

    /// Render as YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml_string(&self) -> CoachResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Validate both halves of the configuration.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure.
    pub fn validate(&self) -> CoachResult<()> {
        self.cues.validate()?;
        self.weights.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn test_defaults_are_valid() -> TestResult {
        CueConfig::default().validate()?;
        ScoreWeights::default().validate()?;
        assert!((ScoreWeights::default().total() - 1.0).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_inverted_speed_band_rejected() {
        let result = CueConfig::builder().speed_margins(1.0, 2.0).build();
        assert!(matches!(result, Err(CoachError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_empty_lane_band_rejected() {
        let result = CueConfig::builder().lane_offsets(0.3, 0.3).build();
        assert!(matches!(result, Err(CoachError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_ttc_band_direction() {
        assert!(CueConfig::builder().ttc(1.6, 1.9).build().is_ok());
        assert!(CueConfig::builder().ttc(1.9, 1.6).build().is_err());
    }

    #[test]
    fn test_alpha_bounds() {
        assert!(CueConfig::builder().level_ema_alpha(1.0).build().is_ok());
        assert!(CueConfig::builder().level_ema_alpha(0.0).build().is_err());
        assert!(CueConfig::builder().level_ema_alpha(f64::NAN).build().is_err());
    }

    #[test]
    fn test_negative_duration_rejected() {
        assert!(CueConfig::builder().cooldown_s(-1.0).build().is_err());
        assert!(CueConfig::builder().min_display_s(f64::INFINITY).build().is_err());
    }

    #[test]
    fn test_zero_display_slots_rejected() {
        assert!(CueConfig::builder().max_concurrent_cues(0).build().is_err());
    }

    #[test]
    fn test_weights_reject_negative() {
        let weights = ScoreWeights {
            lane: -0.1,
            ..ScoreWeights::default()
        };
        assert!(weights.validate().is_err());
    }

    #[test]
    fn test_weights_total_not_enforced() -> TestResult {
        let weights = ScoreWeights {
            speeding: 1.0,
            ..ScoreWeights::default()
        };
        weights.validate()?;
        assert!(weights.total() > 1.0);
        Ok(())
    }

    #[test]
    fn test_partial_yaml_falls_back_to_defaults() -> TestResult {
        let config = CoachConfig::from_yaml_str("cues:\n  min_display_s: 2.5\n")?;
        assert!((config.cues.min_display_s - 2.5).abs() < 1e-12);
        assert!((config.cues.cue_cooldown_s - 1.5).abs() < 1e-12);
        assert_eq!(config.weights, ScoreWeights::default());
        Ok(())
    }

    #[test]
    fn test_json_weights() -> TestResult {
        let config = CoachConfig::from_json_str(r#"{"weights": {"speeding": 0.5}}"#)?;
        assert!((config.weights.speeding - 0.5).abs() < 1e-12);
        assert!((config.weights.lane - 0.25).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn test_yaml_round_trip_preserves_config() -> TestResult {
        let original = CoachConfig::default();
        let yaml = original.to_yaml_string()?;
        assert_eq!(CoachConfig::from_yaml_str(&yaml)?, original);
        Ok(())
    }

    #[test]
    fn test_load_by_extension() -> TestResult {
        let dir = tempfile::tempdir()?;

        let yaml_path = dir.path().join("coach.yml");
        std::fs::write(&yaml_path, "cues:\n  max_concurrent_cues: 3\n")?;
        assert_eq!(CoachConfig::load(&yaml_path)?.cues.max_concurrent_cues, 3);

        let toml_path = dir.path().join("coach.toml");
        std::fs::write(&toml_path, "")?;
        assert!(matches!(
            CoachConfig::load(&toml_path),
            Err(CoachError::UnsupportedFormat(_))
        ));
        Ok(())
    }
}
