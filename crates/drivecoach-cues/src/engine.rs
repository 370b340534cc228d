//! The per-session cue engine.
//!
//! [`CueEngine::update`] evaluates one sample against five hysteresis rules,
//! grows the session tallies and raises cues in the [`CueRegistry`]. Sample
//! time drives the tallies; the injected [`Clock`] drives cue expiry and
//! cooldown.

use serde::Serialize;

use crate::clock::{Clock, MonotonicClock};
use crate::config::{CueConfig, ScoreWeights};
use crate::cue::{CueName, CueRegistry, clamp01};
use crate::display::{DisplayCue, DisplayCueSelector};
use crate::sample::TelemetrySample;
use crate::score::{ScoreAggregator, Scorecard, SessionTallies};

/// Speed excess over the warn threshold that maps to full severity (m/s).
const SPEED_SEVERITY_SPAN_MPS: f64 = 5.0;
/// Lane offset beyond the warn threshold that maps to full severity (m).
const LANE_SEVERITY_SPAN_M: f64 = 0.5;
/// Any headway cue is shown at least this severe.
const HEADWAY_SEVERITY_FLOOR: f64 = 0.3;
/// Harsh-brake threshold is expressed per tenth of a second.
const HARSH_BRAKE_RATE_SCALE: f64 = 10.0;
/// Moving faster than this through a red stop zone is a violation (m/s).
const CREEP_SPEED_MPS: f64 = 0.5;

/// A cue raised immediately by [`CueEngine::update`].
///
/// No rule emits these yet; the display path goes through
/// [`CueEngine::display_cues`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CueEvent {
    /// Which cue.
    pub name: CueName,
    /// Severity in `[0, 1]`.
    pub level: f64,
}

/// Everything a session accumulates.
#[derive(Debug, Clone, Default)]
pub struct ScoringState {
    /// Violation tallies and event counters.
    pub tallies: SessionTallies,
    /// Time of the last sample with a finite timestamp.
    pub last_t: Option<f64>,
    /// Brake value of the last sample with a finite brake reading.
    pub last_brake: Option<f64>,
    /// Live cues and their cooldown bookkeeping.
    pub cues: CueRegistry,
}

/// Stateful rule evaluator for one driving session.
///
/// Not internally synchronised: one caller feeds samples in time order.
/// See [`crate::SessionRegistry`] and the session actor for hosting many
/// sessions at once.
///
/// # Example
///
/// ```
/// use drivecoach_cues::{CueConfig, CueEngine, ManualClock, ScoreWeights, TelemetrySample};
///
/// let clock = ManualClock::new(0.0);
/// let mut engine = CueEngine::with_clock(CueConfig::default(), ScoreWeights::default(), clock.clone());
///
/// for tick in 0..=30u32 {
///     let t = f64::from(tick) * 0.1;
///     clock.set(t);
///     engine.update(&TelemetrySample::new(t, 20.0, 13.4), None);
/// }
///
/// assert_eq!(engine.display_cues().len(), 1);
/// let card = engine.finalize();
/// assert!((card.subscores.speeding - 75.0).abs() < 1e-9);
/// ```
#[derive(Debug)]
pub struct CueEngine<C: Clock = MonotonicClock> {
    config: CueConfig,
    aggregator: ScoreAggregator,
    selector: DisplayCueSelector,
    clock: C,
    state: ScoringState,
    samples_processed: u64,
}

impl CueEngine<MonotonicClock> {
    /// Create an engine reading the process monotonic clock.
    #[must_use]
    pub fn new(config: CueConfig, weights: ScoreWeights) -> Self {
        Self::with_clock(config, weights, MonotonicClock::new())
    }
}

impl<C: Clock> CueEngine<C> {
    /// Create an engine with an explicit clock.
    ///
    /// The configuration is taken as given; run [`CueConfig::validate`]
    /// beforehand if it comes from an untrusted source.
    #[must_use]
    pub fn with_clock(config: CueConfig, weights: ScoreWeights, clock: C) -> Self {
        Self {
            selector: DisplayCueSelector::new(config.max_concurrent_cues),
            aggregator: ScoreAggregator::new(weights),
            config,
            clock,
            state: ScoringState::default(),
            samples_processed: 0,
        }
    }

    /// Apply one sample.
    ///
    /// The first sample only establishes the baseline. Returns the cues
    /// raised for immediate notification, currently always none.
    pub fn update(&mut self, sample: &TelemetrySample, lead_ttc_s: Option<f64>) -> Vec<CueEvent> {
        let first = self.samples_processed == 0;
        self.samples_processed = self.samples_processed.saturating_add(1);

        if first {
            self.record_previous(sample);
            return Vec::new();
        }

        let now = self.clock.now_s();
        let dt = self.elapsed_since_last(sample.t);
        self.state.tallies.total_time_s += dt;

        self.apply_speed_rule(sample, dt, now);
        if let Some(offset) = sample.lane_offset_m {
            self.apply_lane_rule(offset, dt, now);
        }
        if let Some(ttc) = lead_ttc_s {
            self.apply_headway_rule(ttc, dt, now);
        }
        self.apply_brake_rule(sample, dt, now);
        self.apply_compliance_rule(sample, now);

        if sample.collision {
            let tallies = &mut self.state.tallies;
            tallies.collisions = tallies.collisions.saturating_add(1);
            tracing::debug!(t = sample.t, collisions = tallies.collisions, "Collision recorded");
        }

        self.record_previous(sample);
        self.state.cues.prune(now);
        Vec::new()
    }

    fn elapsed_since_last(&self, t: f64) -> f64 {
        let Some(last_t) = self.state.last_t else {
            return 0.0;
        };
        if !t.is_finite() {
            return 0.0;
        }
        let dt = t - last_t;
        if dt < 0.0 {
            tracing::warn!(t, last_t, "Sample time went backwards; treating elapsed time as zero");
            return 0.0;
        }
        dt
    }

    fn record_previous(&mut self, sample: &TelemetrySample) {
        if sample.t.is_finite() {
            self.state.last_t = Some(sample.t);
        }
        if sample.brake.is_finite() {
            self.state.last_brake = Some(sample.brake);
        }
    }

    fn apply_speed_rule(&mut self, sample: &TelemetrySample, dt: f64, now: f64) {
        let warn = sample.speed_limit_mps + self.config.speed_margin_warn_mps;
        let clear = sample.speed_limit_mps + self.config.speed_margin_clear_mps;

        if sample.speed_mps > warn {
            self.state.tallies.over_speed_time_s += dt;
            let level = clamp01((sample.speed_mps - warn) / SPEED_SEVERITY_SPAN_MPS);
            self.state
                .cues
                .activate(CueName::SlowDown, level, now, &self.config);
        } else if sample.speed_mps > clear {
            self.sustain(CueName::SlowDown, now);
        }
    }

    fn apply_lane_rule(&mut self, offset_m: f64, dt: f64, now: f64) {
        let offset = offset_m.abs();
        let warn = self.config.lane_offset_warn_m;

        if offset > warn {
            self.state.tallies.out_of_lane_time_s += dt;
            let level = clamp01((offset - warn) / LANE_SEVERITY_SPAN_M);
            self.state
                .cues
                .activate(CueName::KeepLane, level, now, &self.config);
        } else if offset > self.config.lane_offset_clear_m {
            self.sustain(CueName::KeepLane, now);
        }
    }

    fn apply_headway_rule(&mut self, ttc_s: f64, dt: f64, now: f64) {
        let warn = self.config.ttc_warn_s;

        if ttc_s < warn {
            self.state.tallies.bad_headway_time_s += dt;
            let level = ((warn - ttc_s) / warn).clamp(HEADWAY_SEVERITY_FLOOR, 1.0);
            self.state
                .cues
                .activate(CueName::IncreaseHeadway, level, now, &self.config);
        } else if ttc_s < self.config.ttc_clear_s {
            self.sustain(CueName::IncreaseHeadway, now);
        }
    }

    fn apply_brake_rule(&mut self, sample: &TelemetrySample, dt: f64, now: f64) {
        let Some(last_brake) = self.state.last_brake else {
            return;
        };
        if dt <= 0.0 {
            return;
        }

        let delta = sample.brake - last_brake;
        let rate = delta / dt.max(self.config.min_harsh_brake_dt_s);
        if rate > self.config.harsh_brake_threshold * HARSH_BRAKE_RATE_SCALE {
            let tallies = &mut self.state.tallies;
            tallies.harsh_brakes = tallies.harsh_brakes.saturating_add(1);
            tracing::debug!(t = sample.t, rate, harsh_brakes = tallies.harsh_brakes, "Harsh brake detected");
            self.state
                .cues
                .activate(CueName::SmootherBrake, delta, now, &self.config);
        }
    }

    fn apply_compliance_rule(&mut self, sample: &TelemetrySample, now: f64) {
        if sample.at_red_stop_zone() && sample.speed_mps > CREEP_SPEED_MPS {
            let tallies = &mut self.state.tallies;
            tallies.red_light = tallies.red_light.saturating_add(1);
            tracing::debug!(t = sample.t, speed_mps = sample.speed_mps, "Red light violation");
            self.state
                .cues
                .activate(CueName::BrakeNow, 1.0, now, &self.config);
        }
    }

    fn sustain(&mut self, name: CueName, now: f64) {
        self.state
            .cues
            .extend_if_active(name, self.config.sustain_after_clear_s, now);
    }

    /// Cues to show right now, most severe first.
    #[must_use]
    pub fn display_cues(&self) -> Vec<DisplayCue> {
        self.display_cues_at(self.clock.now_s())
    }

    /// Cues to show at clock time `now`. Never touches the tallies.
    #[must_use]
    pub fn display_cues_at(&self, now: f64) -> Vec<DisplayCue> {
        self.selector.select(&self.state.cues, now)
    }

    /// Read-only view of the session state.
    #[must_use]
    pub fn state(&self) -> &ScoringState {
        &self.state
    }

    /// The configuration this engine was built with.
    #[must_use]
    pub fn config(&self) -> &CueConfig {
        &self.config
    }

    /// Number of samples passed to [`CueEngine::update`], baseline included.
    #[must_use]
    pub fn samples_processed(&self) -> u64 {
        self.samples_processed
    }

    /// Score the session so far without ending it.
    #[must_use]
    pub fn scorecard(&self) -> Scorecard {
        self.aggregator.aggregate(&self.state.tallies)
    }

    /// End the session and produce its scorecard.
    #[must_use]
    pub fn finalize(self) -> Scorecard {
        let card = self.scorecard();
        tracing::info!(
            final_score = card.final_score,
            grade = %card.grade(),
            total_time_s = card.total_time_s,
            samples = self.samples_processed,
            "Session finalized"
        );
        card
    }
}
