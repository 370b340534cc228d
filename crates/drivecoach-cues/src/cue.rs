//! Closed cue vocabulary and the live cue registry.
//!
//! The registry keeps two tables keyed by [`CueName`]: the time each cue was
//! last emitted (for cooldown) and the currently active entries. Both are
//! fixed-size, so there is no such thing as an unknown cue.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

use crate::config::CueConfig;

/// The five coaching cues the engine can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CueName {
    /// Vehicle is over the speed limit.
    SlowDown,
    /// Vehicle has drifted from lane centre.
    KeepLane,
    /// Time-to-collision with the lead vehicle is short.
    IncreaseHeadway,
    /// Brake pedal was applied abruptly.
    SmootherBrake,
    /// Moving through a stop zone on red.
    BrakeNow,
}

impl CueName {
    /// Every cue, in declaration order.
    pub const ALL: [CueName; 5] = [
        CueName::SlowDown,
        CueName::KeepLane,
        CueName::IncreaseHeadway,
        CueName::SmootherBrake,
        CueName::BrakeNow,
    ];

    /// Position of this cue in [`CueName::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            CueName::SlowDown => 0,
            CueName::KeepLane => 1,
            CueName::IncreaseHeadway => 2,
            CueName::SmootherBrake => 3,
            CueName::BrakeNow => 4,
        }
    }

    /// Wire name, e.g. `SLOW_DOWN`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            CueName::SlowDown => "SLOW_DOWN",
            CueName::KeepLane => "KEEP_LANE",
            CueName::IncreaseHeadway => "INCREASE_HEADWAY",
            CueName::SmootherBrake => "SMOOTHER_BRAKE",
            CueName::BrakeNow => "BRAKE_NOW",
        }
    }
}

impl fmt::Display for CueName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value per cue.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CueTable<T> {
    slow_down: T,
    keep_lane: T,
    increase_headway: T,
    smoother_brake: T,
    brake_now: T,
}

impl<T> CueTable<T> {
    /// Build a table by evaluating `f` for every cue.
    pub fn from_fn(mut f: impl FnMut(CueName) -> T) -> Self {
        Self {
            slow_down: f(CueName::SlowDown),
            keep_lane: f(CueName::KeepLane),
            increase_headway: f(CueName::IncreaseHeadway),
            smoother_brake: f(CueName::SmootherBrake),
            brake_now: f(CueName::BrakeNow),
        }
    }

    /// Iterate `(name, value)` pairs in [`CueName::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (CueName, &T)> {
        CueName::ALL.into_iter().map(move |name| (name, &self[name]))
    }
}

impl<T> Index<CueName> for CueTable<T> {
    type Output = T;

    fn index(&self, name: CueName) -> &T {
        match name {
            CueName::SlowDown => &self.slow_down,
            CueName::KeepLane => &self.keep_lane,
            CueName::IncreaseHeadway => &self.increase_headway,
            CueName::SmootherBrake => &self.smoother_brake,
            CueName::BrakeNow => &self.brake_now,
        }
    }
}

impl<T> IndexMut<CueName> for CueTable<T> {
    fn index_mut(&mut self, name: CueName) -> &mut T {
        match name {
            CueName::SlowDown => &mut self.slow_down,
            CueName::KeepLane => &mut self.keep_lane,
            CueName::IncreaseHeadway => &mut self.increase_headway,
            CueName::SmootherBrake => &mut self.smoother_brake,
            CueName::BrakeNow => &mut self.brake_now,
        }
    }
}

/// Clamp to `[0, 1]`. NaN maps to 0.
#[must_use]
pub fn clamp01(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// A cue currently on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveCue {
    /// Which cue.
    pub name: CueName,
    /// Smoothed severity in `[0, 1]`.
    pub level: f64,
    /// Clock time at which the cue expires.
    pub until: f64,
}

impl ActiveCue {
    /// Whether the cue is still visible at `now`.
    #[must_use]
    pub fn is_live(&self, now: f64) -> bool {
        self.until > now
    }
}

/// Result of [`CueRegistry::activate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// A new entry was created.
    Created,
    /// An existing entry was smoothed and extended.
    Refreshed,
    /// The cue is cooling down; nothing changed.
    Suppressed,
}

/// Live cue bookkeeping for one session.
#[derive(Debug, Clone, Default)]
pub struct CueRegistry {
    last_emit: CueTable<Option<f64>>,
    active: CueTable<Option<ActiveCue>>,
}

impl CueRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise `name` at severity `level`.
    ///
    /// A live entry is blended with the incoming level and held for at least
    /// `min_display_s` from `now`. A missing or expired entry is created
    /// unless the cue was emitted less than `cue_cooldown_s` ago.
    pub fn activate(&mut self, name: CueName, level: f64, now: f64, config: &CueConfig) -> Activation {
        let incoming = clamp01(level);
        let display_until = now + config.min_display_s;

        if let Some(cue) = self.active[name].as_mut().filter(|cue| cue.is_live(now)) {
            let alpha = config.level_ema_alpha;
            cue.level = clamp01(alpha * incoming + (1.0 - alpha) * cue.level);
            cue.until = cue.until.max(display_until);
            self.last_emit[name] = Some(now);
            return Activation::Refreshed;
        }

        if let Some(last) = self.last_emit[name]
            && now - last < config.cue_cooldown_s
        {
            tracing::trace!(cue = %name, since_last_s = now - last, "Cue activation suppressed by cooldown");
            return Activation::Suppressed;
        }

        self.active[name] = Some(ActiveCue {
            name,
            level: incoming,
            until: display_until,
        });
        self.last_emit[name] = Some(now);
        tracing::debug!(cue = %name, level = incoming, until = display_until, "Cue activated");
        Activation::Created
    }

    /// Push a live cue's expiry out to at least `now + extra_s`.
    ///
    /// Never creates an entry. Returns whether a live cue was extended.
    pub fn extend_if_active(&mut self, name: CueName, extra_s: f64, now: f64) -> bool {
        match self.active[name].as_mut().filter(|cue| cue.is_live(now)) {
            Some(cue) => {
                cue.until = cue.until.max(now + extra_s);
                true
            }
            None => false,
        }
    }

    /// Drop every entry whose expiry is at or before `now`.
    pub fn prune(&mut self, now: f64) {
        for name in CueName::ALL {
            if self.active[name].is_some_and(|cue| !cue.is_live(now)) {
                self.active[name] = None;
                tracing::trace!(cue = %name, "Cue expired");
            }
        }
    }

    /// The entry for `name`, if one is stored.
    ///
    /// May return an entry that has expired but not been pruned yet.
    #[must_use]
    pub fn get(&self, name: CueName) -> Option<&ActiveCue> {
        self.active[name].as_ref()
    }

    /// Entries that are live at `now`.
    pub fn iter_active(&self, now: f64) -> impl Iterator<Item = &ActiveCue> {
        self.active
            .iter()
            .filter_map(|(_, cue)| cue.as_ref())
            .filter(move |cue| cue.is_live(now))
    }

    /// When `name` was last created or refreshed.
    #[must_use]
    pub fn last_emitted(&self, name: CueName) -> Option<f64> {
        self.last_emit[name]
    }
}
