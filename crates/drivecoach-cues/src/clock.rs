//! Injectable wall clock used for cue cooldown and expiry bookkeeping.
//!
//! Sample time (`TelemetrySample::t`) drives violation tallies. Cue display
//! windows and cooldowns run on a separate clock so a presentation layer can
//! poll at its own cadence. Tests and recording replays swap in
//! [`ManualClock`] to make that second timeline deterministic.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Source of "now" in seconds on an arbitrary monotonic epoch.
pub trait Clock: Send + Sync {
    /// Current time in seconds.
    fn now_s(&self) -> f64;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now_s(&self) -> f64 {
        (**self).now_s()
    }
}

/// Process-local monotonic clock.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    epoch: Instant,
}

impl MonotonicClock {
    /// Create a clock whose epoch is the moment of construction.
    #[must_use]
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_s(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }
}

/// Manually driven clock.
///
/// Clones share the same underlying time, so a test can hold one handle and
/// move the engine's copy forward.
///
/// # Example
///
/// ```
/// use drivecoach_cues::{Clock, ManualClock};
///
/// let clock = ManualClock::new(10.0);
/// let engine_side = clock.clone();
/// clock.advance(0.5);
/// assert!((engine_side.now_s() - 10.5).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    bits: Arc<AtomicU64>,
}

impl ManualClock {
    /// Create a clock reading `start_s`.
    #[must_use]
    pub fn new(start_s: f64) -> Self {
        Self {
            bits: Arc::new(AtomicU64::new(start_s.to_bits())),
        }
    }

    /// Jump to an absolute time.
    pub fn set(&self, now_s: f64) {
        self.bits.store(now_s.to_bits(), Ordering::Release);
    }

    /// Move the clock forward by `dt_s` seconds.
    pub fn advance(&self, dt_s: f64) {
        let mut current = self.bits.load(Ordering::Acquire);
        loop {
            let next = (f64::from_bits(current) + dt_s).to_bits();
            match self.bits.compare_exchange_weak(
                current,
                next,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return,
                Err(actual) => current = actual,
            }
        }
    }
}

impl Clock for ManualClock {
    fn now_s(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Acquire))
    }
}
