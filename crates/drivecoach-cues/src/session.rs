//! Many concurrent sessions, one engine each.
//!
//! Sessions are looked up under a shared read lock and then serialised on
//! their own mutex, so updates to distinct sessions never wait on each other.

use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

use crate::clock::{Clock, MonotonicClock};
use crate::config::{CueConfig, ScoreWeights};
use crate::display::DisplayCue;
use crate::engine::{CueEngine, CueEvent};
use crate::error::{CoachError, CoachResult};
use crate::sample::TelemetrySample;
use crate::score::Scorecard;

type SharedEngine<C> = Arc<Mutex<CueEngine<C>>>;

/// Keyed collection of live sessions sharing one configuration and clock.
#[derive(Debug)]
pub struct SessionRegistry<C: Clock + Clone = MonotonicClock> {
    config: CueConfig,
    weights: ScoreWeights,
    clock: C,
    sessions: RwLock<HashMap<String, SharedEngine<C>>>,
}

impl SessionRegistry<MonotonicClock> {
    /// Create a registry on the process monotonic clock.
    #[must_use]
    pub fn new(config: CueConfig, weights: ScoreWeights) -> Self {
        Self::with_clock(config, weights, MonotonicClock::new())
    }
}

impl<C: Clock + Clone> SessionRegistry<C> {
    /// Create a registry whose sessions all read `clock`.
    #[must_use]
    pub fn with_clock(config: CueConfig, weights: ScoreWeights, clock: C) -> Self {
        Self {
            config,
            weights,
            clock,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Start a new session.
    ///
    /// # Errors
    ///
    /// Returns [`CoachError::SessionAlreadyOpen`] if `session_id` is in use.
    pub fn open(&self, session_id: &str) -> CoachResult<()> {
        let mut sessions = self.sessions.write();
        if sessions.contains_key(session_id) {
            return Err(CoachError::session_already_open(session_id));
        }
        let engine = CueEngine::with_clock(self.config.clone(), self.weights, self.clock.clone());
        sessions.insert(session_id.to_string(), Arc::new(Mutex::new(engine)));
        tracing::info!(session_id, active_sessions = sessions.len(), "Session opened");
        Ok(())
    }

    fn session(&self, session_id: &str) -> CoachResult<SharedEngine<C>> {
        self.sessions
            .read()
            .get(session_id)
            .cloned()
            .ok_or_else(|| CoachError::session_not_found(session_id))
    }

    /// Feed one sample to a session.
    ///
    /// # Errors
    ///
    /// Returns [`CoachError::SessionNotFound`] for an unknown session.
    pub fn update(
        &self,
        session_id: &str,
        sample: &TelemetrySample,
        lead_ttc_s: Option<f64>,
    ) -> CoachResult<Vec<CueEvent>> {
        let engine = self.session(session_id)?;
        let events = engine.lock().update(sample, lead_ttc_s);
        Ok(events)
    }

    /// Current display cues for a session.
    ///
    /// # Errors
    ///
    /// Returns [`CoachError::SessionNotFound`] for an unknown session.
    pub fn display_cues(&self, session_id: &str) -> CoachResult<Vec<DisplayCue>> {
        let engine = self.session(session_id)?;
        let cues = engine.lock().display_cues();
        Ok(cues)
    }

    /// End a session, removing it and returning its scorecard.
    ///
    /// # Errors
    ///
    /// Returns [`CoachError::SessionNotFound`] for an unknown session.
    pub fn finalize(&self, session_id: &str) -> CoachResult<Scorecard> {
        let engine = self
            .sessions
            .write()
            .remove(session_id)
            .ok_or_else(|| CoachError::session_not_found(session_id))?;

        // An update racing with removal may still hold a clone; score
        // whatever it has applied once it lets go.
        let card = match Arc::try_unwrap(engine) {
            Ok(mutex) => mutex.into_inner().finalize(),
            Err(shared) => shared.lock().scorecard(),
        };
        tracing::info!(session_id, final_score = card.final_score, "Session closed");
        Ok(card)
    }

    /// Whether `session_id` is open.
    #[must_use]
    pub fn contains(&self, session_id: &str) -> bool {
        self.sessions.read().contains_key(session_id)
    }

    /// Number of open sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    /// Whether no sessions are open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    /// Identifiers of open sessions, sorted.
    #[must_use]
    pub fn session_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.sessions.read().keys().cloned().collect();
        ids.sort();
        ids
    }
}
