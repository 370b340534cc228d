//! One tokio task per session.
//!
//! The task owns its [`CueEngine`] outright; callers talk to it through a
//! [`SessionHandle`] that sends commands over a bounded channel and awaits a
//! oneshot reply. Samples for one session are therefore applied strictly in
//! the order their commands were sent.

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::clock::Clock;
use crate::display::DisplayCue;
use crate::engine::{CueEngine, CueEvent};
use crate::error::{CoachError, CoachResult};
use crate::sample::TelemetrySample;
use crate::score::Scorecard;

/// Commands queued per session before senders wait.
const COMMAND_QUEUE_DEPTH: usize = 64;

/// Commands accepted by the session task.
#[derive(Debug)]
enum SessionCommand {
    Update {
        sample: TelemetrySample,
        lead_ttc_s: Option<f64>,
        response: oneshot::Sender<Vec<CueEvent>>,
    },
    DisplayCues {
        response: oneshot::Sender<Vec<DisplayCue>>,
    },
    Finalize {
        response: oneshot::Sender<Scorecard>,
    },
}

/// Cloneable handle to a running session task.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    session_id: String,
    command_tx: mpsc::Sender<SessionCommand>,
}

/// Spawn a task that owns `engine` and serves commands until finalized or
/// until every handle is dropped.
///
/// Must be called from within a tokio runtime.
pub fn spawn_session<C>(session_id: impl Into<String>, engine: CueEngine<C>) -> (SessionHandle, JoinHandle<()>)
where
    C: Clock + 'static,
{
    let session_id = session_id.into();
    let (command_tx, command_rx) = mpsc::channel(COMMAND_QUEUE_DEPTH);
    let task = tokio::spawn(run_session(session_id.clone(), engine, command_rx));
    tracing::debug!(session_id = %session_id, "Session task spawned");
    (
        SessionHandle {
            session_id,
            command_tx,
        },
        task,
    )
}

async fn run_session<C: Clock>(
    session_id: String,
    mut engine: CueEngine<C>,
    mut command_rx: mpsc::Receiver<SessionCommand>,
) {
    while let Some(command) = command_rx.recv().await {
        match command {
            SessionCommand::Update {
                sample,
                lead_ttc_s,
                response,
            } => {
                let events = engine.update(&sample, lead_ttc_s);
                if response.send(events).is_err() {
                    tracing::trace!(session_id = %session_id, "Update reply dropped by caller");
                }
            }
            SessionCommand::DisplayCues { response } => {
                if response.send(engine.display_cues()).is_err() {
                    tracing::trace!(session_id = %session_id, "Display reply dropped by caller");
                }
            }
            SessionCommand::Finalize { response } => {
                let card = engine.finalize();
                if response.send(card).is_err() {
                    tracing::warn!(session_id = %session_id, "Scorecard reply dropped by caller");
                }
                tracing::debug!(session_id = %session_id, "Session task finished");
                return;
            }
        }
    }
    tracing::debug!(
        session_id = %session_id,
        samples = engine.samples_processed(),
        "All session handles dropped without finalize"
    );
}

impl SessionHandle {
    /// The session this handle talks to.
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> SessionCommand) -> CoachResult<T> {
        let (response_tx, response_rx) = oneshot::channel();
        self.command_tx
            .send(build(response_tx))
            .await
            .map_err(|err| self.closed(&err))?;
        response_rx.await.map_err(|err| self.closed(&err))
    }

    fn closed(&self, cause: &dyn std::fmt::Display) -> CoachError {
        tracing::debug!(session_id = %self.session_id, %cause, "Session task unreachable");
        CoachError::session_closed(&self.session_id)
    }

    /// Apply one sample.
    ///
    /// # Errors
    ///
    /// Returns [`CoachError::SessionClosed`] if the session task has ended.
    pub async fn update(&self, sample: TelemetrySample, lead_ttc_s: Option<f64>) -> CoachResult<Vec<CueEvent>> {
        self.request(|response| SessionCommand::Update {
            sample,
            lead_ttc_s,
            response,
        })
        .await
    }

    /// Current display cues.
    ///
    /// # Errors
    ///
    /// Returns [`CoachError::SessionClosed`] if the session task has ended.
    pub async fn display_cues(&self) -> CoachResult<Vec<DisplayCue>> {
        self.request(|response| SessionCommand::DisplayCues { response })
            .await
    }

    /// End the session. The task exits after replying.
    ///
    /// # Errors
    ///
    /// Returns [`CoachError::SessionClosed`] if the session was already
    /// finalized through another handle.
    pub async fn finalize(self) -> CoachResult<Scorecard> {
        self.request(|response| SessionCommand::Finalize { response })
            .await
    }
}
