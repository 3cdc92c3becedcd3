//! Request controller — one generation request at a time, tied to view state.
//!
//! DESIGN
//! ======
//! `submit` validates input, moves the state to `Pending`, tags the call with
//! a fresh request id, and spawns a task that awaits the generation client.
//! When the call settles the task reports back through `settle`, which drops
//! the outcome unless its id is still the most recently issued one. A slow
//! superseded call can therefore never overwrite a newer result.
//!
//! State lives behind a `std::sync::Mutex` (never held across an await) and
//! every transition is published to a `watch` channel so the view can
//! re-render without polling.
//!
//! Under [`SubmitPolicy::Supersede`] the superseded call is left to run to
//! completion; its outcome is discarded by the id guard.
//!
//! A task that panics inside the client still settles its request, as a
//! failure, so the loading flag cannot outlive the task.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tokio::task::AbortHandle;
use tracing::{debug, info, warn};

use crate::llm::{GenerationClient, GenerationConfig, LlmError};
use crate::state::RequestState;

/// Monotonically increasing identifier assigned to each accepted submission.
pub type RequestId = u64;

// =============================================================================
// CONFIG
// =============================================================================

/// What happens when a submission arrives while a request is still pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitPolicy {
    /// Refuse the new submission; the pending request keeps ownership.
    #[default]
    RejectWhileBusy,
    /// Accept the new submission; the pending request's outcome is discarded.
    Supersede,
}

/// Explicit controller configuration, built once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControllerConfig {
    pub generation: GenerationConfig,
    pub policy: SubmitPolicy,
}

// =============================================================================
// ERRORS
// =============================================================================

/// Why a submission was refused. The state is untouched in every case.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("Please enter a description")]
    EmptyInput,
    #[error("request {pending} is still loading")]
    Busy { pending: RequestId },
}

// =============================================================================
// CONTROLLER
// =============================================================================

pub struct RequestController {
    shared: Arc<Shared>,
}

struct Shared {
    client: Arc<dyn GenerationClient>,
    config: ControllerConfig,
    inner: Mutex<Inner>,
    state_tx: watch::Sender<RequestState>,
}

struct Inner {
    state: RequestState,
    /// Id of the most recently accepted submission; 0 before the first one.
    latest: RequestId,
    /// Spawned generation tasks that may still be running.
    tasks: Vec<AbortHandle>,
}

impl RequestController {
    /// Create a controller in the `Idle` phase.
    #[must_use]
    pub fn new(client: Arc<dyn GenerationClient>, config: ControllerConfig) -> Self {
        let (state_tx, _) = watch::channel(RequestState::default());
        let inner = Inner { state: RequestState::default(), latest: 0, tasks: Vec::new() };
        Self { shared: Arc::new(Shared { client, config, inner: Mutex::new(inner), state_tx }) }
    }

    /// Submit `text` for generation.
    ///
    /// `text` is forwarded verbatim; it only has to contain something other
    /// than whitespace. Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// [`SubmitError::EmptyInput`] for blank input, [`SubmitError::Busy`]
    /// when a request is pending under [`SubmitPolicy::RejectWhileBusy`].
    pub fn submit(&self, text: &str) -> Result<RequestId, SubmitError> {
        if text.trim().is_empty() {
            return Err(SubmitError::EmptyInput);
        }

        let mut inner = self.shared.lock();
        if inner.state.is_loading() {
            match self.shared.config.policy {
                SubmitPolicy::RejectWhileBusy => {
                    debug!(pending = inner.latest, "controller: submission rejected while busy");
                    return Err(SubmitError::Busy { pending: inner.latest });
                }
                SubmitPolicy::Supersede => {
                    info!(superseded = inner.latest, "controller: pending request superseded");
                }
            }
        }

        inner.latest += 1;
        let request_id = inner.latest;
        inner.state = RequestState::pending(text.to_owned());
        self.shared.state_tx.send_replace(inner.state.clone());
        info!(request_id, prompt_len = text.len(), "controller: request submitted");

        let shared = Arc::clone(&self.shared);
        let prompt = text.to_owned();
        let handle = tokio::spawn(async move {
            let mut guard = SettleOnDrop { shared: &shared, request_id, armed: true };
            let outcome = shared
                .client
                .generate(&prompt, &shared.config.generation, &[])
                .await;
            guard.armed = false;
            shared.settle(request_id, outcome);
        });

        inner.tasks.retain(|t| !t.is_finished());
        inner.tasks.push(handle.abort_handle());
        Ok(request_id)
    }

    /// Current state snapshot.
    #[must_use]
    pub fn state(&self) -> RequestState {
        self.shared.lock().state.clone()
    }

    /// Receiver that observes every state transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RequestState> {
        self.shared.state_tx.subscribe()
    }

    /// Wait until the current request settles and return the settled state.
    ///
    /// Returns immediately when nothing is pending.
    pub async fn settled(&self) -> RequestState {
        let mut rx = self.subscribe();
        match rx.wait_for(|s| !s.is_loading()).await {
            Ok(state) => state.clone(),
            // The sender lives in `self.shared`, so it cannot close first.
            Err(_) => self.state(),
        }
    }
}

impl Drop for RequestController {
    fn drop(&mut self) {
        let tasks: Vec<AbortHandle> = self.shared.lock().tasks.drain(..).collect();
        for task in tasks {
            task.abort();
        }
    }
}

/// Settles its request as interrupted if the generation task unwinds or is
/// aborted before reaching `settle`.
struct SettleOnDrop<'a> {
    shared: &'a Shared,
    request_id: RequestId,
    armed: bool,
}

impl Drop for SettleOnDrop<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.shared.settle(self.request_id, Err(LlmError::Interrupted));
        }
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply the outcome of request `request_id`. Returns `false` when the
    /// outcome was stale and dropped.
    fn settle(&self, request_id: RequestId, outcome: Result<String, LlmError>) -> bool {
        let mut inner = self.lock();
        if request_id != inner.latest || !inner.state.is_loading() {
            debug!(request_id, latest = inner.latest, "controller: stale response discarded");
            return false;
        }

        let input = inner.state.input().to_owned();
        inner.state = match outcome {
            Ok(text) => {
                info!(request_id, response_len = text.len(), "controller: request succeeded");
                RequestState::succeeded(input, text)
            }
            Err(e) => {
                warn!(request_id, error = %e, "controller: generation failed");
                RequestState::failed(input, failure_message(&e))
            }
        };
        self.state_tx.send_replace(inner.state.clone());
        true
    }
}

/// User-facing text for a failed generation call.
fn failure_message(err: &LlmError) -> String {
    format!("Hive couldn't come up with a suggestion: {err}")
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;
