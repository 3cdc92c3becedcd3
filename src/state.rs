//! Request lifecycle state shown by the view.
//!
//! DESIGN
//! ======
//! `RequestState` is the single entity the drawer renders. It is owned by
//! the request controller; everything outside the controller only ever sees
//! cloned snapshots. Constructors below are the only way to build a state,
//! so `result` / `error_message` can never be set in the wrong phase.

use serde::Serialize;

/// Stage of the current generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed,
}

impl Phase {
    /// `true` once a request has settled, successfully or not.
    #[must_use]
    pub fn is_settled(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

/// Snapshot of the request lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RequestState {
    input: String,
    phase: Phase,
    result: Option<String>,
    error_message: Option<String>,
}

impl RequestState {
    pub(crate) fn pending(input: String) -> Self {
        Self { input, phase: Phase::Pending, result: None, error_message: None }
    }

    pub(crate) fn succeeded(input: String, text: String) -> Self {
        Self { input, phase: Phase::Succeeded, result: Some(text), error_message: None }
    }

    pub(crate) fn failed(input: String, message: String) -> Self {
        Self { input, phase: Phase::Failed, result: None, error_message: Some(message) }
    }

    /// Last submitted prompt, verbatim. Empty until the first submission.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Generated text; only present when the phase is [`Phase::Succeeded`].
    #[must_use]
    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    /// Failure message; only present when the phase is [`Phase::Failed`].
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// The loading flag the view binds its busy indicator to.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Pending
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
