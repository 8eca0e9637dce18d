//! Request Lifecycle
//!
//! Owns the prompt string and the request/response state machine for the
//! single-turn exchange. Nothing else in the engine mutates either.
//!
//! # State Grammar
//!
//! ```text
//! Idle | Succeeded | Failed --submit()--> Pending --complete()--> Succeeded | Failed
//! ```
//!
//! A second `submit()` while `Pending` is allowed - the in-flight call is
//! not cancelled, but each submission is stamped with a monotonically
//! increasing generation and only the completion carrying the latest
//! generation is applied. Stale replies are discarded, so the state always
//! reflects the most recent submission rather than whichever network reply
//! happened to arrive last.

use crate::gateway::GatewayError;

/// Fixed user-facing failure message. Root causes go to the log sink only
/// and are never shown verbatim.
pub const FAILURE_MESSAGE: &str = "Error: Unable to get response from AI.";

/// Lifecycle of a single-turn prompt/response exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequestState {
    /// No prompt submitted yet.
    Idle,
    /// A request is in flight. Carries no payload.
    Pending,
    /// Response text received.
    Succeeded(String),
    /// Request or parse error. Carries the fixed user-facing message.
    Failed(String),
}

impl RequestState {
    /// Whether a request is in flight.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, RequestState::Pending)
    }

    /// The response text, present only after a success.
    #[must_use]
    pub fn response_text(&self) -> Option<&str> {
        match self {
            RequestState::Succeeded(text) => Some(text),
            _ => None,
        }
    }
}

/// Outcome of one gateway call, delivered back to the lifecycle.
#[derive(Debug)]
pub enum CompletionOutcome {
    /// The gateway returned response text.
    Success(String),
    /// The gateway call failed. The detail is logged, not displayed.
    Failure(GatewayError),
}

/// Controller owning the prompt and the request state machine.
#[derive(Debug)]
pub struct RequestLifecycle {
    /// Current prompt text.
    prompt: String,
    /// Current lifecycle state.
    state: RequestState,
    /// Generation of the most recent `submit()`.
    generation: u64,
}

impl RequestLifecycle {
    /// Create a lifecycle in the `Idle` state with an empty prompt.
    #[must_use]
    pub fn new() -> Self {
        Self {
            prompt: String::new(),
            state: RequestState::Idle,
            generation: 0,
        }
    }

    /// Replace the stored prompt. No validation; allowed in any state.
    pub fn set_prompt(&mut self, text: impl Into<String>) {
        self.prompt = text.into();
    }

    /// The current prompt text.
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// The current lifecycle state.
    #[must_use]
    pub fn state(&self) -> &RequestState {
        &self.state
    }

    /// Whether a request is in flight.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.state.is_pending()
    }

    /// Transition to `Pending` and stamp a new generation.
    ///
    /// The caller launches exactly one gateway call for the returned
    /// generation and reports back through [`RequestLifecycle::complete`].
    pub fn submit(&mut self) -> u64 {
        self.generation += 1;
        self.state = RequestState::Pending;
        self.generation
    }

    /// Apply a gateway completion.
    ///
    /// Completions for anything but the latest generation are discarded.
    /// Returns whether the completion was applied.
    pub fn complete(&mut self, generation: u64, outcome: CompletionOutcome) -> bool {
        if generation != self.generation {
            tracing::debug!(
                generation,
                latest = self.generation,
                "Discarding stale gateway completion"
            );
            return false;
        }

        self.state = match outcome {
            CompletionOutcome::Success(text) => RequestState::Succeeded(text),
            CompletionOutcome::Failure(error) => {
                tracing::warn!(error = %error, "Gateway request failed");
                RequestState::Failed(FAILURE_MESSAGE.to_string())
            }
        };
        true
    }
}

impl Default for RequestLifecycle {
    fn default() -> Self {
        Self::new()
    }
}
