//! Speech Synchronization
//!
//! Keeps the voice engine in lockstep with the request lifecycle: exactly
//! one utterance per distinct successful response, immediate cancellation
//! when a new request starts, and a speaking flag that only the engine's
//! completion event (or the cancel path) can clear.
//!
//! # Guards
//!
//! - `last_spoken` equality prevents re-speaking the same response on
//!   repeated evaluations with unchanged state.
//! - The utterance event receiver is dropped on cancel, so a completion
//!   from a superseded utterance can never clear a later utterance's flag.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

use crate::lifecycle::RequestState;
use crate::tts::{TtsEngine, UtteranceEvent};

/// Derived speech state, readable by the rendering layer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpeechState {
    /// The most recent successful response that has triggered playback.
    pub last_spoken: Option<String>,
    /// Whether an utterance started by this component is active.
    pub speaking: bool,
}

/// Drives the voice engine from request-state transitions.
pub struct SpeechSynchronizer<T: TtsEngine> {
    /// The voice engine collaborator.
    engine: Arc<T>,
    /// Fixed locale tag handed to every utterance.
    locale: String,
    /// Derived speech state.
    state: SpeechState,
    /// Event channel of the active utterance.
    utterance_rx: Option<mpsc::Receiver<UtteranceEvent>>,
}

impl<T: TtsEngine> SpeechSynchronizer<T> {
    /// Create a synchronizer speaking through `engine` in `locale`.
    pub fn new(engine: Arc<T>, locale: impl Into<String>) -> Self {
        Self {
            engine,
            locale: locale.into(),
            state: SpeechState::default(),
            utterance_rx: None,
        }
    }

    /// Whether an utterance is active.
    #[must_use]
    pub fn is_speaking(&self) -> bool {
        self.state.speaking
    }

    /// The most recent response that triggered playback.
    #[must_use]
    pub fn last_spoken(&self) -> Option<&str> {
        self.state.last_spoken.as_deref()
    }

    /// A copy of the derived speech state.
    #[must_use]
    pub fn state(&self) -> SpeechState {
        self.state.clone()
    }

    /// Run the synchronization state machine against the current request
    /// state. Safe to call every tick; unchanged state never re-triggers.
    pub async fn observe(&mut self, request: &RequestState) {
        if request.is_pending() {
            // A new cycle must never let a previous response be heard.
            self.cancel_active().await;
            self.state.last_spoken = None;
            return;
        }

        if let RequestState::Succeeded(text) = request {
            if self.state.last_spoken.as_deref() != Some(text.as_str()) {
                self.begin_utterance(text).await;
            }
        }
    }

    /// Drain utterance events. The engine's completion event is the only
    /// signal that clears `speaking` outside the cancel-on-pending path.
    pub fn poll(&mut self) {
        let Some(rx) = self.utterance_rx.as_mut() else {
            return;
        };

        match rx.try_recv() {
            Ok(UtteranceEvent::Finished) => {
                self.state.speaking = false;
                self.utterance_rx = None;
            }
            Ok(UtteranceEvent::Cancelled) => {
                // The cancel path already cleared the flag.
                self.utterance_rx = None;
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                // Engine task died; don't leave the flag stuck.
                self.state.speaking = false;
                self.utterance_rx = None;
            }
        }
    }

    async fn begin_utterance(&mut self, text: &str) {
        if !self.engine.available().await {
            // Degrade silently: no utterance, no user-visible error.
            return;
        }

        match self.engine.speak(text, &self.locale).await {
            Ok(rx) => {
                self.utterance_rx = Some(rx);
                self.state.speaking = true;
            }
            Err(error) => {
                tracing::warn!(
                    engine = self.engine.name(),
                    error = %error,
                    "Speech engine refused utterance"
                );
                self.state.speaking = false;
            }
        }

        // Mark the response as handled either way so a refusal is not
        // retried on every subsequent evaluation.
        self.state.last_spoken = Some(text.to_string());
    }

    async fn cancel_active(&mut self) {
        if self.state.speaking || self.utterance_rx.is_some() {
            self.engine.cancel().await;
        }
        self.utterance_rx = None;
        self.state.speaking = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    /// Engine that records utterances and lets the test finish them.
    #[derive(Default)]
    struct RecordingTts {
        spoken: Mutex<Vec<String>>,
        cancels: AtomicUsize,
        finish: Mutex<Option<mpsc::Sender<UtteranceEvent>>>,
    }

    impl RecordingTts {
        fn spoken(&self) -> Vec<String> {
            self.spoken.lock().unwrap().clone()
        }

        fn cancel_count(&self) -> usize {
            self.cancels.load(Ordering::SeqCst)
        }

        async fn finish_active(&self) {
            let sender = self.finish.lock().unwrap().clone();
            if let Some(tx) = sender {
                let _ = tx.send(UtteranceEvent::Finished).await;
            }
        }
    }

    #[async_trait]
    impl TtsEngine for RecordingTts {
        fn name(&self) -> &'static str {
            "recording"
        }

        async fn available(&self) -> bool {
            true
        }

        async fn speak(
            &self,
            text: &str,
            _locale: &str,
        ) -> anyhow::Result<mpsc::Receiver<UtteranceEvent>> {
            self.spoken.lock().unwrap().push(text.to_string());
            let (tx, rx) = mpsc::channel(1);
            *self.finish.lock().unwrap() = Some(tx);
            Ok(rx)
        }

        async fn cancel(&self) {
            self.cancels.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn synchronizer(engine: Arc<RecordingTts>) -> SpeechSynchronizer<RecordingTts> {
        SpeechSynchronizer::new(engine, "en-US")
    }

    #[tokio::test]
    async fn test_success_triggers_exactly_one_utterance() {
        let engine = Arc::new(RecordingTts::default());
        let mut sync = synchronizer(engine.clone());

        let state = RequestState::Succeeded("hi there".to_string());
        sync.observe(&state).await;
        sync.observe(&state).await;
        sync.observe(&state).await;

        assert_eq!(engine.spoken(), vec!["hi there".to_string()]);
        assert!(sync.is_speaking());
    }

    #[tokio::test]
    async fn test_distinct_responses_each_speak_once() {
        let engine = Arc::new(RecordingTts::default());
        let mut sync = synchronizer(engine.clone());

        sync.observe(&RequestState::Succeeded("A".to_string())).await;
        sync.observe(&RequestState::Pending).await;
        sync.observe(&RequestState::Succeeded("B".to_string())).await;

        assert_eq!(engine.spoken(), vec!["A".to_string(), "B".to_string()]);
        // The pending phase between them cancelled A.
        assert_eq!(engine.cancel_count(), 1);
    }

    #[tokio::test]
    async fn test_pending_cancels_and_clears() {
        let engine = Arc::new(RecordingTts::default());
        let mut sync = synchronizer(engine.clone());

        sync.observe(&RequestState::Succeeded("A".to_string())).await;
        assert!(sync.is_speaking());

        sync.observe(&RequestState::Pending).await;
        assert!(!sync.is_speaking());
        assert_eq!(sync.last_spoken(), None);
        assert_eq!(engine.cancel_count(), 1);

        // Re-observing Pending does not cancel again.
        sync.observe(&RequestState::Pending).await;
        assert_eq!(engine.cancel_count(), 1);
    }

    #[tokio::test]
    async fn test_completion_clears_speaking() {
        let engine = Arc::new(RecordingTts::default());
        let mut sync = synchronizer(engine.clone());

        sync.observe(&RequestState::Succeeded("hi there".to_string()))
            .await;
        assert!(sync.is_speaking());

        engine.finish_active().await;
        sync.poll();

        assert!(!sync.is_speaking());
        // The guard still remembers the text: no re-trigger after finishing.
        sync.observe(&RequestState::Succeeded("hi there".to_string()))
            .await;
        assert_eq!(engine.spoken().len(), 1);
    }

    #[tokio::test]
    async fn test_stale_completion_cannot_clear_new_utterance() {
        let engine = Arc::new(RecordingTts::default());
        let mut sync = synchronizer(engine.clone());

        sync.observe(&RequestState::Succeeded("A".to_string())).await;
        let stale = engine.finish.lock().unwrap().clone();

        sync.observe(&RequestState::Pending).await;
        sync.observe(&RequestState::Succeeded("B".to_string())).await;
        assert!(sync.is_speaking());

        // The superseded utterance finishing must not touch B's flag; its
        // receiver was dropped on cancel.
        if let Some(tx) = stale {
            let _ = tx.send(UtteranceEvent::Finished).await;
        }
        sync.poll();
        assert!(sync.is_speaking());
    }

    #[tokio::test]
    async fn test_unavailable_engine_degrades_silently() {
        let engine = Arc::new(crate::tts::NullTts);
        let mut sync = SpeechSynchronizer::new(engine, "en-US");

        sync.observe(&RequestState::Succeeded("hi".to_string())).await;
        assert!(!sync.is_speaking());
        sync.poll();
        assert!(!sync.is_speaking());
    }

    #[tokio::test]
    async fn test_failed_and_idle_states_never_speak() {
        let engine = Arc::new(RecordingTts::default());
        let mut sync = synchronizer(engine.clone());

        sync.observe(&RequestState::Idle).await;
        sync.observe(&RequestState::Failed("nope".to_string())).await;
        assert!(engine.spoken().is_empty());
        assert!(!sync.is_speaking());
    }
}
