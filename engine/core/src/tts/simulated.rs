//! Simulated Speech Engine
//!
//! Paces playback by word count so the speaking flag, the avatar clip, and
//! the camera lock behave on realistic timescales without an audio stack.
//! Used by the headless surface and by timing-sensitive tests.

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot};

use super::traits::{TtsEngine, UtteranceEvent};

/// Default speaking rate, close to typical synthesis voices.
pub const DEFAULT_WORDS_PER_MINUTE: u32 = 160;

/// Speech simulator that paces playback by word count.
pub struct SimulatedTts {
    /// Speaking rate.
    words_per_minute: u32,
    /// Cancel handle for the active utterance.
    active: Mutex<Option<oneshot::Sender<()>>>,
}

impl SimulatedTts {
    /// Create a simulator speaking at `words_per_minute` (clamped to >= 1).
    #[must_use]
    pub fn new(words_per_minute: u32) -> Self {
        Self {
            words_per_minute: words_per_minute.max(1),
            active: Mutex::new(None),
        }
    }

    /// Paced duration of one utterance of `text`.
    #[must_use]
    pub fn utterance_duration(&self, text: &str) -> Duration {
        let words = text.split_whitespace().count().max(1);
        Duration::from_secs_f64(words as f64 * 60.0 / f64::from(self.words_per_minute))
    }
}

impl Default for SimulatedTts {
    fn default() -> Self {
        Self::new(DEFAULT_WORDS_PER_MINUTE)
    }
}

#[async_trait]
impl TtsEngine for SimulatedTts {
    fn name(&self) -> &'static str {
        "simulated"
    }

    async fn available(&self) -> bool {
        true
    }

    async fn speak(
        &self,
        text: &str,
        locale: &str,
    ) -> anyhow::Result<mpsc::Receiver<UtteranceEvent>> {
        let (cancel_tx, cancel_rx) = oneshot::channel();

        // A new utterance supersedes the active one.
        if let Some(previous) = self.active.lock().replace(cancel_tx) {
            let _ = previous.send(());
        }

        let duration = self.utterance_duration(text);
        tracing::debug!(
            locale,
            words_per_minute = self.words_per_minute,
            secs = duration.as_secs_f64(),
            "Starting simulated utterance"
        );

        let (tx, rx) = mpsc::channel(1);
        tokio::spawn(async move {
            tokio::select! {
                () = tokio::time::sleep(duration) => {
                    let _ = tx.send(UtteranceEvent::Finished).await;
                }
                _ = cancel_rx => {
                    let _ = tx.send(UtteranceEvent::Cancelled).await;
                }
            }
        });

        Ok(rx)
    }

    async fn cancel(&self) {
        if let Some(cancel) = self.active.lock().take() {
            let _ = cancel.send(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_scales_with_word_count() {
        let tts = SimulatedTts::new(60); // one word per second
        assert_eq!(tts.utterance_duration("one"), Duration::from_secs(1));
        assert_eq!(tts.utterance_duration("three short words"), Duration::from_secs(3));
        // Empty text still takes one word slot.
        assert_eq!(tts.utterance_duration(""), Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_utterance_finishes_after_paced_duration() {
        let tts = SimulatedTts::new(60);
        let mut rx = tts.speak("two words", "en-US").await.unwrap();
        assert_eq!(rx.recv().await, Some(UtteranceEvent::Finished));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_interrupts_playback() {
        let tts = SimulatedTts::new(1); // one word per minute: effectively forever
        let mut rx = tts.speak("a very long sentence", "en-US").await.unwrap();
        tts.cancel().await;
        assert_eq!(rx.recv().await, Some(UtteranceEvent::Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_utterance_supersedes_active_one() {
        let tts = SimulatedTts::new(1);
        let mut first = tts.speak("first", "en-US").await.unwrap();
        let mut second = tts.speak("second", "en-US").await.unwrap();
        assert_eq!(first.recv().await, Some(UtteranceEvent::Cancelled));
        assert_eq!(second.recv().await, Some(UtteranceEvent::Finished));
    }
}
