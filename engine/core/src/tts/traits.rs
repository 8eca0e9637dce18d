//! Speech Engine Traits
//!
//! Trait seam for the speech-synthesis voice engine. The engine decides
//! *how* audio is produced; the [`SpeechSynchronizer`](crate::speech)
//! decides when playback starts and what is spoken.

use async_trait::async_trait;
use tokio::sync::mpsc;

/// Events emitted by an active utterance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UtteranceEvent {
    /// Playback reached the end of the text.
    Finished,
    /// Playback was cancelled before finishing.
    Cancelled,
}

/// A speech-synthesis engine.
#[async_trait]
pub trait TtsEngine: Send + Sync {
    /// Engine name for logs.
    fn name(&self) -> &str;

    /// Whether the engine can produce audio at all.
    async fn available(&self) -> bool;

    /// Start speaking `text` in `locale`.
    ///
    /// The returned channel delivers exactly one [`UtteranceEvent`] for this
    /// utterance. Starting a new utterance implicitly supersedes any active
    /// one.
    async fn speak(&self, text: &str, locale: &str)
        -> anyhow::Result<mpsc::Receiver<UtteranceEvent>>;

    /// Stop the active utterance immediately, if any.
    async fn cancel(&self);
}

/// Engine stand-in for platforms without speech synthesis.
///
/// Always unavailable; speaking through it is the silent-degradation path.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullTts;

#[async_trait]
impl TtsEngine for NullTts {
    fn name(&self) -> &'static str {
        "null"
    }

    async fn available(&self) -> bool {
        false
    }

    async fn speak(
        &self,
        _text: &str,
        _locale: &str,
    ) -> anyhow::Result<mpsc::Receiver<UtteranceEvent>> {
        anyhow::bail!("speech synthesis is unavailable")
    }

    async fn cancel(&self) {}
}
