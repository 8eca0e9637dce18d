//! Avatar Clip Control
//!
//! Binary start/stop control of the avatar's animation clip from the
//! loading/speaking signals. No blending, no queueing: starting always
//! stops everything first so a clean restart is guaranteed when loading
//! hands over directly into speaking.

/// Play/stop surface of the avatar's animation clips.
pub trait ClipPlayer {
    /// Clip names in a stable order.
    fn clip_names(&self) -> Vec<String>;

    /// Start a named clip from its first frame.
    fn play(&mut self, name: &str);

    /// Stop every playing clip.
    fn stop_all(&mut self);
}

/// Starts/stops the busy clip from the loading/speaking signals.
#[derive(Clone, Copy, Debug, Default)]
pub struct AnimationTrigger {
    /// The `(loading, speaking)` pair of the running clip, `None` when
    /// everything is stopped.
    active: Option<(bool, bool)>,
}

impl AnimationTrigger {
    /// Create an idle trigger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconcile the player with the current signals.
    ///
    /// Plays while `loading || speaking`, stops when both are false. Any
    /// change of the pair while active stops all clips and restarts the
    /// first one, so overlapping playback can never garble the animation.
    pub fn sync(&mut self, loading: bool, speaking: bool, player: &mut dyn ClipPlayer) {
        if loading || speaking {
            let pair = (loading, speaking);
            if self.active != Some(pair) {
                player.stop_all();
                if let Some(first) = player.clip_names().into_iter().next() {
                    player.play(&first);
                }
                self.active = Some(pair);
            }
        } else if self.active.is_some() {
            player.stop_all();
            self.active = None;
        }
    }
}

/// In-memory clip registry that records playback, for tests and surfaces
/// without a rigged model.
#[derive(Clone, Debug, Default)]
pub struct ClipDeck {
    /// Registered clip names, in registration order.
    clips: Vec<String>,
    /// Currently playing clips.
    playing: Vec<String>,
    /// Total number of `play` calls.
    starts: usize,
}

impl ClipDeck {
    /// Create an empty deck.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a clip name. Order is preserved.
    pub fn register(&mut self, name: impl Into<String>) {
        self.clips.push(name.into());
    }

    /// Whether the named clip is playing.
    #[must_use]
    pub fn is_playing(&self, name: &str) -> bool {
        self.playing.iter().any(|clip| clip == name)
    }

    /// Whether anything is playing.
    #[must_use]
    pub fn any_playing(&self) -> bool {
        !self.playing.is_empty()
    }

    /// Total number of clip starts so far.
    #[must_use]
    pub fn starts(&self) -> usize {
        self.starts
    }
}

impl ClipPlayer for ClipDeck {
    fn clip_names(&self) -> Vec<String> {
        self.clips.clone()
    }

    fn play(&mut self, name: &str) {
        self.playing.push(name.to_string());
        self.starts += 1;
    }

    fn stop_all(&mut self) {
        self.playing.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck() -> ClipDeck {
        let mut deck = ClipDeck::new();
        deck.register("Gesture");
        deck.register("Wave");
        deck
    }

    #[test]
    fn test_loading_starts_the_first_clip() {
        let mut deck = deck();
        let mut trigger = AnimationTrigger::new();

        trigger.sync(true, false, &mut deck);
        assert!(deck.is_playing("Gesture"));
        assert!(!deck.is_playing("Wave"));
    }

    #[test]
    fn test_steady_signals_do_not_restart() {
        let mut deck = deck();
        let mut trigger = AnimationTrigger::new();

        trigger.sync(true, false, &mut deck);
        trigger.sync(true, false, &mut deck);
        trigger.sync(true, false, &mut deck);
        assert_eq!(deck.starts(), 1);
    }

    #[test]
    fn test_loading_to_speaking_restarts_cleanly() {
        let mut deck = deck();
        let mut trigger = AnimationTrigger::new();

        trigger.sync(true, false, &mut deck);
        trigger.sync(false, true, &mut deck);

        // Restarted: two starts, but never two clips at once.
        assert_eq!(deck.starts(), 2);
        assert_eq!(deck.playing.len(), 1);
    }

    #[test]
    fn test_both_signals_low_stops_everything() {
        let mut deck = deck();
        let mut trigger = AnimationTrigger::new();

        trigger.sync(false, true, &mut deck);
        assert!(deck.any_playing());

        trigger.sync(false, false, &mut deck);
        assert!(!deck.any_playing());

        // Already stopped: nothing further happens.
        trigger.sync(false, false, &mut deck);
        assert_eq!(deck.starts(), 1);
    }

    #[test]
    fn test_empty_deck_is_harmless() {
        let mut deck = ClipDeck::new();
        let mut trigger = AnimationTrigger::new();
        trigger.sync(true, true, &mut deck);
        assert!(!deck.any_playing());
    }
}
