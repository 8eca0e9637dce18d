//! Director
//!
//! The Director is the single owner of interaction state. It translates
//! discrete input events into component operations, drains asynchronous
//! completions once per tick, advances the continuous animations, and
//! publishes a read-only [`Snapshot`] the rendering layer redraws from.
//!
//! # Design
//!
//! - One writer per field: the lifecycle owns request state, the speech
//!   synchronizer owns the speaking flag, the rotation controller owns
//!   angles. The Director only sequences them.
//! - Asynchrony arrives as messages: the gateway call runs as a detached
//!   task whose outcome lands on an `mpsc` channel and is applied at the
//!   start of the next tick, never mid-frame.
//! - The rendering backend is a side-effect sink. Its entire input is the
//!   snapshot; it never reaches back into the engine.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;

use crate::clip::{AnimationTrigger, ClipPlayer};
use crate::config::EngineConfig;
use crate::events::InputEvent;
use crate::gateway::ResponseGateway;
use crate::layout::{AdaptiveTextLayout, TextLayout};
use crate::lifecycle::{CompletionOutcome, RequestLifecycle, RequestState};
use crate::measure::TextMeasurer;
use crate::rotation::{AxisRotationController, ButtonDynamics, RotationSnapshot};
use crate::speech::SpeechSynchronizer;
use crate::tts::TtsEngine;

/// Input placeholder shown while the prompt is empty.
pub const PLACEHOLDER: &str = "Enter your prompt here...";

/// Button label while idle.
pub const LABEL_READY: &str = "INITIATE QUERY";

/// Button label while a request is in flight.
pub const LABEL_BUSY: &str = "TRANSMITTING...";

/// Gateway completion delivered back to the tick loop.
struct Completion {
    generation: u64,
    outcome: CompletionOutcome,
}

/// Read-only view of the engine, rebuilt every tick.
#[derive(Clone, Debug)]
pub struct Snapshot {
    /// Current prompt text.
    pub prompt: String,
    /// String the input viewport displays (prompt, or the placeholder).
    pub input_text: String,
    /// Whether the placeholder is showing.
    pub placeholder: bool,
    /// Response text for the dialog panel; present only after a success.
    pub dialog_text: Option<String>,
    /// The fixed failure message, present only after a failure. Shown
    /// outside the dialog area; never carries the root cause.
    pub error_text: Option<String>,
    /// A request is in flight.
    pub loading: bool,
    /// An utterance is playing.
    pub speaking: bool,
    /// Orbit controls should be locked while the avatar is busy.
    pub camera_locked: bool,
    /// Label on the submit button.
    pub button_label: &'static str,
    /// Button rotation, frozen axes included.
    pub rotation: RotationSnapshot,
    /// Button scale multiplier.
    pub button_scale: f32,
    /// Button emissive glow intensity.
    pub button_glow: f32,
    /// Button press depth along Z.
    pub button_depth: f32,
    /// Placement of the input text.
    pub layout: TextLayout,
}

/// Orchestrator for the interaction engine.
pub struct Director<G, T>
where
    G: ResponseGateway + 'static,
    T: TtsEngine,
{
    /// The generation-service collaborator.
    gateway: Arc<G>,
    /// Prompt + request state machine.
    lifecycle: RequestLifecycle,
    /// Speech synchronization.
    speech: SpeechSynchronizer<T>,
    /// Procedural button rotation.
    rotation: AxisRotationController,
    /// Hover/press feedback glides.
    button: ButtonDynamics,
    /// Input text placement.
    layout: AdaptiveTextLayout,
    /// Avatar clip control.
    trigger: AnimationTrigger,
    /// Text-measurement collaborator.
    measurer: Box<dyn TextMeasurer>,
    /// Avatar clip collaborator.
    clips: Box<dyn ClipPlayer + Send>,
    /// Sender cloned into each gateway task.
    completions_tx: mpsc::Sender<Completion>,
    /// Completions drained at the start of each tick.
    completions_rx: mpsc::Receiver<Completion>,
    /// Engine start, for the default wall-clock tick.
    started: Instant,
    /// Whether the input surface has keyboard focus.
    focused: bool,
    /// Last telemetry emission.
    last_telemetry: Instant,
    /// Seconds between telemetry lines.
    telemetry_interval: std::time::Duration,
    /// Wrapping width handed to the measurer.
    viewport_width: f32,
}

impl<G, T> Director<G, T>
where
    G: ResponseGateway + 'static,
    T: TtsEngine,
{
    /// Create a Director wired to its collaborators.
    pub fn new(
        config: &EngineConfig,
        gateway: G,
        tts: T,
        measurer: Box<dyn TextMeasurer>,
        clips: Box<dyn ClipPlayer + Send>,
    ) -> Self {
        let (completions_tx, completions_rx) = mpsc::channel(16);

        let mut director = Self {
            gateway: Arc::new(gateway),
            lifecycle: RequestLifecycle::new(),
            speech: SpeechSynchronizer::new(Arc::new(tts), config.locale.clone()),
            rotation: AxisRotationController::new(config.axes),
            button: ButtonDynamics::new(),
            layout: AdaptiveTextLayout::new(config.viewport),
            trigger: AnimationTrigger::new(),
            measurer,
            clips,
            completions_tx,
            completions_rx,
            started: Instant::now(),
            focused: false,
            last_telemetry: Instant::now(),
            telemetry_interval: config.telemetry_interval(),
            viewport_width: config.viewport.width,
        };
        director.refresh_layout();
        director
    }

    /// Handle one discrete input event.
    pub async fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::Char(c) => {
                if self.editing_allowed() {
                    let mut prompt = self.lifecycle.prompt().to_string();
                    prompt.push(c);
                    self.lifecycle.set_prompt(prompt);
                    self.refresh_layout();
                }
            }
            InputEvent::Backspace => {
                if self.editing_allowed() {
                    let mut prompt = self.lifecycle.prompt().to_string();
                    prompt.pop();
                    self.lifecycle.set_prompt(prompt);
                    self.refresh_layout();
                }
            }
            InputEvent::Submit => self.submit().await,
            InputEvent::FocusChanged(focused) => self.focused = focused,
            InputEvent::HoverChanged(hovered) => self.button.set_hovered(hovered),
            InputEvent::PressChanged(pressed) => self.button.set_pressed(pressed),
            InputEvent::AxisToggle(axis) => {
                let paused = self.rotation.toggle(axis);
                tracing::info!(?axis, paused, "Axis pause toggled");
            }
        }
    }

    /// Transition to `Pending` and launch the gateway call as a detached
    /// task. The in-flight utterance (if any) is cancelled immediately.
    pub async fn submit(&mut self) {
        let generation = self.lifecycle.submit();
        self.speech.observe(self.lifecycle.state()).await;

        let gateway = Arc::clone(&self.gateway);
        let prompt = self.lifecycle.prompt().to_string();
        let tx = self.completions_tx.clone();

        tracing::info!(generation, gateway = gateway.name(), "Submitting prompt");
        tokio::spawn(async move {
            let outcome = match gateway.generate(&prompt).await {
                Ok(reply) => CompletionOutcome::Success(reply.text),
                Err(error) => CompletionOutcome::Failure(error),
            };
            // The Director may be gone on shutdown; nothing to do then.
            let _ = tx.send(Completion { generation, outcome }).await;
        });
    }

    /// Advance one frame using the engine's own wall clock.
    pub async fn tick(&mut self) -> Snapshot {
        let elapsed = self.started.elapsed().as_secs_f32();
        self.tick_at(elapsed).await
    }

    /// Advance one frame at an explicit elapsed time in seconds.
    ///
    /// Render loops that keep their own clock drive this directly.
    pub async fn tick_at(&mut self, elapsed_secs: f32) -> Snapshot {
        // Completions that arrived since the last tick, applied first so
        // the rest of the frame sees the new state.
        while let Ok(completion) = self.completions_rx.try_recv() {
            self.lifecycle
                .complete(completion.generation, completion.outcome);
        }

        // Speech follows the (possibly new) request state.
        self.speech.observe(self.lifecycle.state()).await;
        self.speech.poll();

        // Continuous animation, before the frame is presented.
        self.rotation.advance(elapsed_secs);
        self.button.tick();

        // Avatar clip follows the busy signals.
        let loading = self.lifecycle.is_pending();
        let speaking = self.speech.is_speaking();
        self.trigger.sync(loading, speaking, self.clips.as_mut());

        self.emit_telemetry();
        self.snapshot()
    }

    /// Build the current read-only snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let prompt = self.lifecycle.prompt();
        let placeholder = prompt.is_empty();
        let loading = self.lifecycle.is_pending();
        let speaking = self.speech.is_speaking();

        Snapshot {
            prompt: prompt.to_string(),
            input_text: if placeholder {
                PLACEHOLDER.to_string()
            } else {
                prompt.to_string()
            },
            placeholder,
            dialog_text: self
                .lifecycle
                .state()
                .response_text()
                .map(ToString::to_string),
            error_text: match self.lifecycle.state() {
                RequestState::Failed(message) => Some(message.clone()),
                _ => None,
            },
            loading,
            speaking,
            camera_locked: loading || speaking,
            button_label: if loading { LABEL_BUSY } else { LABEL_READY },
            rotation: self.rotation.angles(),
            button_scale: self.button.scale(),
            button_glow: self.button.glow(),
            button_depth: self.button.depth(),
            layout: self.layout.layout(),
        }
    }

    /// The current request state.
    #[must_use]
    pub fn state(&self) -> &RequestState {
        self.lifecycle.state()
    }

    /// The current prompt text.
    #[must_use]
    pub fn prompt(&self) -> &str {
        self.lifecycle.prompt()
    }

    /// Whether a request is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.lifecycle.is_pending()
    }

    /// Whether an utterance is playing.
    #[must_use]
    pub fn is_speaking(&self) -> bool {
        self.speech.is_speaking()
    }

    fn editing_allowed(&self) -> bool {
        // The input surface is disabled while a request is in flight.
        self.focused && !self.lifecycle.is_pending()
    }

    fn refresh_layout(&mut self) {
        let placeholder = self.lifecycle.prompt().is_empty();
        let text = if placeholder {
            PLACEHOLDER
        } else {
            self.lifecycle.prompt()
        };
        let bounds = self.measurer.measure(text, self.viewport_width);
        self.layout.update(placeholder, bounds);
    }

    fn emit_telemetry(&mut self) {
        if self.last_telemetry.elapsed() >= self.telemetry_interval {
            let angles = self.rotation.angles();
            tracing::debug!(x = angles.x, y = angles.y, z = angles.z, "Button rotation");
            self.last_telemetry = Instant::now();
        }
    }
}
