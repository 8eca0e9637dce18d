//! Kiosk Engine - Interaction State & Animation Synchronization
//!
//! This crate is the headless core of the 3D prompt kiosk: a user types a
//! prompt into a 3D input surface, submits it via a 3D button, and the
//! reply is shown on a dialog panel and spoken aloud while the avatar and
//! button animate in sync with request/speech state.
//!
//! The engine is completely independent of any rendering framework. It can
//! drive a WebGL scene, a terminal mock-up, or run headless for testing.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      Rendering Surface                        │
//! │        (scene graph, camera, meshes - out of scope)          │
//! │                                                              │
//! │            InputEvent (up)    Snapshot (down)                │
//! └───────────────────────┬──────────────────────────────────────┘
//!                         │
//! ┌───────────────────────┼──────────────────────────────────────┐
//! │                    DIRECTOR                                  │
//! │  ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌────────────────┐  │
//! │  │ Request  │ │  Speech  │ │ Rotation │ │ Text Layout /  │  │
//! │  │Lifecycle │ │   Sync   │ │ + Button │ │  Clip Trigger  │  │
//! │  └────┬─────┘ └────┬─────┘ └──────────┘ └───────┬────────┘  │
//! └───────┼────────────┼─────────────────────────────┼──────────┘
//!         │            │                             │
//!   ResponseGateway  TtsEngine            TextMeasurer / ClipPlayer
//!   (HTTP service)   (voice engine)       (collaborator traits)
//! ```
//!
//! # Key Types
//!
//! - [`Director`]: owns all interaction state; the only mutation path
//! - [`Snapshot`]: the read-only per-tick view the surface redraws from
//! - [`InputEvent`]: everything a surface can report
//! - [`RequestState`]: the `Idle -> Pending -> Succeeded | Failed` grammar
//! - [`ResponseGateway`] / [`TtsEngine`]: async collaborator seams
//!
//! # Quick Start
//!
//! ```ignore
//! use kiosk_engine::{
//!     ClipDeck, Director, EngineConfig, HttpGateway, InputEvent,
//!     MonospaceMeasurer, SimulatedTts,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = EngineConfig::from_env();
//!     let mut deck = ClipDeck::new();
//!     deck.register("Gesture");
//!
//!     let mut director = Director::new(
//!         &config,
//!         HttpGateway::from_config(&config.gateway),
//!         SimulatedTts::new(config.speech.words_per_minute),
//!         Box::new(MonospaceMeasurer::new(1.0, config.viewport.line_height)),
//!         Box::new(deck),
//!     );
//!
//!     // Surface loop: forward events, tick, redraw from the snapshot.
//!     director.handle_event(InputEvent::FocusChanged(true)).await;
//!     loop {
//!         let snapshot = director.tick().await;
//!         // render(snapshot)...
//!     }
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`lifecycle`]: prompt ownership and the request state machine
//! - [`speech`]: one-utterance-per-response synchronization
//! - [`rotation`]: per-axis sinusoids, pause-freeze, hover/press glides
//! - [`layout`]: adaptive anchor/scroll placement for the input viewport
//! - [`clip`]: avatar clip start/stop from the busy signals
//! - [`director`]: the orchestrator and its snapshot
//! - [`gateway`]: generation-service trait + HTTP reference client
//! - [`tts`]: voice-engine trait + simulated/null engines
//! - [`measure`]: text-measurement trait + monospace reference measurer
//! - [`events`]: surface input vocabulary
//! - [`config`]: defaults, environment, and `kiosk.toml`
//!
//! # No Rendering Dependencies
//!
//! This crate has **zero** dependencies on any scene graph, GPU, or audio
//! stack. Everything a renderer needs arrives in the [`Snapshot`].

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod clip;
pub mod config;
pub mod director;
pub mod events;
pub mod gateway;
pub mod layout;
pub mod lifecycle;
pub mod measure;
pub mod rotation;
pub mod speech;
pub mod tts;

// Re-exports for convenience
pub use clip::{AnimationTrigger, ClipDeck, ClipPlayer};
pub use config::{load_config, ConfigError, EngineConfig, GatewayConfig, SpeechConfig};
pub use director::{Director, Snapshot, LABEL_BUSY, LABEL_READY, PLACEHOLDER};
pub use events::{Axis, InputEvent};
pub use gateway::{GatewayError, HttpGateway, PromptReply, PromptRequest, ResponseGateway};
pub use layout::{AdaptiveTextLayout, Anchor, TextBounds, TextLayout, ViewportParams};
pub use lifecycle::{CompletionOutcome, RequestLifecycle, RequestState, FAILURE_MESSAGE};
pub use measure::{MonospaceMeasurer, TextMeasurer};
pub use rotation::{
    default_profiles, AxisProfile, AxisRotationController, ButtonDynamics, Glide,
    RotationSnapshot,
};
pub use speech::{SpeechState, SpeechSynchronizer};
pub use tts::{NullTts, SimulatedTts, TtsEngine, UtteranceEvent, DEFAULT_WORDS_PER_MINUTE};
