//! Kiosk Headless Surface
//!
//! Reference surface for the interaction engine. It wires the Director to
//! the HTTP gateway, the paced speech simulator, the monospace measurer,
//! and stdin/stdout - and contains no business logic of its own. Useful for
//! exercising a gateway deployment and for watching the engine's state
//! transitions without a 3D scene.
//!
//! # Usage
//!
//! ```bash
//! # Against the default local gateway
//! kiosk-headless
//!
//! # Against a deployed gateway, custom frame rate
//! kiosk-headless --gateway-url https://kiosk.example/api/generate --tick-ms 50
//!
//! # With a config file
//! kiosk-headless --config kiosk.toml
//!
//! # Verbose engine logging
//! RUST_LOG=debug kiosk-headless
//! ```
//!
//! Each line typed on stdin replaces the prompt and submits it. `:x`, `:y`
//! and `:z` toggle the rotation axis pauses; `:angles` prints the current
//! telemetry; `:quit` exits.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kiosk_engine::{
    load_config, Axis, ClipDeck, Director, EngineConfig, HttpGateway, InputEvent,
    MonospaceMeasurer, ResponseGateway, SimulatedTts, Snapshot, TtsEngine,
};

/// Headless reference surface for the kiosk interaction engine
#[derive(Parser, Debug)]
#[command(name = "kiosk-headless")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short = 'c', long, env = "KIOSK_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Gateway endpoint (overrides the config file)
    #[arg(long, value_name = "URL")]
    gateway_url: Option<String>,

    /// Frame duration in milliseconds
    #[arg(long, default_value = "100")]
    tick_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut config = match args.config {
        Some(ref path) => load_config(path)?,
        None => EngineConfig::from_env(),
    };
    if let Some(url) = args.gateway_url {
        config.gateway.url = url;
    }

    let gateway = HttpGateway::from_config(&config.gateway);
    if !gateway.health_check().await {
        warn!(
            endpoint = gateway.endpoint(),
            "Gateway not reachable - submissions will fail until it is"
        );
    }

    let mut deck = ClipDeck::new();
    deck.register("Gesture");

    let mut director = Director::new(
        &config,
        gateway,
        SimulatedTts::new(config.speech.words_per_minute),
        Box::new(MonospaceMeasurer::new(1.0, config.viewport.line_height)),
        Box::new(deck),
    );

    // The headless surface always has focus.
    director.handle_event(InputEvent::FocusChanged(true)).await;

    info!(locale = %config.locale, "Kiosk engine ready");
    println!("Type a prompt and press Enter. :x/:y/:z pause an axis, :angles shows telemetry, :quit exits.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let frame = Duration::from_millis(args.tick_ms.max(16));
    let mut previous: Option<Snapshot> = None;

    loop {
        tokio::select! {
            biased;

            line = lines.next_line() => {
                match line? {
                    Some(line) => {
                        if !handle_line(&mut director, line.trim()).await {
                            break;
                        }
                    }
                    // stdin closed
                    None => break,
                }
            }

            () = tokio::time::sleep(frame) => {}
        }

        let snapshot = director.tick().await;
        report_transitions(previous.as_ref(), &snapshot);
        previous = Some(snapshot);
    }

    info!("Kiosk surface shut down");
    Ok(())
}

/// Apply one stdin line. Returns `false` when the surface should exit.
async fn handle_line<G, T>(director: &mut Director<G, T>, line: &str) -> bool
where
    G: ResponseGateway + 'static,
    T: TtsEngine,
{
    match line {
        ":quit" | ":q" => return false,
        ":x" | ":y" | ":z" => {
            let key = line.chars().nth(1).unwrap_or('x');
            if let Some(axis) = Axis::from_key(key) {
                director.handle_event(InputEvent::AxisToggle(axis)).await;
            }
        }
        ":angles" => {
            let rotation = director.snapshot().rotation;
            println!(
                "rotation: x={:.3} y={:.3} z={:.3}",
                rotation.x, rotation.y, rotation.z
            );
        }
        "" => {}
        prompt => {
            if director.is_loading() {
                println!("(still transmitting - hold on)");
                return true;
            }
            // Replace the previous prompt through ordinary edit events.
            for _ in 0..director.prompt().chars().count() {
                director.handle_event(InputEvent::Backspace).await;
            }
            for c in prompt.chars() {
                director.handle_event(InputEvent::Char(c)).await;
            }
            director.handle_event(InputEvent::Submit).await;
        }
    }
    true
}

/// Print state transitions between two frames.
fn report_transitions(previous: Option<&Snapshot>, current: &Snapshot) {
    let was_loading = previous.is_some_and(|s| s.loading);
    let was_speaking = previous.is_some_and(|s| s.speaking);
    let previous_dialog = previous.and_then(|s| s.dialog_text.as_deref());
    let previous_error = previous.and_then(|s| s.error_text.as_deref());

    if current.loading && !was_loading {
        println!("[{}]", current.button_label);
    }

    if current.dialog_text.as_deref() != previous_dialog {
        if let Some(text) = current.dialog_text.as_deref() {
            println!("Reply: {text}");
        }
    }

    if current.error_text.as_deref() != previous_error {
        if let Some(message) = current.error_text.as_deref() {
            println!("{message}");
        }
    }

    if current.speaking && !was_speaking {
        println!("(speaking...)");
    }
    if was_speaking && !current.speaking {
        println!("(speech finished)");
    }
}
