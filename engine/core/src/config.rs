//! Engine Configuration
//!
//! Defaults match the shipped scene; a `kiosk.toml` file and environment
//! variables can override them. Environment wins over the file, the file
//! wins over defaults.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::layout::ViewportParams;
use crate::rotation::{default_profiles, AxisProfile};
use crate::tts::DEFAULT_WORDS_PER_MINUTE;

/// Gateway connection settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Endpoint the prompt is POSTed to.
    pub url: String,
    /// Whether the endpoint refuses unauthenticated requests.
    pub requires_key: bool,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8787/api/generate".to_string(),
            requires_key: false,
            timeout_secs: 120,
        }
    }
}

impl GatewayConfig {
    /// Request timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Speech pacing settings for the simulated engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Speaking rate in words per minute.
    pub words_per_minute: u32,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
        }
    }
}

/// Top-level engine configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Gateway connection.
    pub gateway: GatewayConfig,
    /// BCP 47 tag handed to the speech engine.
    pub locale: String,
    /// Input viewport geometry.
    pub viewport: ViewportParams,
    /// Axis sinusoid profiles, X/Y/Z order.
    pub axes: [AxisProfile; 3],
    /// Speech pacing.
    pub speech: SpeechConfig,
    /// Seconds between rotation telemetry log lines.
    pub telemetry_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            gateway: GatewayConfig::default(),
            locale: "en-US".to_string(),
            viewport: ViewportParams::default(),
            axes: default_profiles(),
            speech: SpeechConfig::default(),
            telemetry_secs: 10,
        }
    }
}

impl EngineConfig {
    /// Create configuration from environment variables on top of defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Overlay environment variables onto this configuration.
    ///
    /// - `KIOSK_GATEWAY_URL`: gateway endpoint
    /// - `KIOSK_GATEWAY_REQUIRES_KEY`: `1`/`true` to require a credential
    /// - `KIOSK_LOCALE`: speech locale tag
    /// - `KIOSK_WORDS_PER_MINUTE`: simulated speaking rate
    /// - `KIOSK_TELEMETRY_SECS`: rotation telemetry interval
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("KIOSK_GATEWAY_URL") {
            self.gateway.url = url;
        }
        if let Ok(v) = std::env::var("KIOSK_GATEWAY_REQUIRES_KEY") {
            self.gateway.requires_key = v == "1" || v.to_lowercase() == "true";
        }
        if let Ok(locale) = std::env::var("KIOSK_LOCALE") {
            self.locale = locale;
        }
        if let Ok(wpm) = std::env::var("KIOSK_WORDS_PER_MINUTE") {
            self.speech.words_per_minute = wpm.parse().unwrap_or(self.speech.words_per_minute);
        }
        if let Ok(secs) = std::env::var("KIOSK_TELEMETRY_SECS") {
            self.telemetry_secs = secs.parse().unwrap_or(self.telemetry_secs);
        }
    }

    /// Rotation telemetry interval as a [`Duration`].
    #[must_use]
    pub fn telemetry_interval(&self) -> Duration {
        Duration::from_secs(self.telemetry_secs)
    }
}

/// Configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read config file {path}: {source}")]
    Io {
        /// Path that failed.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for [`EngineConfig`].
    #[error("cannot parse config file {path}: {source}")]
    Parse {
        /// Path that failed.
        path: String,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },
}

/// Load [`EngineConfig`] from a TOML file, then overlay environment
/// variables.
pub fn load_config(path: impl AsRef<Path>) -> Result<EngineConfig, ConfigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let mut config: EngineConfig = toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })?;

    config.apply_env();
    Ok(config)
}
