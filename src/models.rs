use crate::core::models::{MediaRef, UnknownDurationPolicy};
use crate::utils::{DEFAULT_SEEK_STEP_SECONDS, DEFAULT_TICK_INTERVAL_MS, MIN_TICK_INTERVAL_MS};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// User configuration, read from `config.toml`. Every key is optional.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Cadence of the engine's periodic position notification
    pub tick_interval_ms: u64,
    pub unknown_duration: UnknownDurationPolicy,
    /// How far Left/Right move the slider
    pub seek_step_seconds: f64,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
    /// Fallback sources tried after the ones given on the command line
    pub sources: Vec<String>,
    pub overlay: OverlayConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct OverlayConfig {
    pub enabled: bool,
    pub channel_id: Option<String>,
    pub stream_id: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            unknown_duration: UnknownDurationPolicy::default(),
            seek_step_seconds: DEFAULT_SEEK_STEP_SECONDS,
            log_level: "info".to_string(),
            log_file: None,
            sources: Vec::new(),
            overlay: OverlayConfig::default(),
        }
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            channel_id: None,
            stream_id: None,
        }
    }
}

impl Config {
    /// Tick interval, floored so a typo cannot spin the clock thread
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(MIN_TICK_INTERVAL_MS))
    }

    /// Command-line sources first, then the configured fallbacks
    pub fn candidate_sources(&self, from_cli: &[String]) -> Vec<MediaRef> {
        from_cli
            .iter()
            .chain(self.sources.iter())
            .map(|s| MediaRef::new(s.as_str()))
            .collect()
    }
}
