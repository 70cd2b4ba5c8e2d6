use std::time::Duration;

pub const APP_NAME: &str = "playbar";

pub const CONFIG_FILE_NAME: &str = "config.toml";

pub const LOG_FILE_NAME: &str = "playbar.log";

/// Default cadence of the engine's periodic position notification
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 500;

pub const MIN_TICK_INTERVAL_MS: u64 = 50;

pub const DEFAULT_SEEK_STEP_SECONDS: f64 = 5.0;

/// Capacity of the shared event queue between engine threads and the app loop
pub const EVENT_QUEUE_CAPACITY: usize = 256;

/// Pause between iterations of the main loop (~60 FPS)
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);
