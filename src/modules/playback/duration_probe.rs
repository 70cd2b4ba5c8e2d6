use crate::core::events::ClockObserver;
use anyhow::{Context, Result};
use lofty::file::AudioFile;
use lofty::probe::Probe;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

/// Read the media duration from the file's container metadata
pub fn probe_duration(path: &Path) -> Result<Duration> {
    let tagged_file = Probe::open(path)
        .with_context(|| format!("Failed to open media file: {}", path.display()))?
        .read()
        .with_context(|| format!("Failed to read media properties: {}", path.display()))?;

    Ok(tagged_file.properties().duration())
}

/// Discover the duration off the caller's thread and report it through `observer`.
///
/// `known` is what the decoder already reported, if anything. A zero or
/// unreadable duration is never reported, so consumers keep seeing "unknown".
pub fn spawn_duration_probe(
    path: PathBuf,
    known: Option<Duration>,
    observer: ClockObserver,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("playbar-duration".to_string())
        .spawn(move || {
            let duration = match known {
                Some(duration) => Ok(duration),
                None => probe_duration(&path),
            };

            match duration {
                Ok(duration) if !duration.is_zero() => observer.duration_known(duration.as_secs_f64()),
                Ok(_) => debug!(path = %path.display(), "media reports no duration"),
                Err(e) => warn!(path = %path.display(), error = %e, "duration probe failed"),
            }
        })
}
