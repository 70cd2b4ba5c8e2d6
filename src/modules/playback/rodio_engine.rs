use crate::core::error::TransportError;
use crate::core::events::ClockObserver;
use crate::core::models::{MediaRef, SeekRequestId};
use crate::core::traits::MediaEngine;
use crate::modules::playback::duration_probe::spawn_duration_probe;
use crossbeam_channel::{RecvTimeoutError, Sender, bounded};
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

/// Media engine backed by a rodio sink.
///
/// The output device is opened on `attach`. Position ticks come from a
/// dedicated clock thread, the duration from a probe thread, and seeks run
/// on their own thread because `Sink::try_seek` waits for the audio callback.
pub struct RodioEngine {
    tick_interval: Duration,
    // Decoded again when the sink has drained at end of media
    path: Option<PathBuf>,
    stream: Option<OutputStream>,
    sink: Option<Arc<Sink>>,
    observer: Option<ClockObserver>,
    ticker: Option<Ticker>,
}

impl RodioEngine {
    pub fn new(tick_interval: Duration) -> Self {
        Self {
            tick_interval,
            path: None,
            stream: None,
            sink: None,
            observer: None,
            ticker: None,
        }
    }
}

impl MediaEngine for RodioEngine {
    fn attach(&mut self, media: &MediaRef, observer: ClockObserver) -> Result<(), TransportError> {
        if self.sink.is_some() {
            return Err(TransportError::engine_unavailable(media, "engine already attached"));
        }

        let path = media
            .local_path()
            .ok_or_else(|| TransportError::engine_unavailable(media, "only local files are supported"))?
            .to_path_buf();

        let source = decode(&path).map_err(|e| TransportError::engine_unavailable(media, e))?;
        let known_duration = source.total_duration();

        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| TransportError::engine_unavailable(media, format!("no output device: {e}")))?;
        stream.log_on_drop(false);

        let sink = Arc::new(Sink::connect_new(stream.mixer()));
        sink.pause();
        sink.append(source);

        let ticker = Ticker::spawn(Arc::clone(&sink), self.tick_interval, observer.clone())
            .map_err(|e| TransportError::engine_unavailable(media, e))?;

        if let Err(e) = spawn_duration_probe(path.clone(), known_duration, observer.clone()) {
            warn!(%media, error = %e, "could not start duration probe");
        }

        debug!(%media, interval_ms = self.tick_interval.as_millis() as u64, "rodio engine attached");

        self.path = Some(path);
        self.stream = Some(stream);
        self.sink = Some(sink);
        self.observer = Some(observer);
        self.ticker = Some(ticker);
        Ok(())
    }

    fn play(&mut self) {
        if let (Some(sink), Some(path)) = (&self.sink, &self.path) {
            if let Err(e) = refill_if_drained(sink, path) {
                warn!(path = %path.display(), error = %e, "could not reload finished media");
            }
            sink.play();
        }
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn seek(&mut self, target_seconds: f64, request: SeekRequestId) {
        let (Some(sink), Some(observer), Some(path)) = (&self.sink, &self.observer, &self.path) else {
            warn!(%request, "seek on a detached engine ignored");
            return;
        };

        let target = if target_seconds.is_finite() && target_seconds > 0.0 {
            Duration::from_secs_f64(target_seconds)
        } else {
            Duration::ZERO
        };

        let sink = Arc::clone(sink);
        let path = path.clone();
        let completion = observer.clone();
        let spawned = thread::Builder::new()
            .name("playbar-seek".to_string())
            .spawn(move || {
                // A drained sink accepts seeks without moving its clock
                if let Err(e) = refill_if_drained(&sink, &path) {
                    warn!(%request, error = %e, "could not reload finished media");
                }
                if let Err(e) = sink.try_seek(target) {
                    warn!(%request, error = %e, "seek failed, clock stays where it was");
                }
                completion.seek_completed(request);
            });

        if let Err(e) = spawned {
            warn!(%request, error = %e, "could not start seek thread");
            observer.seek_completed(request);
        }
    }

    fn detach(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.stop();
        }
        self.observer = None;

        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.stream = None;
        self.path = None;
    }
}

fn decode(path: &Path) -> Result<Decoder<BufReader<File>>, String> {
    let file = File::open(path).map_err(|e| e.to_string())?;
    Decoder::new(BufReader::new(file)).map_err(|e| format!("failed to decode: {e}"))
}

/// Queue the media again once the sink has played it out.
///
/// # Returns
/// * `Ok(true)` if the source was appended again
fn refill_if_drained(sink: &Sink, path: &Path) -> Result<bool, String> {
    if !sink.empty() {
        return Ok(false);
    }

    let source = decode(path)?;
    sink.append(source);
    debug!(path = %path.display(), "finished media queued again");
    Ok(true)
}

// To avoid leaks
impl Drop for RodioEngine {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Clock thread emitting the sink position at a fixed cadence, paused or not
struct Ticker {
    stop_tx: Sender<()>,
    handle: JoinHandle<()>,
}

impl Ticker {
    fn spawn(sink: Arc<Sink>, interval: Duration, observer: ClockObserver) -> std::io::Result<Self> {
        let (stop_tx, stop_rx) = bounded::<()>(0);

        let handle = thread::Builder::new()
            .name("playbar-clock".to_string())
            .spawn(move || {
                loop {
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => observer.tick(sink.get_pos().as_secs_f64()),
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
            })?;

        Ok(Self { stop_tx, handle })
    }

    /// Returns once the clock thread has exited
    fn stop(self) {
        drop(self.stop_tx);
        if self.handle.join().is_err() {
            warn!("clock thread panicked");
        }
    }
}
