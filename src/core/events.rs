use crate::core::models::{SeekRequestId, SessionId};
use crossbeam_channel::TrySendError;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, trace};

/// All events that can occur in the application
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    // Engine notifications
    Clock(ClockEvent),

    // User gestures
    Ui(UiEvent),
}

/// Notifications coming from the media engine, tagged with the session they belong to
#[derive(Debug, Clone, PartialEq)]
pub enum ClockEvent {
    /// The media's duration became known (at most once per load)
    DurationKnown { session: SessionId, seconds: f64 },

    /// Periodic clock position
    PeriodicTick { session: SessionId, seconds: f64 },

    /// A seek issued by the controller has landed
    SeekCompleted {
        session: SessionId,
        request: SeekRequestId,
    },
}

impl ClockEvent {
    pub fn session(&self) -> SessionId {
        match self {
            ClockEvent::DurationKnown { session, .. }
            | ClockEvent::PeriodicTick { session, .. }
            | ClockEvent::SeekCompleted { session, .. } => *session,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// User grabbed the slider
    DragStarted,

    /// Slider moved under the user's pointer (0.0 - 1.0)
    DragMoved { value: f64 },

    /// User released the slider
    DragEnded,

    /// User requested pause/resume toggle
    TogglePlayPauseRequested,

    /// User requested playback
    PlayRequested,

    /// User requested pause
    PauseRequested,

    /// User requested quit
    QuitRequested,
}

/// Type alias for event sender
pub type EventSender = crossbeam_channel::Sender<AppEvent>;

/// Type alias for event receiver
pub type EventReceiver = crossbeam_channel::Receiver<AppEvent>;

/// Notification channel handed to a media engine when it is attached.
///
/// Clones share one cancellation flag: once the owning clock source is
/// released, every clone goes quiet, whichever thread holds it.
#[derive(Debug, Clone)]
pub struct ClockObserver {
    session: SessionId,
    tx: EventSender,
    cancelled: Arc<AtomicBool>,
}

impl ClockObserver {
    pub fn new(session: SessionId, tx: EventSender) -> Self {
        Self {
            session,
            tx,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Silence this observer and all of its clones
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn duration_known(&self, seconds: f64) {
        self.emit(ClockEvent::DurationKnown {
            session: self.session,
            seconds,
        });
    }

    /// Ticks are lossy: if the queue is full the tick is dropped and the next one resyncs.
    pub fn tick(&self, seconds: f64) {
        if self.is_cancelled() {
            return;
        }

        let event = AppEvent::Clock(ClockEvent::PeriodicTick {
            session: self.session,
            seconds,
        });
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => trace!(session = %self.session, "event queue full, tick dropped"),
            Err(TrySendError::Disconnected(_)) => trace!(session = %self.session, "event queue closed"),
        }
    }

    pub fn seek_completed(&self, request: SeekRequestId) {
        self.emit(ClockEvent::SeekCompleted {
            session: self.session,
            request,
        });
    }

    fn emit(&self, event: ClockEvent) {
        if self.is_cancelled() {
            trace!(session = %self.session, ?event, "observer cancelled, notification suppressed");
            return;
        }

        if self.tx.send(AppEvent::Clock(event)).is_err() {
            debug!(session = %self.session, "event queue closed");
        }
    }
}
