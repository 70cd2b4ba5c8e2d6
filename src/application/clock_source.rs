use crate::core::error::TransportError;
use crate::core::events::{ClockObserver, EventSender};
use crate::core::models::{MediaRef, SeekRequestId, SessionId};
use crate::core::traits::MediaEngine;
use tracing::{debug, info, warn};

/// Adapter between one media engine and the transport.
///
/// Owns the only subscription pair (duration + periodic position) for its
/// session. `release` consumes the adapter, so a bind is paired with exactly
/// one release; dropping an unreleased adapter releases it as a fallback.
pub struct ClockSource {
    session: SessionId,
    media: MediaRef,
    engine: Box<dyn MediaEngine>,
    observer: ClockObserver,
    next_seek: u64,
    duration_reported: bool,
    released: bool,
}

impl ClockSource {
    /// Attach `engine` to `media` and route its notifications into `events`
    pub fn bind(
        mut engine: Box<dyn MediaEngine>,
        media: MediaRef,
        events: EventSender,
    ) -> Result<Self, TransportError> {
        let session = SessionId::next();
        let observer = ClockObserver::new(session, events);

        if let Err(e) = engine.attach(&media, observer.clone()) {
            observer.cancel();
            warn!(%session, %media, error = %e, "failed to bind clock source");
            return Err(e);
        }

        info!(%session, %media, "clock source bound");

        Ok(Self {
            session,
            media,
            engine,
            observer,
            next_seek: 1,
            duration_reported: false,
            released: false,
        })
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn media(&self) -> &MediaRef {
        &self.media
    }

    /// Gate for duration notifications: the first usable one per load wins.
    ///
    /// Non-finite or non-positive durations do not consume the slot, so an
    /// engine that reports "indefinite" before the real value still gets through.
    pub fn accept_duration(&mut self, seconds: f64) -> bool {
        if self.duration_reported {
            debug!(session = %self.session, seconds, "duplicate duration notification ignored");
            return false;
        }

        if !(seconds.is_finite() && seconds > 0.0) {
            debug!(session = %self.session, seconds, "unusable duration notification ignored");
            return false;
        }

        self.duration_reported = true;
        true
    }

    pub fn play(&mut self) {
        self.engine.play();
    }

    pub fn pause(&mut self) {
        self.engine.pause();
    }

    /// Issue a seek; the completion arrives later as a clock event carrying the returned id
    pub fn seek(&mut self, target_seconds: f64) -> SeekRequestId {
        let request = SeekRequestId::new(self.next_seek);
        self.next_seek += 1;

        debug!(session = %self.session, %request, target_seconds, "seek issued");
        self.engine.seek(target_seconds, request);
        request
    }

    /// Cancel both subscriptions and detach the engine
    pub fn release(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        if self.released {
            return;
        }

        self.observer.cancel();
        self.engine.detach();
        self.released = true;

        info!(session = %self.session, media = %self.media, "clock source released");
    }
}

// To avoid leaking the periodic subscription
impl Drop for ClockSource {
    fn drop(&mut self) {
        if !self.released {
            warn!(session = %self.session, "clock source dropped without release");
            self.teardown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{EngineCall, RecordingEngine};
    use crate::core::events::{AppEvent, ClockEvent};
    use crossbeam_channel::unbounded;

    #[test]
    fn bind_attaches_once_and_routes_notifications() {
        let (engine, probe) = RecordingEngine::new();
        let (tx, rx) = unbounded();

        let clock = ClockSource::bind(Box::new(engine), MediaRef::new("/media/a.ogg"), tx).unwrap();

        assert_eq!(probe.borrow().count(&EngineCall::Attach("/media/a.ogg".into())), 1);
        probe.borrow().observer().tick(2.0);
        assert_eq!(
            rx.try_recv().unwrap(),
            AppEvent::Clock(ClockEvent::PeriodicTick {
                session: clock.session(),
                seconds: 2.0
            })
        );

        clock.release();
    }

    #[test]
    fn bind_failure_surfaces_engine_unavailable() {
        let (tx, _rx) = unbounded();
        let engine = RecordingEngine::failing("disposed");

        let err = ClockSource::bind(Box::new(engine), MediaRef::new("/media/a.ogg"), tx)
            .err()
            .unwrap();

        assert!(matches!(err, TransportError::EngineUnavailable { .. }));
    }

    #[test]
    fn release_detaches_and_silences_observer() {
        let (engine, probe) = RecordingEngine::new();
        let (tx, rx) = unbounded();
        let clock = ClockSource::bind(Box::new(engine), MediaRef::new("a.ogg"), tx).unwrap();
        let observer = probe.borrow().observer();

        clock.release();

        observer.tick(9.0);
        observer.duration_known(30.0);
        assert!(rx.try_recv().is_err());
        assert_eq!(probe.borrow().count(&EngineCall::Detach), 1);
    }

    #[test]
    fn drop_without_release_still_detaches_once() {
        let (engine, probe) = RecordingEngine::new();
        let (tx, _rx) = unbounded();

        {
            let _clock = ClockSource::bind(Box::new(engine), MediaRef::new("a.ogg"), tx).unwrap();
        }

        assert_eq!(probe.borrow().count(&EngineCall::Detach), 1);
        assert!(probe.borrow().observer().is_cancelled());
    }

    #[test]
    fn seek_requests_get_distinct_ids() {
        let (engine, probe) = RecordingEngine::new();
        let (tx, _rx) = unbounded();
        let mut clock = ClockSource::bind(Box::new(engine), MediaRef::new("a.ogg"), tx).unwrap();

        let first = clock.seek(10.0);
        let second = clock.seek(20.0);

        assert_ne!(first, second);
        assert_eq!(probe.borrow().seeks(), vec![(10.0, first), (20.0, second)]);
        clock.release();
    }

    #[test]
    fn duration_is_accepted_once_per_load() {
        let (engine, _probe) = RecordingEngine::new();
        let (tx, _rx) = unbounded();
        let mut clock = ClockSource::bind(Box::new(engine), MediaRef::new("a.ogg"), tx).unwrap();

        assert!(!clock.accept_duration(f64::NAN));
        assert!(!clock.accept_duration(0.0));
        assert!(clock.accept_duration(120.0));
        assert!(!clock.accept_duration(121.0));
        clock.release();
    }
}
