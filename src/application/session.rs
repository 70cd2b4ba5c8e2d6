use crate::application::clock_source::ClockSource;
use crate::application::controller::{TransportContext, TransportController};
use crate::application::position::PositionModel;
use crate::application::state::TransportView;
use crate::core::error::TransportError;
use crate::core::events::{ClockEvent, EventSender, UiEvent};
use crate::core::models::{MediaRef, SeekState, SessionId, UnknownDurationPolicy};
use crate::core::traits::MediaEngine;
use tracing::{info, warn};

/// One bound media reference: its clock source, the position model and the
/// transport controller arbitrating between them.
pub struct PlaybackSession {
    clock: ClockSource,
    position: PositionModel,
    controller: TransportController,
}

impl PlaybackSession {
    pub fn bind(
        engine: Box<dyn MediaEngine>,
        media: MediaRef,
        events: EventSender,
        unknown_duration: UnknownDurationPolicy,
    ) -> Result<Self, TransportError> {
        let clock = ClockSource::bind(engine, media, events)?;

        Ok(Self {
            clock,
            position: PositionModel::new(),
            controller: TransportController::new(unknown_duration),
        })
    }

    /// Bind the first source that an engine accepts.
    ///
    /// A fresh engine is built per attempt. Failures are logged and the next
    /// candidate is tried; if none bind, the last failure is returned.
    pub fn bind_first_playable<F>(
        sources: &[MediaRef],
        mut make_engine: F,
        events: &EventSender,
        unknown_duration: UnknownDurationPolicy,
    ) -> Result<Self, TransportError>
    where
        F: FnMut() -> Box<dyn MediaEngine>,
    {
        let mut last_error = None;

        for media in sources {
            match Self::bind(make_engine(), media.clone(), events.clone(), unknown_duration) {
                Ok(session) => return Ok(session),
                Err(e) => {
                    warn!(%media, error = %e, "source not playable, trying next");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| TransportError::EngineUnavailable {
            media: "<none>".to_string(),
            reason: "no sources given".to_string(),
        }))
    }

    pub fn id(&self) -> SessionId {
        self.clock.session()
    }

    pub fn media(&self) -> &MediaRef {
        self.clock.media()
    }

    #[cfg(test)]
    pub fn seek_state(&self) -> SeekState {
        self.controller.state()
    }

    #[cfg(test)]
    pub fn position(&self) -> &PositionModel {
        &self.position
    }

    pub fn view(&self) -> TransportView {
        let status_message = match self.controller.state() {
            SeekState::Seeking => "Seeking".to_string(),
            SeekState::Settling => "Settling".to_string(),
            SeekState::Idle if self.position.duration_seconds() <= 0.0 => "Loading".to_string(),
            SeekState::Idle if self.controller.is_paused() => "Paused".to_string(),
            SeekState::Idle => "Playing".to_string(),
        };

        TransportView {
            title: self.clock.media().display_name(),
            position: self.position.normalized_position(),
            duration_seconds: self.position.duration_seconds(),
            elapsed_seconds: self.position.elapsed_seconds(),
            paused: self.controller.is_paused(),
            seek_state: self.controller.state(),
            status_message,
        }
    }

    /// Apply an engine notification.
    ///
    /// # Returns
    /// * `Ok(true)` if the view changed
    /// * `Err(StaleCallback)` if the event belongs to another session
    pub fn handle_clock(&mut self, event: &ClockEvent) -> Result<bool, TransportError> {
        if event.session() != self.id() {
            return Err(TransportError::StaleCallback {
                session: event.session(),
            });
        }

        let mut ctx = TransportContext {
            position: &mut self.position,
            clock: &mut self.clock,
        };

        let changed = match event {
            ClockEvent::DurationKnown { seconds, .. } => {
                if ctx.clock.accept_duration(*seconds) {
                    self.controller.duration_known(*seconds, &mut ctx)
                } else {
                    false
                }
            }
            ClockEvent::PeriodicTick { seconds, .. } => self.controller.periodic_tick(*seconds, &mut ctx),
            ClockEvent::SeekCompleted { request, .. } => self.controller.seek_completed(*request, &mut ctx),
        };

        Ok(changed)
    }

    /// Apply a user gesture
    pub fn handle_ui(&mut self, event: &UiEvent) -> bool {
        let mut ctx = TransportContext {
            position: &mut self.position,
            clock: &mut self.clock,
        };
        self.controller.handle(event, &mut ctx)
    }

    /// Tear down: the clock source goes first so no callback sees a half-destroyed session
    pub fn release(self) {
        let PlaybackSession {
            clock,
            position,
            controller,
        } = self;

        let session = clock.session();
        clock.release();
        drop(controller);
        drop(position);

        info!(%session, "playback session released");
    }
}
