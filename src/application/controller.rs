use crate::application::clock_source::ClockSource;
use crate::application::position::PositionModel;
use crate::core::events::UiEvent;
use crate::core::models::{SeekRequestId, SeekState, UnknownDurationPolicy};
use tracing::{debug, trace, warn};

/// Everything a transition may touch.
///
/// Passed by `&mut` into each controller method so the controller itself
/// only owns the seek lifecycle, not the model or the engine.
pub struct TransportContext<'a> {
    pub position: &'a mut PositionModel,
    pub clock: &'a mut ClockSource,
}

/// Arbitrates between the clock and the user for ownership of the slider.
///
/// | From     | Event              | To       |
/// |----------|--------------------|----------|
/// | Idle     | drag-start         | Seeking  |
/// | Seeking  | drag-move          | Seeking  |
/// | Seeking  | drag-end           | Settling |
/// | Settling | seek-complete      | Idle     |
/// | Settling | drag-start         | Seeking  |
///
/// Clock ticks only reach the position model in `Idle`.
#[derive(Debug)]
pub struct TransportController {
    state: SeekState,
    paused: bool,
    resume_after_seek: bool,
    pending_seek: Option<IssuedSeek>,
    // Last completed seek, until the first idle tick after it
    landed: Option<IssuedSeek>,
    unknown_duration: UnknownDurationPolicy,
}

/// A seek sent to the engine and the slider position it was computed from
#[derive(Debug, Clone, Copy, PartialEq)]
struct IssuedSeek {
    request: SeekRequestId,
    target_seconds: f64,
    position: f64,
}

impl TransportController {
    /// Media starts paused
    pub fn new(unknown_duration: UnknownDurationPolicy) -> Self {
        Self {
            state: SeekState::Idle,
            paused: true,
            resume_after_seek: false,
            pending_seek: None,
            landed: None,
            unknown_duration,
        }
    }

    pub fn state(&self) -> SeekState {
        self.state
    }

    /// Locally tracked paused flag (drives the play/pause glyph)
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[cfg(test)]
    pub fn pending_seek(&self) -> Option<SeekRequestId> {
        self.pending_seek.map(|seek| seek.request)
    }

    /// Route a user gesture.
    ///
    /// # Returns
    /// * `true` if anything visible changed
    pub fn handle(&mut self, event: &UiEvent, ctx: &mut TransportContext) -> bool {
        match event {
            UiEvent::DragStarted => self.drag_started(ctx),
            UiEvent::DragMoved { value } => self.drag_moved(*value, ctx),
            UiEvent::DragEnded => self.drag_ended(ctx),
            UiEvent::TogglePlayPauseRequested => self.toggle_play_pause(ctx),
            UiEvent::PlayRequested => self.play(ctx),
            UiEvent::PauseRequested => self.pause(ctx),
            UiEvent::QuitRequested => false,
        }
    }

    pub fn drag_started(&mut self, ctx: &mut TransportContext) -> bool {
        if self.state != SeekState::Seeking {
            self.landed = None;
        }

        match self.state {
            SeekState::Idle => {
                // Only the intent from before the drag counts; it is not restored by pausing.
                self.resume_after_seek = !self.paused;
                ctx.clock.pause();
                self.paused = true;
            }
            SeekState::Settling => {
                // A new drag wins over the unconfirmed seek. Keep the intent
                // captured when the first drag of this chain started.
                if let Some(seek) = self.pending_seek.take() {
                    debug!(request = %seek.request, "drag started before seek settled, abandoning completion");
                }
                ctx.clock.pause();
            }
            SeekState::Seeking => {
                trace!("drag already in progress");
                return false;
            }
        }

        self.transition(SeekState::Seeking);
        true
    }

    pub fn drag_moved(&mut self, value: f64, ctx: &mut TransportContext) -> bool {
        if self.state != SeekState::Seeking {
            trace!(state = %self.state, value, "drag-move outside a drag ignored");
            return false;
        }

        ctx.position.set_from_gesture(value)
    }

    pub fn drag_ended(&mut self, ctx: &mut TransportContext) -> bool {
        if self.state != SeekState::Seeking {
            trace!(state = %self.state, "drag-end outside a drag ignored");
            return false;
        }

        if ctx.position.duration_seconds() <= 0.0 {
            match self.unknown_duration {
                UnknownDurationPolicy::SeekToStart => {
                    warn!("drag ended before duration was known, seeking to start");
                }
                UnknownDurationPolicy::Skip => {
                    warn!("drag ended before duration was known, seek skipped");
                    self.finish_seek(ctx);
                    return true;
                }
            }
        }

        let target_seconds = ctx.position.seek_target_seconds();
        let request = ctx.clock.seek(target_seconds);
        self.pending_seek = Some(IssuedSeek {
            request,
            target_seconds,
            position: ctx.position.normalized_position(),
        });
        self.transition(SeekState::Settling);
        true
    }

    /// Completion of a seek issued by `drag_ended`.
    /// Anything but the pending request in `Settling` is a no-op.
    pub fn seek_completed(&mut self, request: SeekRequestId, ctx: &mut TransportContext) -> bool {
        let pending = match self.pending_seek {
            Some(seek) if self.state == SeekState::Settling && seek.request == request => seek,
            _ => {
                debug!(%request, state = %self.state, pending = ?self.pending_seek, "stale seek completion ignored");
                return false;
            }
        };

        self.pending_seek = None;
        self.landed = Some(pending);
        self.finish_seek(ctx);
        true
    }

    /// Periodic clock reading; honoured only while idle.
    ///
    /// The first tick after a seek that reports exactly the seek target keeps
    /// the gesture position, so dividing the target back out cannot drift it.
    pub fn periodic_tick(&mut self, seconds: f64, ctx: &mut TransportContext) -> bool {
        if self.state != SeekState::Idle {
            trace!(state = %self.state, seconds, "tick discarded while user owns the slider");
            return false;
        }

        if let Some(landed) = self.landed.take() {
            if seconds == landed.target_seconds {
                return ctx.position.set_from_gesture(landed.position);
            }
        }

        let before = ctx.position.normalized_position();
        if let Err(e) = ctx.position.sync_to_clock(seconds) {
            trace!(seconds, error = %e, "position held at fallback");
        }
        before != ctx.position.normalized_position()
    }

    /// Duration discovery never changes the seek state
    pub fn duration_known(&mut self, seconds: f64, ctx: &mut TransportContext) -> bool {
        let before = ctx.position.duration_seconds();
        ctx.position.set_duration(seconds);
        debug!(seconds, state = %self.state, "duration known");
        before != ctx.position.duration_seconds()
    }

    pub fn play(&mut self, ctx: &mut TransportContext) -> bool {
        self.set_paused(false, ctx)
    }

    pub fn pause(&mut self, ctx: &mut TransportContext) -> bool {
        self.set_paused(true, ctx)
    }

    pub fn toggle_play_pause(&mut self, ctx: &mut TransportContext) -> bool {
        self.set_paused(!self.paused, ctx)
    }

    fn set_paused(&mut self, paused: bool, ctx: &mut TransportContext) -> bool {
        if self.state != SeekState::Idle {
            debug!(state = %self.state, paused, "play/pause ignored while seeking");
            return false;
        }

        if paused {
            ctx.clock.pause();
        } else {
            ctx.clock.play();
        }

        let changed = self.paused != paused;
        self.paused = paused;
        changed
    }

    /// Back to idle, resuming only if playback was running before the drag
    fn finish_seek(&mut self, ctx: &mut TransportContext) {
        self.transition(SeekState::Idle);

        if self.resume_after_seek {
            ctx.clock.play();
            self.paused = false;
        }
        self.resume_after_seek = false;
    }

    fn transition(&mut self, to: SeekState) {
        if self.state != to {
            debug!(from = %self.state, %to, "seek state transition");
            self.state = to;
        }
    }
}
