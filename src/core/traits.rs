use crate::application::state::TransportView;
use crate::core::error::TransportError;
use crate::core::events::{ClockObserver, UiEvent};
use crate::core::models::{MediaRef, SeekRequestId, SurfaceHandle};
use anyhow::Result;

/// Abstraction for the media engine behind the clock source.
///
/// The engine never mutates transport state itself: everything it knows
/// about time is reported through the `ClockObserver` given to `attach`.
pub trait MediaEngine {
    /// Load `media` and start the duration and periodic-position notifications.
    /// Called once per engine instance.
    fn attach(&mut self, media: &MediaRef, observer: ClockObserver) -> Result<(), TransportError>;

    /// Start or resume playback. Idempotent.
    fn play(&mut self);

    /// Pause playback. Idempotent.
    fn pause(&mut self);

    /// Move the engine clock to `target_seconds` without blocking the caller.
    /// Must report `request` through the observer exactly once when done.
    fn seek(&mut self, target_seconds: f64, request: SeekRequestId);

    /// Stop all notifications; no callback may fire after this returns
    fn detach(&mut self);
}

/// Supplementary UI attached to a player surface (overlays, analytics)
pub trait OverlayHost {
    /// Called once, after the surface exists
    fn attach(&mut self, surface: &SurfaceHandle) -> Result<()>;

    /// Called once, before the surface is destroyed
    fn detach(&mut self);
}

/// Abstraction for UI rendering
pub trait UiRenderer {
    /// Initialize the UI (setup terminal, etc.)
    fn init(&mut self) -> Result<()>;

    /// Cleanup the UI (restore terminal, etc.)
    fn cleanup(&mut self) -> Result<()>;

    /// Handle to the player surface, for overlay collaborators
    fn surface(&self) -> SurfaceHandle;

    /// Render the current transport values
    fn render(&mut self, view: &TransportView) -> Result<()>;

    /// Poll for user input (non-blocking)
    /// Returns events generated from user input
    fn poll_input(&mut self) -> Result<Vec<UiEvent>>;
}
