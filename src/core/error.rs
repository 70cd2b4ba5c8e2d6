use crate::core::models::{MediaRef, SessionId};
use thiserror::Error;

/// Errors raised by the transport core.
///
/// Only `EngineUnavailable` ever reaches the host. `StaleCallback` and
/// `DivisionGuard` are reported to the caller inside the core so it can log
/// them, and are then dropped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    /// The media engine could not be attached (missing file, disposed engine, no output device)
    #[error("engine unavailable for {media}: {reason}")]
    EngineUnavailable { media: String, reason: String },

    /// A notification referenced a session that has been released
    #[error("stale callback for {session}")]
    StaleCallback { session: SessionId },

    /// Duration is zero or unknown; the fallback value 0 was used
    #[error("duration is zero or unknown")]
    DivisionGuard,
}

impl TransportError {
    pub fn engine_unavailable(media: &MediaRef, reason: impl ToString) -> Self {
        TransportError::EngineUnavailable {
            media: media.to_string(),
            reason: reason.to_string(),
        }
    }
}
