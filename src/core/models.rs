use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SESSION: AtomicU64 = AtomicU64::new(1);
static NEXT_SURFACE: AtomicU64 = AtomicU64::new(1);

/// Identifies one bound playback session (one media reference, one clock subscription pair)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    /// Allocate a process-unique session id
    pub fn next() -> Self {
        Self(NEXT_SESSION.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session#{}", self.0)
    }
}

/// Identifies one seek command issued to the engine.
///
/// Completions are matched against the request that is still pending, so a
/// completion for an abandoned seek can be told apart from the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SeekRequestId(u64);

impl SeekRequestId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for SeekRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seek#{}", self.0)
    }
}

/// Who currently owns the slider position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeekState {
    /// Clock is authoritative
    #[default]
    Idle,
    /// User is dragging the slider
    Seeking,
    /// Drag released, seek issued, engine has not confirmed yet
    Settling,
}

impl fmt::Display for SeekState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SeekState::Idle => "idle",
            SeekState::Seeking => "seeking",
            SeekState::Settling => "settling",
        };
        f.write_str(name)
    }
}

/// What to do when a drag ends while the duration is still unknown.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnknownDurationPolicy {
    /// Seek to the start of the media (target computes to 0)
    #[default]
    SeekToStart,
    /// Issue no seek and go straight back to idle
    Skip,
}

/// A playable media reference: a local path or a `file://` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRef {
    source: String,
}

impl MediaRef {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Local filesystem path, or `None` for remote schemes.
    pub fn local_path(&self) -> Option<&Path> {
        if let Some(rest) = self.source.strip_prefix("file://") {
            return Some(Path::new(rest));
        }
        if self.source.contains("://") {
            return None;
        }
        Some(Path::new(&self.source))
    }

    /// Short name used as the surface title
    pub fn display_name(&self) -> String {
        self.local_path()
            .and_then(|p| p.file_name())
            .and_then(|s| s.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| self.source.clone())
    }
}

impl fmt::Display for MediaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Handle to the surface the media is rendered on, passed to overlay collaborators
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceHandle {
    pub id: u64,
    pub title: String,
}

impl SurfaceHandle {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: NEXT_SURFACE.fetch_add(1, Ordering::Relaxed),
            title: title.into(),
        }
    }
}
