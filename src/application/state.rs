use crate::core::models::SeekState;
use crate::modules::ui::progress_formatter::format_seconds;

/// Snapshot of everything the control surface displays.
///
/// Produced by the session after each change; renderers never derive state
/// beyond formatting.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportView {
    pub title: String,
    pub position: f64,
    pub duration_seconds: f64,
    pub elapsed_seconds: f64,
    pub paused: bool,
    pub seek_state: SeekState,
    pub status_message: String,
}

impl TransportView {
    /// View shown while no media is bound
    pub fn unbound() -> Self {
        Self {
            title: "No media".to_string(),
            position: 0.0,
            duration_seconds: 0.0,
            elapsed_seconds: 0.0,
            paused: true,
            seek_state: SeekState::Idle,
            status_message: "Welcome".to_string(),
        }
    }

    pub fn elapsed_label(&self) -> String {
        format_seconds(self.elapsed_seconds)
    }

    pub fn duration_label(&self) -> String {
        format_seconds(self.duration_seconds)
    }

    /// Glyph for the play/pause button: shows the action a tap performs
    pub fn glyph(&self) -> &'static str {
        if self.paused { "▶" } else { "⏸" }
    }
}

impl Default for TransportView {
    fn default() -> Self {
        Self::unbound()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbound_view_shows_zeroes() {
        let view = TransportView::unbound();
        assert_eq!(view.elapsed_label(), "00:00");
        assert_eq!(view.duration_label(), "00:00");
        assert_eq!(view.glyph(), "▶");
    }

    #[test]
    fn labels_follow_seconds() {
        let view = TransportView {
            elapsed_seconds: 75.0,
            duration_seconds: 3725.0,
            paused: false,
            ..TransportView::unbound()
        };
        assert_eq!(view.elapsed_label(), "01:15");
        assert_eq!(view.duration_label(), "01:02:05");
        assert_eq!(view.glyph(), "⏸");
    }
}
