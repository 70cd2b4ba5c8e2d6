use crate::core::error::TransportError;

/// Shared slider state: media duration and the normalized playback position.
///
/// Both the clock and the user write here; the transport controller decides
/// which of them is allowed to at any moment.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PositionModel {
    duration_seconds: f64,
    normalized_position: f64,
}

impl PositionModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total duration in seconds (0 while unknown)
    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    /// Position as a fraction of the duration (0.0 to 1.0)
    pub fn normalized_position(&self) -> f64 {
        self.normalized_position
    }

    /// Elapsed seconds derived from position and duration
    pub fn elapsed_seconds(&self) -> f64 {
        self.normalized_position * self.duration_seconds
    }

    /// Where a seek should land for the current slider position
    pub fn seek_target_seconds(&self) -> f64 {
        self.elapsed_seconds()
    }

    /// Record the media duration. Non-finite or negative values count as unknown.
    pub fn set_duration(&mut self, seconds: f64) {
        self.duration_seconds = sanitize_seconds(seconds);
    }

    /// Derive the position from a clock reading.
    ///
    /// With an unknown duration the position is held at 0 and
    /// `DivisionGuard` is returned so the caller can note it.
    pub fn sync_to_clock(&mut self, clock_seconds: f64) -> Result<(), TransportError> {
        match progress_ratio(clock_seconds, self.duration_seconds) {
            Some(ratio) => {
                self.normalized_position = ratio;
                Ok(())
            }
            None => {
                self.normalized_position = 0.0;
                Err(TransportError::DivisionGuard)
            }
        }
    }

    /// Set the position straight from a slider gesture. NaN is ignored.
    ///
    /// # Returns
    /// * `true` if the position changed
    pub fn set_from_gesture(&mut self, value: f64) -> bool {
        if value.is_nan() {
            return false;
        }

        let value = value.clamp(0.0, 1.0);
        let changed = value != self.normalized_position;
        self.normalized_position = value;
        changed
    }
}

/// Ratio of `elapsed` over `total`, clamped to 0.0..=1.0
///
/// # Returns
/// * `None` if `total` is zero, negative or not finite
fn progress_ratio(elapsed: f64, total: f64) -> Option<f64> {
    if !(total.is_finite() && total > 0.0) {
        return None;
    }

    Some((sanitize_seconds(elapsed) / total).clamp(0.0, 1.0))
}

fn sanitize_seconds(seconds: f64) -> f64 {
    if seconds.is_finite() && seconds > 0.0 {
        seconds
    } else {
        0.0
    }
}
