use std::time::Duration;

/// Formats seconds as MM:SS, or HH:MM:SS from one hour up.
/// Fractions are truncated; negative or non-finite input reads as zero.
pub fn format_seconds(seconds: f64) -> String {
    let total_secs = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };

    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

/// Formats a duration as MM:SS or HH:MM:SS
pub fn format_duration(duration: Duration) -> String {
    format_seconds(duration.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minutes_and_seconds_are_padded() {
        assert_eq!(format_seconds(0.0), "00:00");
        assert_eq!(format_seconds(7.9), "00:07");
        assert_eq!(format_seconds(65.0), "01:05");
        assert_eq!(format_seconds(3599.0), "59:59");
    }

    #[test]
    fn hours_appear_from_one_hour() {
        assert_eq!(format_seconds(3600.0), "01:00:00");
        assert_eq!(format_seconds(3725.0), "01:02:05");
        assert_eq!(format_duration(Duration::from_secs(36_000)), "10:00:00");
    }

    #[test]
    fn invalid_input_reads_as_zero() {
        assert_eq!(format_seconds(-5.0), "00:00");
        assert_eq!(format_seconds(f64::NAN), "00:00");
        assert_eq!(format_seconds(f64::INFINITY), "00:00");
    }
}
