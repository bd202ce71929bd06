//! Duration formatting helpers for rendered output.

/// Format a number of seconds as MM:SS.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_mmss(secs: f64) -> String {
    let total_seconds = secs.max(0.0).floor() as u64;
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{minutes:02}:{seconds:02}")
}

/// Format a number of seconds as a human-readable string.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_duration(secs: f64) -> String {
    let total_seconds = secs.max(0.0).floor() as u64;
    let total_minutes = total_seconds / 60;

    if total_minutes < 1 {
        return format!(
            "{} second{}",
            total_seconds,
            if total_seconds == 1 { "" } else { "s" }
        );
    }

    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours > 0 {
        if minutes > 0 {
            format!(
                "{} hour{}, {} minute{}",
                hours,
                if hours == 1 { "" } else { "s" },
                minutes,
                if minutes == 1 { "" } else { "s" }
            )
        } else {
            format!("{} hour{}", hours, if hours == 1 { "" } else { "s" })
        }
    } else {
        format!("{} minute{}", minutes, if minutes == 1 { "" } else { "s" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(1200.0), "20 minutes");
        assert_eq!(format_duration(60.0), "1 minute");
        assert_eq!(format_duration(7200.0), "2 hours");
        assert_eq!(format_duration(5400.0), "1 hour, 30 minutes");
        assert_eq!(format_duration(1.4), "1 second");
        assert_eq!(format_duration(-3.0), "0 seconds");
    }

    #[test]
    fn test_format_mmss() {
        assert_eq!(format_mmss(1500.0), "25:00");
        assert_eq!(format_mmss(90.9), "01:30");
        assert_eq!(format_mmss(0.0), "00:00");
    }
}
