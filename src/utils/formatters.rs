use std::time::Duration;

/// Formats a number of seconds as a human friendly time span ("1h 2m 5s")
#[must_use]
pub fn format_timespan(seconds: u64) -> String {
    if seconds == 0 {
        return "0s".to_string();
    }
    humantime::format_duration(Duration::from_secs(seconds)).to_string()
}

/// Wall clock time in the short form used to prefix status lines
/// (`Oct-17-2026 09:41AM`)
#[must_use]
pub fn current_time_label() -> String {
    chrono::Local::now().format("%b-%d-%Y %I:%M%p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timespan() {
        assert_eq!(format_timespan(0), "0s");
        assert_eq!(format_timespan(59), "59s");
        assert_eq!(format_timespan(100), "1m 40s");
        assert_eq!(format_timespan(3600), "1h");
        assert_eq!(format_timespan(90_061), "1day 1h 1m 1s");
    }

    #[test]
    fn test_current_time_label_shape() {
        let label = current_time_label();
        assert!(label.ends_with("AM") || label.ends_with("PM"));
        assert_eq!(label.matches('-').count(), 2);
    }
}
