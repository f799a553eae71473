//! Display formatting for dashboard values.
//!
//! Everything here is a pure function from raw health figures to the strings
//! and indicators the render layer shows.

use chrono::{DateTime, Local, Utc};
use healthdeck_types::Indicator;

/// Units walked by [`format_bytes`], each 1024 times the previous one.
const BYTE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
const BYTE_STEP: u64 = 1024;

/// Status strings that classify as healthy. Matching is exact and case sensitive.
pub const ACCEPTED_STATUS_VALUES: &[&str] = &["ok", "up", "connected"];

/// Render a byte count with the largest unit whose scaled value is at least 1.
///
/// Values are rounded to two decimals and trailing zeros are dropped, so
/// `1536` renders as `1.5 KB` and `1048576` as `1 MB`. Counts beyond the
/// gigabyte range stay in GB.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit_index = 0;
    let mut divisor: u64 = 1;
    while unit_index + 1 < BYTE_UNITS.len() && bytes / divisor >= BYTE_STEP {
        divisor *= BYTE_STEP;
        unit_index += 1;
    }

    let scaled = bytes as f64 / divisor as f64;
    let rounded = (scaled * 100.0).round() / 100.0;
    format!("{} {}", rounded, BYTE_UNITS[unit_index])
}

/// Render seconds as `<hours>h <minutes>m`. Seconds are truncated and hours
/// never roll over into days.
pub fn format_uptime(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    format!("{hours}h {minutes}m")
}

/// Classify a reported status string. Anything outside
/// [`ACCEPTED_STATUS_VALUES`], including an absent value, is `Off`.
pub fn classify_status(value: Option<&str>) -> Indicator {
    Indicator::from(value.is_some_and(|status| ACCEPTED_STATUS_VALUES.contains(&status)))
}

/// Wall-clock time in the local timezone, e.g. `14:03:27`.
pub fn format_clock_time(instant: DateTime<Utc>) -> String {
    instant.with_timezone(&Local).format("%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 Bytes");
        assert_eq!(format_bytes(1), "1 Bytes");
        assert_eq!(format_bytes(1023), "1023 Bytes");
        assert_eq!(format_bytes(1024), "1 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(524_288), "512 KB");
        assert_eq!(format_bytes(1_048_576), "1 MB");
        assert_eq!(format_bytes(2_097_152), "2 MB");
        assert_eq!(format_bytes(1_234_567), "1.18 MB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3 GB");
    }

    #[test]
    fn test_format_bytes_caps_at_gigabytes() {
        assert_eq!(format_bytes(2 * 1024 * 1024 * 1024 * 1024), "2048 GB");
    }

    #[test]
    fn test_format_bytes_rounds_up_to_next_integer() {
        // 1048575 bytes is 1023.999 KB, which rounds to 1024 within the KB unit.
        assert_eq!(format_bytes(1_048_575), "1024 KB");
    }

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(0), "0h 0m");
        assert_eq!(format_uptime(59), "0h 0m");
        assert_eq!(format_uptime(3661), "1h 1m");
        assert_eq!(format_uptime(7325), "2h 2m");
        assert_eq!(format_uptime(90_000), "25h 0m");
    }

    #[test]
    fn test_classify_status() {
        assert_eq!(classify_status(Some("ok")), Indicator::On);
        assert_eq!(classify_status(Some("up")), Indicator::On);
        assert_eq!(classify_status(Some("connected")), Indicator::On);
        assert_eq!(classify_status(Some("down")), Indicator::Off);
        assert_eq!(classify_status(Some("error")), Indicator::Off);
        assert_eq!(classify_status(Some("OK")), Indicator::Off);
        assert_eq!(classify_status(Some("")), Indicator::Off);
        assert_eq!(classify_status(None), Indicator::Off);
    }
}
