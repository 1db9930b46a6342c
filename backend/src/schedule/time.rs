//! Time-of-day normalisation.
//!
//! The upstream service returns `hora_inicio` / `hora_fin` as bare `H:MM`,
//! as SQL date-times on the sentinel day, or as ISO strings with a `T` and a
//! zone suffix depending on which endpoint produced the row. Display always
//! uses `HH:MM`; writes always use `1900-01-01 HH:MM`. No timezone math is
//! ever applied: the values are wall-clock times.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

pub const SENTINEL_DATE: &str = "1900-01-01";

static BARE_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2}):(\d{2})$").expect("valid bare time pattern"));

static DATE_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}[ T](\d{1,2}):(\d{2})(?::\d{2})?$")
        .expect("valid date-time pattern")
});

static ISO_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"T(\d{2}):(\d{2})").expect("valid iso time pattern"));

static ANY_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2}):(\d{2})").expect("valid embedded time pattern"));

fn pad(hour: &str, minute: &str) -> String {
    format!("{:0>2}:{}", hour, minute)
}

/// Canonical `HH:MM` for any upstream time representation, or `""` when
/// nothing time-like is found.
pub fn to_display_time(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }

    for pattern in [&*BARE_TIME, &*DATE_TIME, &*ISO_TIME, &*ANY_TIME] {
        if let Some(caps) = pattern.captures(raw) {
            return pad(&caps[1], &caps[2]);
        }
    }

    warn!(target: "agenda::fallback", raw, "unrecognised time format, using empty time");
    String::new()
}

/// Encode a display time for the upstream write endpoints.
pub fn to_backend_time(display: &str) -> String {
    let display = display.trim();
    if display.is_empty() {
        return format!("{} 00:00", SENTINEL_DATE);
    }

    if display.contains('-') && display.contains(' ') {
        let parts: Vec<&str> = display.split(' ').collect();
        if parts.len() == 2 {
            return format!("{} {}", SENTINEL_DATE, parts[1]);
        }
    }

    if let Some(caps) = BARE_TIME.captures(display) {
        return format!("{} {}", SENTINEL_DATE, pad(&caps[1], &caps[2]));
    }

    format!("{} {}", SENTINEL_DATE, display)
}

/// `H:MM` or `HH:MM`; what the edit form is allowed to submit.
pub fn is_valid_time(value: &str) -> bool {
    BARE_TIME.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_time_is_zero_padded() {
        assert_eq!(to_display_time("8:30"), "08:30");
        assert_eq!(to_display_time("14:05"), "14:05");
    }

    #[test]
    fn test_sql_datetime() {
        assert_eq!(to_display_time("2025-01-01 08:30:00"), "08:30");
        assert_eq!(to_display_time("1900-01-01 7:15"), "07:15");
        assert_eq!(to_display_time("2025-01-01T09:45"), "09:45");
    }

    #[test]
    fn test_iso_time_is_not_shifted() {
        assert_eq!(to_display_time("2025-06-01T14:05:00.000Z"), "14:05");
        assert_eq!(to_display_time("1970-01-01T23:59:00-05:00"), "23:59");
    }

    #[test]
    fn test_embedded_time() {
        assert_eq!(to_display_time("desde las 9:00 hrs"), "09:00");
    }

    #[test]
    fn test_unrecognised_is_empty() {
        assert_eq!(to_display_time(""), "");
        assert_eq!(to_display_time("   "), "");
        assert_eq!(to_display_time("mañana"), "");
    }

    #[test]
    fn test_display_time_is_idempotent() {
        for raw in ["8:30", "2025-01-01 08:30:00", "2025-06-01T14:05:00.000Z", "a 7:05 b"] {
            let once = to_display_time(raw);
            assert_eq!(to_display_time(&once), once, "input {raw}");
        }
    }

    #[test]
    fn test_backend_time() {
        assert_eq!(to_backend_time(""), "1900-01-01 00:00");
        assert_eq!(to_backend_time("8:05"), "1900-01-01 08:05");
        assert_eq!(to_backend_time("2025-03-04 10:30"), "1900-01-01 10:30");
        assert_eq!(to_backend_time("noon"), "1900-01-01 noon");
    }

    #[test]
    fn test_backend_round_trip() {
        for h in 0..24 {
            for m in [0, 7, 30, 59] {
                let t = format!("{:02}:{:02}", h, m);
                let encoded = to_backend_time(&t);
                assert_eq!(&encoded[11..], t);
                assert_eq!(to_display_time(&encoded), t);
            }
        }
    }

    #[test]
    fn test_is_valid_time() {
        assert!(is_valid_time("8:00"));
        assert!(is_valid_time("18:45"));
        assert!(!is_valid_time("18:4"));
        assert!(!is_valid_time("1900-01-01 18:45"));
        assert!(!is_valid_time(""));
    }
}
