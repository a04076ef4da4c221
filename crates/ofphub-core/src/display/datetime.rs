//! Formatting of upstream epoch timestamps.
//!
//! The planning service delivers times as decimal seconds since the Unix
//! epoch, kept as strings in the records. These wrappers render them in UTC,
//! which is what flight plans are read in.

use std::fmt;

use jiff::{tz::TimeZone, Timestamp};

fn parse_epoch(raw: &str) -> Option<Timestamp> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .and_then(|secs| Timestamp::from_second(secs).ok())
}

/// Full UTC date and time: `YYYY-MM-DD HH:MM:SS UTC`.
///
/// Values that are not epoch seconds are shown as they are.
pub struct UtcDateTime<'a>(pub &'a str);

impl<'a> fmt::Display for UtcDateTime<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match parse_epoch(self.0) {
            Some(ts) => write!(
                f,
                "{}",
                ts.to_zoned(TimeZone::UTC).strftime("%Y-%m-%d %H:%M:%S UTC")
            ),
            None => write!(f, "{}", self.0),
        }
    }
}

/// UTC time of day: `HH:MM`.
pub struct UtcClock<'a>(pub &'a str);

impl<'a> fmt::Display for UtcClock<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match parse_epoch(self.0) {
            Some(ts) => write!(f, "{}", ts.to_zoned(TimeZone::UTC).strftime("%H:%M")),
            None => write!(f, "{}", self.0),
        }
    }
}

/// A duration in seconds rounded to whole minutes: `HHMM`.
pub struct HoursMinutes<'a>(pub &'a str);

impl<'a> fmt::Display for HoursMinutes<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.trim().parse::<i64>() {
            Ok(secs) => {
                let minutes = secs.saturating_add(30) / 60;
                write!(f, "{:02}{:02}", minutes / 60, minutes % 60)
            }
            Err(_) => write!(f, "{}", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utc_date_time() {
        // 2025-07-28 09:40:00 UTC
        assert_eq!(
            UtcDateTime("1753695600").to_string(),
            "2025-07-28 09:40:00 UTC"
        );
        assert_eq!(UtcDateTime("").to_string(), "");
        assert_eq!(UtcDateTime("soon").to_string(), "soon");
    }

    #[test]
    fn test_utc_clock() {
        assert_eq!(UtcClock("1753695600").to_string(), "09:40");
    }

    #[test]
    fn test_duration_rounds_to_minutes() {
        assert_eq!(HoursMinutes("7020").to_string(), "0157");
        assert_eq!(HoursMinutes("7050").to_string(), "0158");
        assert_eq!(HoursMinutes("29").to_string(), "0000");
    }

    #[test]
    fn test_duration_extreme_value_does_not_overflow() {
        // i64::MAX seconds saturate instead of wrapping.
        let minutes = i64::MAX / 60;
        assert_eq!(
            HoursMinutes("9223372036854775807").to_string(),
            format!("{:02}{:02}", minutes / 60, minutes % 60)
        );
        assert_eq!(UtcDateTime("9223372036854775807").to_string(), "9223372036854775807");
    }
}
