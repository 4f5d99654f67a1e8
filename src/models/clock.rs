//! Wall-clock times and entry/exit windows.
//!
//! # Time Model
//! Times have minute resolution and wrap at 24h, so a show that starts at
//! 11:30 PM simply continues at 12:10 AM.

use chrono::format::{self, Parsed, StrftimeItems};
use chrono::{NaiveTime, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Accepted input formats, tried in order.
const FORMATS: [&str; 3] = ["%I:%M %p", "%I %p", "%H:%M"];

/// Output format: 12-hour clock without a leading zero.
const DISPLAY_FORMAT: &str = "%-I:%M %p";

/// A time of day with minute resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(NaiveTime);

/// A clock string that matches none of the accepted formats.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported time format: {0:?} (expected e.g. \"7:30 PM\", \"7 PM\" or \"19:30\")")]
pub struct ClockParseError(pub String);

impl ClockTime {
    /// Creates a time from hours (0-23) and minutes, wrapping past midnight.
    pub fn hm(hours: i64, minutes: i64) -> Self {
        Self::from_minutes(hours * 60 + minutes)
    }

    /// Creates a time from minutes since midnight, wrapping past midnight.
    pub fn from_minutes(minutes: i64) -> Self {
        Self(NaiveTime::default()).plus_minutes(minutes)
    }

    /// Minutes since midnight.
    #[inline]
    pub fn minutes(self) -> i64 {
        i64::from(self.0.num_seconds_from_midnight() / 60)
    }

    /// This time shifted by `minutes` (may be negative).
    pub fn plus_minutes(self, minutes: i64) -> Self {
        let (time, _days) = self.0.overflowing_add_signed(TimeDelta::minutes(minutes));
        Self(time)
    }

    /// The underlying `chrono` time.
    pub fn as_naive(self) -> NaiveTime {
        self.0
    }
}

impl From<NaiveTime> for ClockTime {
    /// Truncates to the minute.
    fn from(time: NaiveTime) -> Self {
        Self::hm(i64::from(time.hour()), i64::from(time.minute()))
    }
}

/// Parses `text` with one format. Formats without `%M` mean on the hour.
fn parse_with(text: &str, fmt: &str) -> Option<NaiveTime> {
    let mut parsed = Parsed::new();
    format::parse(&mut parsed, text, StrftimeItems::new(fmt)).ok()?;
    if !fmt.contains("%M") {
        parsed.set_minute(0).ok()?;
    }
    parsed.to_naive_time().ok()
}

impl FromStr for ClockTime {
    type Err = ClockParseError;

    /// Accepts `"7:30 PM"`, `"7 PM"`, and 24-hour `"19:30"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        FORMATS
            .iter()
            .find_map(|fmt| parse_with(text, fmt))
            .map(Self::from)
            .ok_or_else(|| ClockParseError(s.to_string()))
    }
}

impl TryFrom<String> for ClockTime {
    type Error = ClockParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ClockTime {
    /// 12-hour clock without a leading zero, e.g. `7:05 PM`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DISPLAY_FORMAT))
    }
}

/// A performer's on-stage window within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Entry time.
    pub start: ClockTime,
    /// Exit time.
    pub end: ClockTime,
}

impl TimeWindow {
    /// Creates a new window.
    pub fn new(start: ClockTime, end: ClockTime) -> Self {
        Self { start, end }
    }

    /// Window from offsets relative to `anchor`.
    pub fn offset_from(anchor: ClockTime, start_min: i32, end_min: i32) -> Self {
        Self::new(
            anchor.plus_minutes(i64::from(start_min)),
            anchor.plus_minutes(i64::from(end_min)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_formats() {
        assert_eq!("7:30 PM".parse::<ClockTime>().unwrap(), ClockTime::hm(19, 30));
        assert_eq!("7 PM".parse::<ClockTime>().unwrap(), ClockTime::hm(19, 0));
        assert_eq!("19:30".parse::<ClockTime>().unwrap(), ClockTime::hm(19, 30));
        assert_eq!("12:15 am".parse::<ClockTime>().unwrap(), ClockTime::hm(0, 15));
        assert_eq!("12 PM".parse::<ClockTime>().unwrap(), ClockTime::hm(12, 0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("tonight".parse::<ClockTime>().is_err());
        assert!("19".parse::<ClockTime>().is_err());
        assert!("13:00 PM".parse::<ClockTime>().is_err());
        assert!("7:75 PM".parse::<ClockTime>().is_err());
        assert!("".parse::<ClockTime>().is_err());
        assert!("24:00".parse::<ClockTime>().is_err());
    }

    #[test]
    fn test_display_no_leading_zero() {
        assert_eq!(ClockTime::hm(19, 5).to_string(), "7:05 PM");
        assert_eq!(ClockTime::hm(0, 0).to_string(), "12:00 AM");
        assert_eq!(ClockTime::hm(9, 45).to_string(), "9:45 AM");
    }

    #[test]
    fn test_wraps_past_midnight() {
        let late = ClockTime::hm(23, 50);
        assert_eq!(late.plus_minutes(20), ClockTime::hm(0, 10));
        assert_eq!(ClockTime::hm(0, 5).plus_minutes(-10), ClockTime::hm(23, 55));
    }

    #[test]
    fn test_minutes_and_naive() {
        let t = ClockTime::hm(19, 30);
        assert_eq!(t.minutes(), 19 * 60 + 30);
        assert_eq!(ClockTime::from_minutes(24 * 60 + 5), ClockTime::hm(0, 5));
        let naive = NaiveTime::from_hms_opt(7, 45, 59).unwrap();
        assert_eq!(ClockTime::from(naive), ClockTime::hm(7, 45));
        assert_eq!(t.as_naive(), NaiveTime::from_hms_opt(19, 30, 0).unwrap());
    }

    #[test]
    fn test_window_offsets() {
        let w = TimeWindow::offset_from(ClockTime::hm(19, 0), 2, 8);
        assert_eq!(w.start, ClockTime::hm(19, 2));
        assert_eq!(w.end, ClockTime::hm(19, 8));
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&ClockTime::hm(19, 30)).unwrap();
        assert_eq!(json, "\"7:30 PM\"");
        let back: ClockTime = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ClockTime::hm(19, 30));
    }
}
