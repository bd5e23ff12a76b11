//! Clock-time handling for ticket records.
//!
//! The booking service sends a travel date as `YYYYMMDD` and departure/arrival
//! clock times as `HH:MM`. A service that ends at midnight is reported as
//! `24:00`, which we pin to `23:59` on the same day so every time stays on
//! the travel date.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;

/// Error returned when parsing an invalid date or time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time {input:?}: {reason}")]
pub struct TimeError {
    input: String,
    reason: &'static str,
}

impl TimeError {
    fn new(input: &str, reason: &'static str) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }
}

/// Parse a clock time in `HH:MM` form, mapping `24:00` to `23:59`.
///
/// ```
/// use ticket_watch::domain::parse_clock;
/// use chrono::NaiveTime;
///
/// assert_eq!(parse_clock("08:05").unwrap(), NaiveTime::from_hms_opt(8, 5, 0).unwrap());
/// assert_eq!(parse_clock("24:00").unwrap(), NaiveTime::from_hms_opt(23, 59, 0).unwrap());
/// assert!(parse_clock("8:05").is_err());
/// assert!(parse_clock("25:00").is_err());
/// ```
pub fn parse_clock(s: &str) -> Result<NaiveTime, TimeError> {
    let normalized = if s == "24:00" { "23:59" } else { s };

    let bytes = normalized.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return Err(TimeError::new(s, "expected HH:MM"));
    }

    let hour = parse_two_digits(&bytes[0..2]).ok_or_else(|| TimeError::new(s, "invalid hour"))?;
    let minute =
        parse_two_digits(&bytes[3..5]).ok_or_else(|| TimeError::new(s, "invalid minute"))?;

    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| TimeError::new(s, "out of range"))
}

/// Parse a compact `YYYYMMDD` travel date.
pub fn parse_travel_date(s: &str) -> Result<NaiveDate, TimeError> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TimeError::new(s, "expected YYYYMMDD"));
    }
    NaiveDate::parse_from_str(s, "%Y%m%d").map_err(|_| TimeError::new(s, "no such date"))
}

/// Combine a `YYYYMMDD` date and an `HH:MM` clock time.
pub fn parse_record_time(date: &str, clock: &str) -> Result<NaiveDateTime, TimeError> {
    let date = parse_travel_date(date)?;
    let time = parse_clock(clock)?;
    Ok(date.and_time(time))
}

fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    match bytes {
        [a, b] if a.is_ascii_digit() && b.is_ascii_digit() => {
            Some(u32::from(a - b'0') * 10 + u32::from(b - b'0'))
        }
        _ => None,
    }
}

/// Error returned for an inverted or unparsable departure window.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WindowError {
    #[error("window must look like HH:MM-HH:MM, got {0:?}")]
    Format(String),

    #[error(transparent)]
    Time(#[from] TimeError),

    #[error("window starts at {earliest} but ends earlier at {latest}")]
    Inverted { earliest: NaiveTime, latest: NaiveTime },
}

/// Range of acceptable departure times of day.
///
/// Both bounds are inclusive: a window of `08:00-12:00` accepts a train
/// leaving at exactly `08:00` and one leaving at exactly `12:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    earliest: NaiveTime,
    latest: NaiveTime,
}

impl TimeWindow {
    pub fn new(earliest: NaiveTime, latest: NaiveTime) -> Result<Self, WindowError> {
        if latest < earliest {
            return Err(WindowError::Inverted { earliest, latest });
        }
        Ok(Self { earliest, latest })
    }

    /// Parse `HH:MM-HH:MM`.
    ///
    /// ```
    /// use ticket_watch::domain::TimeWindow;
    ///
    /// let window = TimeWindow::parse("08:00-12:00").unwrap();
    /// assert_eq!(window.to_string(), "08:00-12:00");
    /// assert!(TimeWindow::parse("12:00-08:00").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, WindowError> {
        let (earliest, latest) = s
            .split_once('-')
            .ok_or_else(|| WindowError::Format(s.to_string()))?;
        Self::new(parse_clock(earliest.trim())?, parse_clock(latest.trim())?)
    }

    pub fn earliest(&self) -> NaiveTime {
        self.earliest
    }

    pub fn latest(&self) -> NaiveTime {
        self.latest
    }

    /// Whether the time of day of `at` falls inside the window.
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        let time = at.time();
        self.earliest <= time && time <= self.latest
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.earliest.format("%H:%M"),
            self.latest.format("%H:%M")
        )
    }
}
