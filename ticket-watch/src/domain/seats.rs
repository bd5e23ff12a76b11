//! Seat availability as reported by the booking service.
//!
//! The service reports each seat class with a short marker: `有` when seats
//! exist but the count is withheld, `无` (or an empty/`*` placeholder) when
//! none are left, and a decimal count otherwise. The same information is also
//! exposed as the integer sentinel `-1` / `0` / `n`.

use std::fmt;
use std::num::NonZeroU32;

/// Marker for "available, count not disclosed".
pub const MARKER_AVAILABLE: &str = "有";

/// Marker for "none available".
pub const MARKER_NONE: &str = "无";

/// Markers the service uses for a class that has no seats.
const NONE_MARKERS: [&str; 3] = ["", MARKER_NONE, "*"];

/// Error returned for a seat marker that is neither a known marker nor a count.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid seat marker: {0:?}")]
pub struct InvalidSeatMarker(pub String);

/// Remaining seats in one class of a train.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeatCount {
    /// Seats are available but the service does not say how many.
    Unspecified,
    /// No seats left.
    SoldOut,
    /// An exact number of remaining seats.
    Remaining(NonZeroU32),
}

impl SeatCount {
    /// Build from an exact count; zero means sold out.
    pub fn from_count(n: u32) -> Self {
        NonZeroU32::new(n).map_or(SeatCount::SoldOut, SeatCount::Remaining)
    }

    /// Parse a marker as it appears in a ticket record.
    ///
    /// ```
    /// use ticket_watch::domain::SeatCount;
    ///
    /// assert_eq!(SeatCount::parse_marker("有").unwrap(), SeatCount::Unspecified);
    /// assert_eq!(SeatCount::parse_marker("无").unwrap(), SeatCount::SoldOut);
    /// assert_eq!(SeatCount::parse_marker("").unwrap(), SeatCount::SoldOut);
    /// assert_eq!(SeatCount::parse_marker("5").unwrap(), SeatCount::from_count(5));
    /// assert!(SeatCount::parse_marker("--").is_err());
    /// ```
    pub fn parse_marker(s: &str) -> Result<Self, InvalidSeatMarker> {
        if s == MARKER_AVAILABLE {
            return Ok(SeatCount::Unspecified);
        }
        if NONE_MARKERS.contains(&s) {
            return Ok(SeatCount::SoldOut);
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidSeatMarker(s.to_string()));
        }
        s.parse::<u32>()
            .map(SeatCount::from_count)
            .map_err(|_| InvalidSeatMarker(s.to_string()))
    }

    /// Canonical marker for this value. `parse_marker` maps it back to `self`.
    pub fn marker(&self) -> String {
        match self {
            SeatCount::Unspecified => MARKER_AVAILABLE.to_string(),
            SeatCount::SoldOut => MARKER_NONE.to_string(),
            SeatCount::Remaining(n) => n.to_string(),
        }
    }

    /// Integer encoding: `-1` unspecified, `0` sold out, `n` remaining.
    pub fn sentinel(&self) -> i64 {
        match self {
            SeatCount::Unspecified => -1,
            SeatCount::SoldOut => 0,
            SeatCount::Remaining(n) => i64::from(n.get()),
        }
    }

    /// Inverse of [`SeatCount::sentinel`]. Returns `None` below `-1` or above `u32::MAX`.
    pub fn from_sentinel(value: i64) -> Option<Self> {
        match value {
            -1 => Some(SeatCount::Unspecified),
            0 => Some(SeatCount::SoldOut),
            n => u32::try_from(n).ok().map(SeatCount::from_count),
        }
    }

    /// Whether at least one seat can be bought.
    pub fn is_available(&self) -> bool {
        !matches!(self, SeatCount::SoldOut)
    }
}

impl fmt::Display for SeatCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.marker())
    }
}
