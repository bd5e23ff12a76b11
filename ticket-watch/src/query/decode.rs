//! Decoding of raw ticket records into domain types.
//!
//! Each entry of the query response's `result` array is one `|`-delimited
//! record per train. Field positions are fixed by the service and live in
//! [`fields`]; nothing else in the crate indexes into a record.

use chrono::NaiveDateTime;

use crate::domain::{
    InvalidSeatMarker, InvalidStationCode, SeatCount, StationCode, Ticket, TimeError,
    parse_record_time,
};

/// Positions of the fields we read from a ticket record.
pub mod fields {
    /// Booking status text ("预订", "列车停运", ...).
    pub const STATUS: usize = 1;
    /// Public train number, e.g. "G101".
    pub const TRAIN: usize = 3;
    /// Code of the station the record departs from.
    pub const FROM: usize = 6;
    /// Code of the station the record arrives at.
    pub const TO: usize = 7;
    /// Departure clock time, `HH:MM`.
    pub const DEPART: usize = 8;
    /// Arrival clock time, `HH:MM`.
    pub const ARRIVE: usize = 9;
    /// Travel date, `YYYYMMDD`.
    pub const DATE: usize = 13;
    /// Standing (no seat) availability marker.
    pub const STANDING: usize = 26;
    /// Second-class seat availability marker.
    pub const SECOND_CLASS: usize = 30;

    /// Smallest record that holds every field above.
    pub const MIN_FIELDS: usize = SECOND_CLASS + 1;
}

/// How to treat malformed times and seat markers inside a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DecodePolicy {
    /// Malformed times become [`NaiveDateTime::default`] and malformed seat
    /// markers become [`SeatCount::SoldOut`].
    #[default]
    Lenient,
    /// Malformed times or seat markers reject the record.
    Strict,
}

/// Error decoding a single ticket record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("record has {found} fields, need at least {}", fields::MIN_FIELDS)]
    TooFewFields { found: usize },

    #[error(transparent)]
    StationCode(#[from] InvalidStationCode),

    #[error(transparent)]
    Time(#[from] TimeError),

    #[error(transparent)]
    SeatCount(#[from] InvalidSeatMarker),
}

/// Decode one raw record.
///
/// Structural problems (too few fields, unusable station codes) always fail.
/// Bad times and seat markers are handled according to `policy`.
pub fn decode_record(line: &str, policy: DecodePolicy) -> Result<Ticket, DecodeError> {
    let tab: Vec<&str> = line.split('|').collect();
    if tab.len() < fields::MIN_FIELDS {
        return Err(DecodeError::TooFewFields { found: tab.len() });
    }

    let from = StationCode::parse(tab[fields::FROM])?;
    let to = StationCode::parse(tab[fields::TO])?;

    let date = tab[fields::DATE];
    let depart = policy.time(parse_record_time(date, tab[fields::DEPART]))?;
    let arrive = policy.time(parse_record_time(date, tab[fields::ARRIVE]))?;

    let second_class = policy.seats(SeatCount::parse_marker(tab[fields::SECOND_CLASS]))?;
    let standing = policy.seats(SeatCount::parse_marker(tab[fields::STANDING]))?;

    Ok(Ticket {
        train: tab[fields::TRAIN].to_string(),
        status: tab[fields::STATUS].to_string(),
        from,
        to,
        depart,
        arrive,
        second_class,
        standing,
    })
}

impl DecodePolicy {
    fn time(self, parsed: Result<NaiveDateTime, TimeError>) -> Result<NaiveDateTime, DecodeError> {
        match (self, parsed) {
            (_, Ok(time)) => Ok(time),
            (DecodePolicy::Lenient, Err(_)) => Ok(NaiveDateTime::default()),
            (DecodePolicy::Strict, Err(e)) => Err(e.into()),
        }
    }

    fn seats(
        self,
        parsed: Result<SeatCount, InvalidSeatMarker>,
    ) -> Result<SeatCount, DecodeError> {
        match (self, parsed) {
            (_, Ok(seats)) => Ok(seats),
            (DecodePolicy::Lenient, Err(_)) => Ok(SeatCount::SoldOut),
            (DecodePolicy::Strict, Err(e)) => Err(e.into()),
        }
    }
}
