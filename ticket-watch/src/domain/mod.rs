//! Domain types for ticket watching.
//!
//! These types represent validated data from the booking service. Station
//! codes are checked at construction, seat counts are a closed set of
//! states, and ticket times are always anchored to the travel date.

mod seats;
mod station;
mod ticket;
mod time;

pub use seats::{InvalidSeatMarker, MARKER_AVAILABLE, MARKER_NONE, SeatCount};
pub use station::{InvalidStationCode, Station, StationCode};
pub use ticket::{NamedTicket, Ticket, TicketQuery};
pub use time::{
    TimeError, TimeWindow, WindowError, parse_clock, parse_record_time, parse_travel_date,
};
