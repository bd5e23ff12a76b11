//! Ticket availability records and the queries that produce them.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

use super::{SeatCount, StationCode};

/// One train's availability between two stations, decoded from a single
/// record of a query response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    /// Train number, e.g. "G101".
    pub train: String,
    /// Status text from the service. Opaque.
    pub status: String,
    pub from: StationCode,
    pub to: StationCode,
    pub depart: NaiveDateTime,
    pub arrive: NaiveDateTime,
    pub second_class: SeatCount,
    pub standing: SeatCount,
}

impl Ticket {
    /// Whether the record covers exactly the `from` → `to` route.
    pub fn serves(&self, from: StationCode, to: StationCode) -> bool {
        self.from == from && self.to == to
    }

    /// Whether second-class or standing seats can be bought.
    pub fn has_seats(&self) -> bool {
        self.second_class.is_available() || self.standing.is_available()
    }

    /// Display with the given station names in place of the codes.
    pub fn with_names<'a>(&'a self, from: &'a str, to: &'a str) -> NamedTicket<'a> {
        NamedTicket {
            ticket: self,
            from,
            to,
        }
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.with_names(self.from.as_str(), self.to.as_str()), f)
    }
}

/// A [`Ticket`] formatted with station names. See [`Ticket::with_names`].
#[derive(Debug, Clone, Copy)]
pub struct NamedTicket<'a> {
    ticket: &'a Ticket,
    from: &'a str,
    to: &'a str,
}

impl fmt::Display for NamedTicket<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = self.ticket;
        write!(
            f,
            "[{}][{:<5}] [时刻]{}~{} [车站]{}->{} [座位]二等:{}/站票:{}",
            t.status,
            t.train,
            t.depart.format("%H:%M"),
            t.arrive.format("%H:%M"),
            self.from,
            self.to,
            t.second_class,
            t.standing
        )
    }
}

/// Parameters of one availability query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicketQuery {
    pub date: NaiveDate,
    pub from: StationCode,
    pub to: StationCode,
}

impl TicketQuery {
    pub fn new(date: NaiveDate, from: StationCode, to: StationCode) -> Self {
        Self { date, from, to }
    }

    /// Travel date as sent to the service (`YYYY-MM-DD`).
    pub fn date_param(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

impl fmt::Display for TicketQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}->{}", self.date_param(), self.from, self.to)
    }
}
