//! Acceptance rules for decoded tickets.

use crate::domain::{StationCode, Ticket, TicketQuery, TimeWindow};

/// Why a ticket was not reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    /// The record is for a different pair of stations than was asked for.
    /// The service mixes in trains between other stations of the same city.
    #[error("different route")]
    Route,

    #[error("no seats")]
    NoSeats,

    #[error("departs outside the window")]
    OutsideWindow,
}

/// Decides which tickets of a response are worth reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct TicketFilter {
    pub from: StationCode,
    pub to: StationCode,
    pub window: Option<TimeWindow>,
}

impl TicketFilter {
    pub fn new(from: StationCode, to: StationCode, window: Option<TimeWindow>) -> Self {
        Self { from, to, window }
    }

    /// Filter for the route of `query`.
    pub fn for_query(query: &TicketQuery, window: Option<TimeWindow>) -> Self {
        Self::new(query.from, query.to, window)
    }

    /// Accept `ticket` or say why not.
    ///
    /// The route must match exactly, at least one seat class must have
    /// seats, and the departure must fall inside the window if one is set.
    pub fn check(&self, ticket: &Ticket) -> Result<(), Rejection> {
        if !ticket.serves(self.from, self.to) {
            return Err(Rejection::Route);
        }
        if !ticket.has_seats() {
            return Err(Rejection::NoSeats);
        }
        if let Some(window) = &self.window
            && !window.contains(ticket.depart)
        {
            return Err(Rejection::OutsideWindow);
        }
        Ok(())
    }

    pub fn accepts(&self, ticket: &Ticket) -> bool {
        self.check(ticket).is_ok()
    }
}
