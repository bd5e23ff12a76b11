//! Watching a route for tickets.
//!
//! The poller re-queries the booking service on a fixed interval and reports
//! tickets that match the requested route, have seats, and depart inside
//! the optional time window.

mod config;
mod filter;
mod poller;

pub use config::WatchConfig;
pub use filter::{Rejection, TicketFilter};
pub use poller::Poller;
