//! Station directory and station list client.
//!
//! Provides name/abbreviation → station resolution over a table fetched
//! from the booking service at start-up, or the built-in bootstrap table.

mod bootstrap;
mod client;
mod directory;
mod error;

pub use bootstrap::bootstrap_directory;
pub use client::{StationClient, StationClientConfig, parse_station_list};
pub use directory::{NonInteractive, StationChooser, StationDirectory};
pub use error::StationError;
