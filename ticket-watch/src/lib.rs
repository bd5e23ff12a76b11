//! Railway ticket availability watcher.
//!
//! Resolves station names to codes, queries the booking service for seat
//! availability on a date, and keeps polling until matching tickets appear.

pub mod domain;
pub mod query;
pub mod stations;
pub mod watch;
