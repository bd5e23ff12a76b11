//! Left-ticket query client.
//!
//! This module provides an HTTP client for the booking service's ticket
//! availability endpoint.
//!
//! Key characteristics of the endpoint:
//! - Results are `|`-delimited strings with fixed field positions, decoded
//!   in [`decode`]
//! - A well-formed response may still carry `messages` rejecting the request
//!   (e.g. a date outside the sale period); those are never retried
//! - The service throttles aggressively, so other failures are retried with
//!   exponential backoff under an elapsed-time budget

mod client;
pub mod decode;
mod error;
mod retry;
mod types;

pub use client::{
    EXPECTED_CONTENT_TYPE, TicketClient, TicketClientConfig, TicketSource, decode_results,
};
pub use decode::{DecodeError, DecodePolicy, decode_record};
pub use error::QueryError;
pub use retry::{RetryPolicy, with_retry};
pub use types::{Messages, QueryData, QueryEnvelope};
