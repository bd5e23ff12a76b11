//! Ticket query error types.

use std::time::Duration;

use super::decode::DecodeError;

/// Errors from querying ticket availability.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Service answered with a status other than 200
    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    /// Service answered with an unexpected content type
    #[error("unexpected content type: {}", found.as_deref().unwrap_or("<none>"))]
    ContentType { found: Option<String> },

    /// Response body was not a valid envelope
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// A ticket record in the response could not be decoded
    #[error("bad ticket record: {0}")]
    Record(#[from] DecodeError),

    /// Service rejected the request itself, e.g. an unsellable date
    #[error("service message: {}", messages.join(";"))]
    Business { messages: Vec<String> },

    /// Transient failures kept happening until the retry budget ran out
    #[error("retry budget exceeded after {attempts} attempts in {elapsed:?}: {last}")]
    RetryBudgetExceeded {
        elapsed: Duration,
        attempts: u32,
        #[source]
        last: Box<QueryError>,
    },
}

impl QueryError {
    /// Whether repeating the same request might succeed.
    ///
    /// Business messages describe a request the service will never accept,
    /// and an exhausted budget is already the end of retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            QueryError::Http(_)
            | QueryError::Status { .. }
            | QueryError::ContentType { .. }
            | QueryError::Json { .. }
            | QueryError::Record(_) => true,
            QueryError::Business { .. } | QueryError::RetryBudgetExceeded { .. } => false,
        }
    }
}
