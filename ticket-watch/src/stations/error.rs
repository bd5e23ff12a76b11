//! Station lookup and station-list error types.

/// Errors from resolving station names or fetching the station list.
#[derive(Debug, thiserror::Error)]
pub enum StationError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Station list endpoint returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Station list body was not in the expected `var station_names ='...'` form
    #[error("unexpected station list format: {0}")]
    Format(String),

    /// The pattern is not a valid regular expression
    #[error("invalid station pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },

    /// No station matched the pattern
    #[error("no station matches {0:?}")]
    NotFound(String),

    /// Several stations matched and none was chosen
    #[error("{count} stations match {pattern:?} and none was chosen")]
    Unresolved { pattern: String, count: usize },
}
