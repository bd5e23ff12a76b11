//! Station list client for the booking service.
//!
//! The service publishes its station table as a JavaScript file:
//!
//! ```text
//! var station_names ='@bjb|北京北|VAP|beijingbei|bjb|0@bjd|北京东|BOP|beijingdong|bjd|1';
//! ```
//!
//! Each `@`-separated tuple is `|`-separated with the display name, code,
//! pinyin and abbreviation in positions 1 to 4.

use tracing::{debug, warn};

use crate::domain::{Station, StationCode};

use super::directory::StationDirectory;
use super::error::StationError;

/// Default base URL for the booking service.
const DEFAULT_BASE_URL: &str = "https://kyfw.12306.cn";

/// Path of the station list script.
const STATION_LIST_PATH: &str = "/otn/resources/js/framework/station_name.js";

/// Station list version requested by the service's own web client.
const DEFAULT_STATION_VERSION: &str = "1.9055";

/// Opening of the station list body.
const BODY_PREFIX: &str = "var station_names ='";

/// Minimum fields per station tuple (unused, name, code, pinyin, abbrev).
const MIN_STATION_FIELDS: usize = 5;

/// Configuration for the station list client.
#[derive(Debug, Clone)]
pub struct StationClientConfig {
    /// Base URL of the booking service
    pub base_url: String,
    /// Value of the `station_version` query parameter
    pub station_version: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Skip TLS certificate validation
    pub accept_invalid_certs: bool,
}

impl StationClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for StationClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            station_version: DEFAULT_STATION_VERSION.to_string(),
            timeout_secs: 30,
            // The service's certificate chain is not trusted by common root stores.
            accept_invalid_certs: true,
        }
    }
}

/// Client for the station list endpoint.
#[derive(Debug, Clone)]
pub struct StationClient {
    http: reqwest::Client,
    base_url: String,
    station_version: String,
}

impl StationClient {
    pub fn new(config: StationClientConfig) -> Result<Self, StationError> {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            station_version: config.station_version,
        })
    }

    /// Download and parse the full station list.
    pub async fn fetch_all(&self) -> Result<StationDirectory, StationError> {
        let url = format!("{}{}", self.base_url, STATION_LIST_PATH);

        let response = self
            .http
            .get(&url)
            .query(&[("station_version", self.station_version.as_str())])
            .send()
            .await?;
        let status = response.status();

        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(StationError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let stations = parse_station_list(&body)?;
        debug!(count = stations.len(), "fetched station list");

        Ok(StationDirectory::new(stations))
    }
}

/// Parse the body of the station list script.
///
/// Tuples that are too short or carry an invalid code are skipped.
pub fn parse_station_list(body: &str) -> Result<Vec<Station>, StationError> {
    let list = body
        .trim()
        .strip_prefix(BODY_PREFIX)
        .ok_or_else(|| StationError::Format("missing station_names prefix".to_string()))?;
    let list = list.trim_end_matches(';').trim_end_matches('\'');

    let stations = list
        .split('@')
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| match parse_station(entry) {
            Some(station) => Some(station),
            None => {
                warn!(entry, "skipping malformed station entry");
                None
            }
        })
        .collect();

    Ok(stations)
}

fn parse_station(entry: &str) -> Option<Station> {
    let fields: Vec<&str> = entry.split('|').collect();
    if fields.len() < MIN_STATION_FIELDS {
        return None;
    }
    let code = StationCode::parse(fields[2]).ok()?;
    Some(Station::new(fields[1], code, fields[3], fields[4]))
}
