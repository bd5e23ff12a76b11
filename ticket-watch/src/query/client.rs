//! Ticket availability HTTP client.
//!
//! One query is a single `GET` against the left-ticket endpoint. The client
//! checks the status and content type, unwraps the JSON envelope, surfaces
//! business messages, and decodes each record. [`TicketClient::query`] wraps
//! that cycle in the retry policy.

use std::future::Future;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use tracing::{debug, warn};

use crate::domain::{Ticket, TicketQuery};

use super::decode::{DecodePolicy, decode_record};
use super::error::QueryError;
use super::retry::{RetryPolicy, with_retry};
use super::types::QueryEnvelope;

/// Default base URL for the booking service.
const DEFAULT_BASE_URL: &str = "https://kyfw.12306.cn";

/// Path of the left-ticket query endpoint.
const QUERY_PATH: &str = "/otn/leftTicket/query";

/// Ticket type requested; `ADULT` is a regular fare.
const DEFAULT_PURPOSE_CODE: &str = "ADULT";

/// The only content type a valid query response carries.
pub const EXPECTED_CONTENT_TYPE: &str = "application/json;charset=UTF-8";

/// How many bytes of an unparsable body to keep in errors.
const BODY_EXCERPT_LEN: usize = 500;

/// Source of ticket availability.
///
/// The poller depends on this rather than on [`TicketClient`] directly, so
/// it can be driven by scripted responses in tests.
pub trait TicketSource {
    /// All tickets the source reports for `query`, unfiltered.
    fn tickets(
        &self,
        query: &TicketQuery,
    ) -> impl Future<Output = Result<Vec<Ticket>, QueryError>>;
}

impl<T: TicketSource + ?Sized> TicketSource for &T {
    fn tickets(
        &self,
        query: &TicketQuery,
    ) -> impl Future<Output = Result<Vec<Ticket>, QueryError>> {
        (**self).tickets(query)
    }
}

/// Configuration for the ticket client.
#[derive(Debug, Clone)]
pub struct TicketClientConfig {
    /// Base URL of the booking service
    pub base_url: String,
    /// Value of the `purpose_codes` query parameter
    pub purpose_code: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Skip TLS certificate validation.
    ///
    /// The booking service presents a chain that common root stores do not
    /// trust, so this defaults to `true`. Do not reuse this client for
    /// anything else.
    pub accept_invalid_certs: bool,
    /// Treatment of malformed fields inside records
    pub decode_policy: DecodePolicy,
    /// Retry behavior for transient failures
    pub retry: RetryPolicy,
}

impl TicketClientConfig {
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

    pub fn with_decode_policy(mut self, policy: DecodePolicy) -> Self {
        self.decode_policy = policy;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

impl Default for TicketClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            purpose_code: DEFAULT_PURPOSE_CODE.to_string(),
            timeout_secs: 30,
            accept_invalid_certs: true,
            decode_policy: DecodePolicy::default(),
            retry: RetryPolicy::default(),
        }
    }
}

/// Client for the left-ticket query endpoint.
#[derive(Debug, Clone)]
pub struct TicketClient {
    http: reqwest::Client,
    base_url: String,
    purpose_code: String,
    decode_policy: DecodePolicy,
    retry: RetryPolicy,
}

impl TicketClient {
    /// Create a new client with the given configuration.
    pub fn new(config: TicketClientConfig) -> Result<Self, QueryError> {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            purpose_code: config.purpose_code,
            decode_policy: config.decode_policy,
            retry: config.retry,
        })
    }

    /// Query availability, retrying transient failures.
    ///
    /// Business messages from the service are returned on the first attempt.
    /// Any other failure is retried until the policy's budget runs out, which
    /// yields [`QueryError::RetryBudgetExceeded`].
    pub async fn query(&self, query: &TicketQuery) -> Result<Vec<Ticket>, QueryError> {
        with_retry(&self.retry, move || self.fetch_once(query)).await
    }

    /// One request/validate/decode cycle, without retries.
    pub async fn fetch_once(&self, query: &TicketQuery) -> Result<Vec<Ticket>, QueryError> {
        let url = format!("{}{}", self.base_url, QUERY_PATH);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("leftTicketDTO.train_date", query.date_param()),
                ("leftTicketDTO.from_station", query.from.to_string()),
                ("leftTicketDTO.to_station", query.to.to_string()),
                ("purpose_codes", self.purpose_code.clone()),
            ])
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(QueryError::Status {
                status: status.as_u16(),
                message: body,
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        if content_type.as_deref() != Some(EXPECTED_CONTENT_TYPE) {
            return Err(QueryError::ContentType {
                found: content_type,
            });
        }

        let body = response.text().await?;

        let envelope: QueryEnvelope =
            serde_json::from_str(&body).map_err(|e| QueryError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(BODY_EXCERPT_LEN).collect()),
            })?;

        let messages = envelope.messages.into_vec();
        if !messages.is_empty() {
            return Err(QueryError::Business { messages });
        }

        let tickets = decode_results(&envelope.data.result, self.decode_policy)?;
        debug!(
            %query,
            records = envelope.data.result.len(),
            tickets = tickets.len(),
            "decoded query response"
        );
        Ok(tickets)
    }
}

impl TicketSource for TicketClient {
    async fn tickets(&self, query: &TicketQuery) -> Result<Vec<Ticket>, QueryError> {
        self.query(query).await
    }
}

/// Decode every record of a response.
///
/// Under [`DecodePolicy::Strict`] a bad record is dropped and the rest are
/// kept. Under [`DecodePolicy::Lenient`] only structurally broken records can
/// fail, and one of those means the response is garbled, so the whole batch
/// fails.
pub fn decode_results(lines: &[String], policy: DecodePolicy) -> Result<Vec<Ticket>, QueryError> {
    let mut tickets = Vec::with_capacity(lines.len());

    for line in lines {
        match decode_record(line, policy) {
            Ok(ticket) => tickets.push(ticket),
            Err(e) if policy == DecodePolicy::Strict => {
                warn!(error = %e, "dropping malformed ticket record");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(tickets)
}
