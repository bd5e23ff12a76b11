//! Repeated querying of one route.
//!
//! Each cycle queries the source once, keeps the tickets the filter accepts,
//! and reports them. Cycles are separated by the configured interval. A
//! failed query ends polling: the source has already retried transient
//! failures, so an error here means the service is unusable for now.

use tracing::{debug, info, trace};

use crate::domain::{Ticket, TicketQuery};
use crate::query::{QueryError, TicketSource};

use super::config::WatchConfig;
use super::filter::TicketFilter;

/// Polls a [`TicketSource`] for one route.
#[derive(Debug, Clone)]
pub struct Poller<S> {
    source: S,
    config: WatchConfig,
}

impl<S: TicketSource> Poller<S> {
    pub fn new(source: S, config: WatchConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &WatchConfig {
        &self.config
    }

    /// Run one cycle and return the accepted tickets.
    pub async fn poll_once(&self, query: &TicketQuery) -> Result<Vec<Ticket>, QueryError> {
        let filter = TicketFilter::for_query(query, self.config.window);
        let tickets = self.source.tickets(query).await?;
        let total = tickets.len();

        let accepted: Vec<Ticket> = tickets
            .into_iter()
            .filter(|ticket| match filter.check(ticket) {
                Ok(()) => true,
                Err(reason) => {
                    trace!(train = %ticket.train, %reason, "skipping ticket");
                    false
                }
            })
            .collect();

        debug!(%query, total, accepted = accepted.len(), "poll cycle finished");
        Ok(accepted)
    }

    /// Poll until a query fails, calling `on_match` for every accepted ticket.
    ///
    /// Never returns on its own otherwise; stop it by dropping the future.
    pub async fn run<F>(&self, query: &TicketQuery, mut on_match: F) -> QueryError
    where
        F: FnMut(&Ticket),
    {
        info!(
            %query,
            interval_secs = self.config.interval.as_secs_f64(),
            window = ?self.config.window.map(|w| w.to_string()),
            "watching for tickets"
        );

        let mut cycle = 0u64;
        loop {
            cycle += 1;
            let tickets = match self.poll_once(query).await {
                Ok(tickets) => tickets,
                Err(e) => return e,
            };

            if !tickets.is_empty() {
                info!(cycle, matches = tickets.len(), "found tickets");
            }
            for ticket in &tickets {
                on_match(ticket);
            }

            tokio::time::sleep(self.config.interval).await;
        }
    }
}
