//! Polling configuration.

use std::time::Duration;

use crate::domain::TimeWindow;

/// Configuration parameters for watching a route.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchConfig {
    /// Pause between the end of one poll cycle and the start of the next.
    pub interval: Duration,

    /// Only report trains departing inside this window.
    pub window: Option<TimeWindow>,
}

impl WatchConfig {
    pub fn new(interval: Duration, window: Option<TimeWindow>) -> Self {
        Self { interval, window }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_window(mut self, window: TimeWindow) -> Self {
        self.window = Some(window);
        self
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            window: None,
        }
    }
}
