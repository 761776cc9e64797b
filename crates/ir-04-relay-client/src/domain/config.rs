//! # Client Configuration

use std::time::Duration;

/// Default polling interval of the broker counters.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Default wait between two attempts of a failed ledger call.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(2);

/// Default capacity of the IBTP delivery channel.
pub const DEFAULT_DELIVERY_CAPACITY: usize = 1024;

/// Default direct-mode timeout period in seconds.
pub const DEFAULT_TIMEOUT_PERIOD: u64 = 60;

/// Relay client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Plugin name reported to the relay layer.
    pub name: String,
    /// Timeout height stamped on outbound request IBTPs.
    pub timeout_height: i64,
    /// Direct-mode timeout period in seconds.
    pub timeout_period: u64,
    /// Polling interval.
    pub poll_interval: Duration,
    /// Wait between retries.
    pub retry_interval: Duration,
    /// Capacity of the delivery channel. A full channel stalls the poller.
    pub delivery_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            name: "fabric".to_string(),
            timeout_height: 0,
            timeout_period: DEFAULT_TIMEOUT_PERIOD,
            poll_interval: DEFAULT_POLL_INTERVAL,
            retry_interval: DEFAULT_RETRY_INTERVAL,
            delivery_capacity: DEFAULT_DELIVERY_CAPACITY,
        }
    }
}

impl ClientConfig {
    /// Config for tests: same defaults with short intervals.
    pub fn for_testing() -> Self {
        Self {
            poll_interval: Duration::from_millis(20),
            retry_interval: Duration::from_millis(10),
            delivery_capacity: 16,
            ..Default::default()
        }
    }
}
