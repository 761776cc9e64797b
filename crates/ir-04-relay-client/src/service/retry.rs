//! # Retry Policy
//!
//! Unbounded fixed-interval retry for ledger calls.
//!
//! A definitive chaincode failure (status 500) is returned after one
//! attempt. Anything else waits one interval and tries again until it
//! succeeds or the shutdown signal fires, which yields
//! `ClientError::Cancelled` even in the middle of a wait.

use crate::domain::ClientError;
use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tracing::warn;

/// Fixed-backoff retry bound to a shutdown signal.
#[derive(Clone, Debug)]
pub struct RetryPolicy {
    interval: Duration,
    shutdown: watch::Receiver<bool>,
}

impl RetryPolicy {
    /// Retry every `interval` until `shutdown` turns true.
    pub fn new(interval: Duration, shutdown: watch::Receiver<bool>) -> Self {
        Self { interval, shutdown }
    }

    /// Wait between attempts.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// A receiver of the shutdown signal this policy observes.
    pub fn shutdown(&self) -> watch::Receiver<bool> {
        self.shutdown.clone()
    }

    /// Run `op` until it succeeds or fails definitively.
    pub async fn run<T, F, Fut>(&self, what: &str, mut op: F) -> Result<T, ClientError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        let mut shutdown = self.shutdown.clone();
        let mut attempt: u64 = 0;
        loop {
            if *shutdown.borrow() {
                return Err(ClientError::Cancelled);
            }
            attempt += 1;
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_definitive() || e == ClientError::Cancelled => return Err(e),
                Err(e) => {
                    warn!(
                        "[ir-04] {} failed (attempt {}): {}; retrying in {:?}",
                        what, attempt, e, self.interval
                    );
                    tokio::select! {
                        _ = tokio::time::sleep(self.interval) => {}
                        _ = wait_for_shutdown(&mut shutdown) => return Err(ClientError::Cancelled),
                    }
                }
            }
        }
    }
}

/// Resolve once the shutdown flag is true. Never resolves if every sender
/// is gone without raising it.
pub async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow_and_update() {
            return;
        }
        if shutdown.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
