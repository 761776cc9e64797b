//! # Poller
//!
//! Walks the broker counters on a fixed interval and delivers every new
//! message in index order.
//!
//! | Counter family | Message read            | Delivered as     |
//! |----------------|-------------------------|------------------|
//! | outer          | `get_out_message`       | request IBTP     |
//! | inner          | `get_receipt_message`   | receipt IBTP     |
//!
//! The poller owns its cache of delivered indexes. An index is marked
//! delivered only after the channel accepted it; any failed read stops that
//! pair for the tick so the same index is read again next time.
//!
//! One case is passed over: the inner counter also moves on index updates,
//! which store no receipt. A receipt read the broker answers with
//! not-found is therefore an index with nothing to deliver. Outbound rows
//! are written in the same transaction as the outer counter, so no outbound
//! index is ever passed over.

use super::retry::wait_for_shutdown;
use super::RelayClient;
use crate::domain::ClientError;
use crate::ports::RelayQueryApi;
use shared_types::{Ibtp, ServicePair};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Which message stream a cached index belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Stream {
    Out,
    Receipt,
}

/// Polling task of one relay client.
pub struct Poller {
    client: Arc<RelayClient>,
    sender: mpsc::Sender<Ibtp>,
    shutdown: watch::Receiver<bool>,
    delivered: BTreeMap<(Stream, String), u64>,
}

impl Poller {
    /// Poller for `client` and the receiving end of its bounded delivery
    /// channel.
    pub fn new(client: Arc<RelayClient>) -> (Self, mpsc::Receiver<Ibtp>) {
        let (sender, receiver) = mpsc::channel(client.config().delivery_capacity.max(1));
        let shutdown = client.retry_policy().shutdown();
        let poller = Self {
            client,
            sender,
            shutdown,
            delivered: BTreeMap::new(),
        };
        (poller, receiver)
    }

    /// Resume from known counters instead of delivering from index 1.
    pub fn with_checkpoint(
        mut self,
        outer: BTreeMap<String, u64>,
        inner: BTreeMap<String, u64>,
    ) -> Self {
        for (pair, index) in outer {
            self.delivered.insert((Stream::Out, pair), index);
        }
        for (pair, index) in inner {
            self.delivered.insert((Stream::Receipt, pair), index);
        }
        self
    }

    /// Highest outbound index delivered for a pair.
    pub fn delivered_out(&self, pair: &str) -> u64 {
        self.cached(Stream::Out, pair)
    }

    /// Highest receipt index delivered for a pair.
    pub fn delivered_receipts(&self, pair: &str) -> u64 {
        self.cached(Stream::Receipt, pair)
    }

    /// Poll until shutdown or until the receiver is dropped.
    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.client.config().poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut shutdown = self.shutdown.clone();
        info!("[ir-04] Polling every {:?}", self.client.config().poll_interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.poll_once().await {
                        Ok(_) => {}
                        Err(ClientError::DeliveryClosed) => {
                            info!("[ir-04] Delivery channel closed, stop polling");
                            return;
                        }
                        Err(ClientError::Cancelled) => break,
                        Err(e) => warn!("[ir-04] Polling tick failed: {}", e),
                    }
                }
                _ = wait_for_shutdown(&mut shutdown) => break,
            }
        }
        info!("[ir-04] Stop long polling");
    }

    /// One tick: deliver everything between the cache and the counters.
    /// Returns how many IBTPs were delivered.
    pub async fn poll_once(&mut self) -> Result<usize, ClientError> {
        let outer = match self.client.get_outer_meta().await {
            Ok(meta) => meta,
            Err(e) => {
                warn!("[ir-04] Get outer meta: {}", e);
                return Ok(0);
            }
        };
        let inner = match self.client.get_inner_meta().await {
            Ok(meta) => meta,
            Err(e) => {
                warn!("[ir-04] Get inner meta: {}", e);
                return Ok(0);
            }
        };

        let mut delivered = 0;
        for (pair, remote) in outer {
            delivered += self.drain(Stream::Out, &pair, remote).await?;
        }
        for (pair, remote) in inner {
            delivered += self.drain(Stream::Receipt, &pair, remote).await?;
        }
        Ok(delivered)
    }

    fn cached(&self, stream: Stream, pair: &str) -> u64 {
        self.delivered
            .get(&(stream, pair.to_string()))
            .copied()
            .unwrap_or(0)
    }

    async fn drain(
        &mut self,
        stream: Stream,
        pair: &str,
        remote: u64,
    ) -> Result<usize, ClientError> {
        if let Err(e) = ServicePair::parse(pair) {
            warn!("[ir-04] Polling invalid service pair {}: {}", pair, e);
            return Ok(0);
        }

        let mut count = 0;
        let mut cached = self.cached(stream, pair);
        while cached < remote {
            let index = cached + 1;
            let fetched = match stream {
                Stream::Out => self.client.get_out_message(pair, index).await,
                Stream::Receipt => self.client.get_receipt_message(pair, index).await,
            };
            match fetched {
                Ok(ibtp) => {
                    self.deliver(ibtp).await?;
                    count += 1;
                }
                Err(ClientError::Cancelled) => return Err(ClientError::Cancelled),
                Err(e) if stream == Stream::Receipt && e.is_not_found() => {
                    debug!("[ir-04] No receipt stored for {} #{}", pair, index);
                }
                Err(e) => {
                    warn!("[ir-04] Polling {:?} message {} #{}: {}", stream, pair, index, e);
                    break;
                }
            }
            cached = index;
            self.delivered.insert((stream, pair.to_string()), cached);
        }
        if count > 0 {
            debug!("[ir-04] Delivered {} {:?} message(s) for {}", count, stream, pair);
        }
        Ok(count)
    }

    async fn deliver(&mut self, ibtp: Ibtp) -> Result<(), ClientError> {
        tokio::select! {
            sent = self.sender.send(ibtp) => sent.map_err(|_| ClientError::DeliveryClosed),
            _ = wait_for_shutdown(&mut self.shutdown) => Err(ClientError::Cancelled),
        }
    }
}
