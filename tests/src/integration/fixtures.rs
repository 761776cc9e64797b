//! Chain fixtures shared by the flow tests.

use crate::hub::SimulatedHub;
use ir_04_relay_client::{ClientError, LedgerResponse, RelayClient};
use relay_node::config::DIRECT_MODE;
use relay_node::{RelayConfig, RelayNode, RunningRelay};
use shared_types::{FullServiceId, Ibtp, IbtpType};
use std::time::Duration;
use tokio::time::timeout;

/// Local service of the sample transfer chaincode.
pub const TRANSFER_SERVICE: &str = "mychannel&transfer";

const DELIVERY_TIMEOUT: Duration = Duration::from_secs(2);

/// One running relay node and its ledger.
pub struct Chain {
    node: RelayNode,
    running: RunningRelay,
}

impl Chain {
    /// Relay-mode chain `appchain_id` under hub `1356`.
    pub async fn relay(appchain_id: &str) -> Self {
        let mut config = base_config();
        config.fabric.appchain_id = appchain_id.to_string();
        Self::start(config).await
    }

    /// Direct-mode chain `appchain_id` peered with `peer`.
    pub async fn direct(appchain_id: &str, peer: &str) -> Self {
        let mut config = base_config();
        config.fabric.bxh_id = String::new();
        config.fabric.appchain_id = appchain_id.to_string();
        config.mode.kind = DIRECT_MODE.to_string();
        config.mode.direct.chain_id = peer.to_string();
        config.mode.direct.service_id = TRANSFER_SERVICE.to_string();
        Self::start(config).await
    }

    async fn start(config: RelayConfig) -> Self {
        let node = RelayNode::new(config);
        let running = node.start().await.expect("relay node failed to start");
        Self { node, running }
    }

    /// Full ID of the transfer service on this chain.
    pub fn service(&self) -> String {
        let fabric = &self.node.config().fabric;
        FullServiceId::new(&fabric.bxh_id, &fabric.appchain_id, TRANSFER_SERVICE).to_string()
    }

    /// The relay client over this chain's broker.
    pub fn client(&self) -> &RelayClient {
        &self.running.client
    }

    /// Run a transfer chaincode function.
    pub async fn exec(&self, function: &str, args: &[&str]) -> Result<LedgerResponse, ClientError> {
        let args = args.iter().map(|a| a.as_bytes().to_vec()).collect();
        self.running.transfer.execute(function, args).await
    }

    /// Set an account balance.
    pub async fn set_balance(&self, account: &str, amount: u64) {
        self.exec("setBalance", &[account, &amount.to_string()])
            .await
            .unwrap();
    }

    /// Current balance; unknown accounts hold zero.
    pub async fn balance(&self, account: &str) -> u64 {
        let raw = self
            .running
            .transfer
            .query("getBalance", vec![account.as_bytes().to_vec()])
            .await
            .unwrap()
            .payload;
        if raw.is_empty() {
            0
        } else {
            String::from_utf8(raw).unwrap().parse().unwrap()
        }
    }

    /// Emit a cross-chain transfer to `dst`.
    pub async fn transfer_to(&self, dst: &str, sender: &str, receiver: &str, amount: u64) {
        self.exec("transfer", &[dst, sender, receiver, &amount.to_string()])
            .await
            .unwrap();
    }

    /// Next IBTP from this chain's poller.
    pub async fn next_ibtp(&mut self) -> Ibtp {
        timeout(DELIVERY_TIMEOUT, self.running.ibtps.recv())
            .await
            .expect("no IBTP delivered in time")
            .expect("delivery channel closed")
    }

    /// Whether the poller stays quiet for a few poll intervals.
    pub async fn is_quiet(&mut self) -> bool {
        timeout(Duration::from_millis(150), self.running.ibtps.recv())
            .await
            .is_err()
    }

    /// Stop the node.
    pub async fn stop(self) {
        self.node.shutdown(self.running).await;
    }
}

fn base_config() -> RelayConfig {
    let mut config = RelayConfig::default();
    config.fabric.poll_interval_ms = 20;
    config.fabric.retry_interval_ms = 10;
    config
}

/// Deliver an IBTP read from one chain to the other through `hub`. A
/// request goes to its destination and a receipt back to its source, so
/// either way `to` is the peer of the chain that produced it. Returns
/// false when the hub dropped it as a duplicate.
pub async fn route(hub: &SimulatedHub, ibtp: &Ibtp, to: &Chain) -> bool {
    let response = if ibtp.typ == IbtpType::Interchain {
        hub.forward_request(ibtp, to.client()).await
    } else {
        hub.forward_receipt(ibtp, to.client()).await
    };
    match response.unwrap() {
        Some(response) => {
            assert!(response.status, "{} rejected: {}", ibtp.id(), response.message);
            true
        }
        None => false,
    }
}

/// `from-to` counter key.
pub fn pair(from: &str, to: &str) -> String {
    format!("{}-{}", from, to)
}
