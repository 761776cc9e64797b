//! # Relay Runtime
//!
//! Wires the subsystems into a running relay.
//!
//! ## Startup Sequence
//!
//! 1. Open the ledger store (memory, or RocksDB when built with `rocksdb`)
//! 2. Deploy the tracker, broker and transfer chaincodes
//! 3. Initialize the broker with the configured chain IDs and mode
//! 4. Direct mode: register the peer chain and its allowed service
//! 5. Spawn the poller and, when a port is set, the verification service
//!
//! Every task watches the same shutdown channel.

use crate::config::RelayConfig;
use crate::http;
use ir_01_ledger_store::{InMemoryKVStore, InProcessLedger, KeyValueStore, LedgerError, Proposal};
use ir_02_transaction_tracker::{TransactionContract, TRANSACTION_CONTRACT_NAME};
use ir_03_broker_contract::{
    BrokerContract, TransferContract, BROKER_CONTRACT_NAME, TRANSFER_CONTRACT_NAME,
};
use ir_04_relay_client::{InProcessLedgerClient, LedgerClient, Poller, RelayClient};
use shared_types::Ibtp;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// How long shutdown waits for the spawned tasks.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Startup failures.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Deploying or bootstrapping a chaincode failed.
    #[error("ledger bootstrap: {0}")]
    Ledger(#[from] LedgerError),

    /// The ledger store could not be opened.
    #[error("ledger store: {0}")]
    Store(String),
}

/// Handles of a started relay.
pub struct RunningRelay {
    /// The relay client over the local broker.
    pub client: Arc<RelayClient>,
    /// Client for the sample transfer chaincode, for local traffic.
    pub transfer: Arc<dyn LedgerClient>,
    /// IBTPs produced by the poller.
    pub ibtps: mpsc::Receiver<Ibtp>,
    tasks: Vec<JoinHandle<()>>,
}

/// The relay node.
pub struct RelayNode {
    config: RelayConfig,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl RelayNode {
    /// Create a node; nothing runs until `start`.
    pub fn new(config: RelayConfig) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            config,
            shutdown_tx,
            shutdown_rx,
        }
    }

    /// Node configuration.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// A receiver of the shutdown signal.
    pub fn shutdown_signal(&self) -> watch::Receiver<bool> {
        self.shutdown_rx.clone()
    }

    /// Bootstrap the ledger and spawn the relay tasks.
    pub async fn start(&self) -> Result<RunningRelay, RuntimeError> {
        info!("===========================================");
        info!("  Relay Node v{}", crate::VERSION);
        info!(
            "  {}:{} in {} mode",
            self.config.fabric.bxh_id,
            self.config.fabric.appchain_id,
            if self.config.is_direct() { "direct" } else { "relay" }
        );
        info!("===========================================");

        let data_dir = self.config.fabric.data_dir.clone();
        if data_dir.is_empty() {
            return self.launch(InMemoryKVStore::new());
        }
        self.launch_persistent(&data_dir)
    }

    #[cfg(feature = "rocksdb")]
    fn launch_persistent(&self, data_dir: &str) -> Result<RunningRelay, RuntimeError> {
        use ir_01_ledger_store::{RocksDbConfig, RocksDbStore};
        let store = RocksDbStore::open(RocksDbConfig {
            path: data_dir.to_string(),
            ..Default::default()
        })
        .map_err(|e| RuntimeError::Store(e.to_string()))?;
        self.launch(store)
    }

    #[cfg(not(feature = "rocksdb"))]
    fn launch_persistent(&self, data_dir: &str) -> Result<RunningRelay, RuntimeError> {
        warn!(
            "[relay-node] Built without rocksdb, ignoring data_dir {} and keeping the ledger in memory",
            data_dir
        );
        self.launch(InMemoryKVStore::new())
    }

    fn launch<S: KeyValueStore + 'static>(&self, store: S) -> Result<RunningRelay, RuntimeError> {
        let fabric = &self.config.fabric;
        let ledger = Arc::new(InProcessLedger::new(fabric.channel_id.clone(), store));
        bootstrap(&ledger, &self.config)?;

        let broker: Arc<dyn LedgerClient> = Arc::new(InProcessLedgerClient::new(
            Arc::clone(&ledger),
            BROKER_CONTRACT_NAME,
            fabric.creator.clone(),
        ));
        let transfer: Arc<dyn LedgerClient> = Arc::new(InProcessLedgerClient::new(
            Arc::clone(&ledger),
            TRANSFER_CONTRACT_NAME,
            fabric.creator.clone(),
        ));
        let client = Arc::new(RelayClient::new(
            broker,
            self.config.client_config(),
            self.shutdown_signal(),
        ));

        let mut tasks = Vec::new();
        let (poller, ibtps) = Poller::new(Arc::clone(&client));
        tasks.push(tokio::spawn(poller.run()));

        if fabric.port != 0 {
            let port = fabric.port;
            let shutdown = self.shutdown_signal();
            tasks.push(tokio::spawn(async move {
                if let Err(e) = http::serve(port, shutdown).await {
                    error!("[relay-node] Verification service on port {} failed: {}", port, e);
                }
            }));
        }

        info!("[relay-node] Relay started with {} task(s)", tasks.len());
        Ok(RunningRelay {
            client,
            transfer,
            ibtps,
            tasks,
        })
    }

    /// Signal shutdown and wait for the tasks of `running`.
    pub async fn shutdown(&self, running: RunningRelay) {
        info!("[relay-node] Initiating graceful shutdown...");
        if let Err(e) = self.shutdown_tx.send(true) {
            error!("[relay-node] Failed to send shutdown signal: {}", e);
        }
        drop(running.ibtps);
        for task in running.tasks {
            match tokio::time::timeout(SHUTDOWN_GRACE, task).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!("[relay-node] Task ended abnormally: {}", e),
                Err(_) => warn!("[relay-node] Task still running after {:?}", SHUTDOWN_GRACE),
            }
        }
        info!("[relay-node] Shutdown complete");
    }
}

fn execute<S: KeyValueStore>(
    ledger: &InProcessLedger<S>,
    creator: &str,
    chaincode: &str,
    function: &str,
    args: &[&str],
) -> Result<Vec<u8>, LedgerError> {
    let args = args.iter().map(|a| a.as_bytes().to_vec()).collect();
    ledger
        .execute(&Proposal::new(creator, chaincode, function, args))
        .map(|tx| tx.response.payload)
}

/// Deploy the chaincodes and bring the broker into the configured state.
///
/// The sample transfer chaincode is registered and approved so local
/// traffic can flow right away.
pub fn bootstrap<S: KeyValueStore>(
    ledger: &InProcessLedger<S>,
    config: &RelayConfig,
) -> Result<(), LedgerError> {
    let creator = config.fabric.creator.as_str();
    let channel = ledger.channel_id().to_string();
    ledger.deploy(TRANSACTION_CONTRACT_NAME, Arc::new(TransactionContract::new()), creator, vec![])?;
    ledger.deploy(BROKER_CONTRACT_NAME, Arc::new(BrokerContract::new()), creator, vec![])?;
    ledger.deploy(TRANSFER_CONTRACT_NAME, Arc::new(TransferContract::new()), creator, vec![])?;

    let threshold = config.val_threshold().to_string();
    execute(
        ledger,
        creator,
        BROKER_CONTRACT_NAME,
        "initialize",
        &[&config.fabric.bxh_id, &config.fabric.appchain_id, &threshold],
    )?;
    execute(ledger, creator, TRANSFER_CONTRACT_NAME, "register", &["false"])?;
    execute(
        ledger,
        creator,
        BROKER_CONTRACT_NAME,
        "audit",
        &[&channel, TRANSFER_CONTRACT_NAME, "1"],
    )?;

    if config.is_direct() {
        let direct = &config.mode.direct;
        execute(
            ledger,
            creator,
            BROKER_CONTRACT_NAME,
            "registerAppchain",
            &[&direct.chain_id, BROKER_CONTRACT_NAME, "", &direct.rule_addr],
        )?;
        if !direct.service_id.is_empty() {
            execute(
                ledger,
                creator,
                BROKER_CONTRACT_NAME,
                "registerRemoteService",
                &[&direct.chain_id, &direct.service_id, ""],
            )?;
        }
        info!(
            "[relay-node] Registered peer chain {} (rule {})",
            direct.chain_id, direct.rule_addr
        );
    }
    Ok(())
}
