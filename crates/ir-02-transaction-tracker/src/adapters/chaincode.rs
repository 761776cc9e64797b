//! # Transaction Contract
//!
//! Chaincode dispatch over `TransactionTracker`. Status and timestamp
//! queries return 8-byte big endian values; list queries return JSON.

use crate::domain::{TrackerError, BAN_LIST_SEPARATOR};
use crate::ports::{AppchainRegistryApi, TransactionStatusApi};
use crate::service::TransactionTracker;
use ir_01_ledger_store::{Chaincode, ChaincodeStub};
use shared_types::{ibtp_id, ChaincodeResponse};
use tracing::{debug, info};

/// Name the broker uses to reach the tracker.
pub const TRANSACTION_CONTRACT_NAME: &str = "transaction";

/// The tracker chaincode.
#[derive(Debug, Default, Clone, Copy)]
pub struct TransactionContract;

impl TransactionContract {
    /// Create the chaincode.
    pub fn new() -> Self {
        Self
    }

    fn dispatch(stub: &mut ChaincodeStub<'_>) -> Result<Vec<u8>, TrackerError> {
        let args = stub.string_params()?;
        let function = stub.function().to_string();
        debug!("[ir-02] invoke {} with {} args", function, args.len());

        match function.as_str() {
            "initialize" => {
                TransactionTracker::new(stub).reset()?;
                info!("[ir-02] Transaction tracker reset");
                Ok(Vec::new())
            }
            "registerAppchain" => {
                expect_args(&args, 4)?;
                TransactionTracker::new(stub).register_appchain(&args[0], &args[1], &args[2], &args[3])?;
                Ok(format!("registerAppchain {} succesful", args[0]).into_bytes())
            }
            "getAppchainInfo" => {
                expect_args(&args, 1)?;
                let chain = TransactionTracker::new(stub).appchain(&args[0])?;
                to_json(&chain)
            }
            "registerRemoteService" => {
                expect_args(&args, 3)?;
                let ban_list = args[2].split(BAN_LIST_SEPARATOR).map(str::to_string).collect();
                TransactionTracker::new(stub).register_remote_service(&args[0], &args[1], ban_list)?;
                Ok(Vec::new())
            }
            "getRSWhiteList" => {
                expect_args(&args, 1)?;
                let list = TransactionTracker::new(stub).remote_ban_list(&args[0])?;
                to_json(&list.unwrap_or_default())
            }
            "getRemoteServiceList" => {
                let services = TransactionTracker::new(stub).remote_services()?;
                to_json(&services)
            }
            "startTransaction" => {
                let id = id_from_args(&args)?;
                let now = stub.tx_timestamp();
                TransactionTracker::new(stub).start_transaction(&id, now)?;
                Ok(Vec::new())
            }
            "rollbackTransaction" => {
                let id = id_from_args(&args)?;
                TransactionTracker::new(stub).rollback_transaction(&id)?;
                Ok(Vec::new())
            }
            "endTransactionSuccess" => {
                let id = id_from_args(&args)?;
                TransactionTracker::new(stub).end_transaction_success(&id)?;
                Ok(Vec::new())
            }
            "endTransactionFail" => {
                let id = id_from_args(&args)?;
                TransactionTracker::new(stub).end_transaction_fail(&id)?;
                Ok(Vec::new())
            }
            "endTransactionRollback" => {
                let id = id_from_args(&args)?;
                TransactionTracker::new(stub).end_transaction_rollback(&id)?;
                Ok(Vec::new())
            }
            "getTransactionStatus" => {
                expect_args(&args, 1)?;
                let status = TransactionTracker::new(stub).transaction_status(&args[0])?;
                Ok(status.code().to_be_bytes().to_vec())
            }
            "getStartTimestamp" => {
                expect_args(&args, 1)?;
                let stamp = TransactionTracker::new(stub).start_timestamp(&args[0])?;
                Ok(stamp.to_be_bytes().to_vec())
            }
            other => Err(TrackerError::InvalidArguments(format!("invalid function: {}", other))),
        }
    }
}

impl Chaincode for TransactionContract {
    fn init(&self, _stub: &mut ChaincodeStub<'_>) -> ChaincodeResponse {
        ChaincodeResponse::success(Vec::new())
    }

    fn invoke(&self, stub: &mut ChaincodeStub<'_>) -> ChaincodeResponse {
        match Self::dispatch(stub) {
            Ok(payload) => ChaincodeResponse::success(payload),
            Err(e) => ChaincodeResponse::error(e.to_string()),
        }
    }
}

fn expect_args(args: &[String], count: usize) -> Result<(), TrackerError> {
    if args.len() != count {
        return Err(TrackerError::InvalidArguments(format!(
            "incorrect number of arguments, expecting {}",
            count
        )));
    }
    Ok(())
}

/// `(from, to, index)` arguments to an IBTP id.
fn id_from_args(args: &[String]) -> Result<String, TrackerError> {
    expect_args(args, 3)?;
    let index = args[2]
        .parse::<u64>()
        .map_err(|_| TrackerError::InvalidArguments(format!("invalid index {}", args[2])))?;
    Ok(ibtp_id(&args[0], &args[1], index))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, TrackerError> {
    serde_json::to_vec(value).map_err(|e| TrackerError::InvalidArguments(e.to_string()))
}
