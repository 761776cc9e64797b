//! # Transfer Contract
//!
//! Sample asset chaincode driving the broker end to end. Balances are
//! decimal strings; amounts travelling between chains are 8-byte big
//! endian.

use crate::adapters::broker::BROKER_CONTRACT_NAME;
use ir_01_ledger_store::{Chaincode, ChaincodeStub, LedgerError, StateAccess};
use shared_types::{encode_byte_args, ChaincodeResponse};
use std::collections::BTreeMap;
use tracing::debug;

/// Name the sample chaincode is deployed under.
pub const TRANSFER_CONTRACT_NAME: &str = "transfer";

const CHARGE_ARITY: usize = 3;
const ROLLBACK_ARITY: usize = 2;

/// The sample chaincode.
#[derive(Debug, Default, Clone, Copy)]
pub struct TransferContract;

type TransferResult = Result<Vec<u8>, String>;

impl TransferContract {
    /// Create the chaincode.
    pub fn new() -> Self {
        Self
    }

    fn register(stub: &mut ChaincodeStub<'_>, args: &[String]) -> TransferResult {
        if args.len() != 1 {
            return Err("incorrect number of arguments, expecting 1".to_string());
        }
        let response = call_broker(stub, "register", vec![args[0].clone()]);
        if !response.is_ok() {
            return Err(format!(
                "invoke chaincode '{}' err: {}",
                BROKER_CONTRACT_NAME, response.message
            ));
        }
        Ok(response.payload)
    }

    fn transfer(stub: &mut ChaincodeStub<'_>, args: &[String]) -> TransferResult {
        match args.len() {
            3 => {
                let amount = parse_amount(&args[2])?;
                debit(stub, &args[0], amount)?;
                let balance = balance(stub, &args[1])?;
                put_balance(stub, &args[1], balance.saturating_add(amount))?;
                Ok(Vec::new())
            }
            4 => {
                let (dst, sender, receiver) = (&args[0], &args[1], &args[2]);
                let amount = parse_amount(&args[3])?;
                debit(stub, sender, amount)?;

                let encoded = amount.to_be_bytes().to_vec();
                let call_args = vec![
                    sender.as_bytes().to_vec(),
                    receiver.as_bytes().to_vec(),
                    encoded.clone(),
                ];
                let rollback_args = vec![sender.as_bytes().to_vec(), encoded];
                let emit = vec![
                    dst.clone(),
                    "interchainCharge".to_string(),
                    encode_byte_args(&call_args),
                    String::new(),
                    String::new(),
                    "interchainRollback".to_string(),
                    encode_byte_args(&rollback_args),
                    "false".to_string(),
                ];
                let response = call_broker(stub, "EmitInterchainEvent", emit);
                if !response.is_ok() {
                    return Err(format!(
                        "invoke broker chaincode: {} - {}",
                        response.status, response.message
                    ));
                }
                Ok(Vec::new())
            }
            n => Err(format!("incorrect number of arguments {}", n)),
        }
    }

    /// Credit (or, on rollback, debit) receivers from `sender, receiver,
    /// amount` triples followed by the rollback flag.
    fn interchain_charge(stub: &mut ChaincodeStub<'_>, args: &[Vec<u8>]) -> ChaincodeResponse {
        if !called_by_broker(stub) {
            return ChaincodeResponse::error("caller is not broker");
        }
        if args.is_empty() || (args.len() - 1) % CHARGE_ARITY != 0 {
            return ChaincodeResponse::error(format!(
                "incorrect number of arguments, actual args length is {}",
                args.len()
            ));
        }
        let (triples, flag) = args.split_at(args.len() - 1);
        let is_rollback = flag[0] == b"true";

        let mut failure = None;
        let mut multi_status = vec![true; triples.len() / CHARGE_ARITY];
        let mut receivers: BTreeMap<String, u64> = BTreeMap::new();
        for (i, triple) in triples.chunks(CHARGE_ARITY).enumerate() {
            if triple[0].is_empty() {
                return ChaincodeResponse::error("incorrect sender info");
            }
            let receiver = text(&triple[1]);
            let amount = match decode_amount(&triple[2]) {
                Some(amount) => amount,
                None => {
                    failure = Some(format!("incorrect amount info:{:?}", triple[2]));
                    multi_status[i] = false;
                    continue;
                }
            };
            let current = match receivers.get(&receiver) {
                Some(current) => *current,
                None => match balance(stub, &receiver) {
                    Ok(current) => current,
                    Err(e) => {
                        failure = Some(e);
                        multi_status[i] = false;
                        continue;
                    }
                },
            };
            let next = if is_rollback {
                current.saturating_sub(amount)
            } else {
                current.saturating_add(amount)
            };
            receivers.insert(receiver, next);
        }

        for (receiver, amount) in &receivers {
            if let Err(e) = put_balance(stub, receiver, *amount) {
                return ChaincodeResponse::error(e);
            }
        }

        let payload = serde_json::json!({ "results": [], "multi_status": multi_status });
        let payload = serde_json::to_vec(&payload).unwrap_or_default();
        match failure {
            Some(message) => ChaincodeResponse {
                payload,
                ..ChaincodeResponse::error(message)
            },
            None => ChaincodeResponse::success(payload),
        }
    }

    /// Refund senders from `sender, amount` pairs, optionally followed by a
    /// JSON multi-status; entries whose status is true are skipped.
    fn interchain_rollback(stub: &mut ChaincodeStub<'_>, args: &[Vec<u8>]) -> TransferResult {
        if !called_by_broker(stub) {
            return Err("caller is not broker".to_string());
        }
        let (pairs, multi_status) = if args.len() % ROLLBACK_ARITY == 1 {
            let (pairs, tail) = args.split_at(args.len() - 1);
            let status: Vec<bool> = if tail[0] == b"null" {
                vec![false; pairs.len() / ROLLBACK_ARITY]
            } else {
                serde_json::from_slice(&tail[0])
                    .map_err(|e| format!("unmarshal multiStatus error: {}", e))?
            };
            (pairs, status)
        } else {
            (args, vec![false; args.len() / ROLLBACK_ARITY])
        };
        if multi_status.len() != pairs.len() / ROLLBACK_ARITY {
            return Err(format!(
                "incorrect multiStatus length, expect length is {}, actual length is {}",
                pairs.len() / ROLLBACK_ARITY,
                multi_status.len()
            ));
        }

        let mut senders: BTreeMap<String, u64> = BTreeMap::new();
        for (pair, done) in pairs.chunks(ROLLBACK_ARITY).zip(multi_status) {
            if done {
                continue;
            }
            let amount = decode_amount(&pair[1])
                .ok_or_else(|| format!("incorrect amount info:{:?}", pair[1]))?;
            let sender = text(&pair[0]);
            let current = match senders.get(&sender) {
                Some(current) => *current,
                None => balance(stub, &sender)?,
            };
            senders.insert(sender, current.saturating_add(amount));
        }
        for (sender, amount) in &senders {
            put_balance(stub, sender, *amount)?;
        }
        Ok(Vec::new())
    }
}

impl Chaincode for TransferContract {
    fn init(&self, _stub: &mut ChaincodeStub<'_>) -> ChaincodeResponse {
        ChaincodeResponse::success(Vec::new())
    }

    fn invoke(&self, stub: &mut ChaincodeStub<'_>) -> ChaincodeResponse {
        let function = stub.function().to_string();
        let raw = stub.params().to_vec();
        let args: Vec<String> = raw.iter().map(|p| text(p)).collect();
        debug!("[ir-03] transfer.{} with {} args", function, args.len());

        let result = match function.as_str() {
            "register" => Self::register(stub, &args),
            "transfer" => Self::transfer(stub, &args),
            "getBalance" => {
                if args.len() != 1 {
                    Err("incorrect number of arguments".to_string())
                } else {
                    stub.get_state(&args[0])
                        .map(Option::unwrap_or_default)
                        .map_err(|e| e.to_string())
                }
            }
            "setBalance" => {
                if args.len() != 2 {
                    Err("incorrect number of arguments".to_string())
                } else {
                    stub.put_state(&args[0], args[1].as_bytes().to_vec())
                        .map(|_| Vec::new())
                        .map_err(|e| e.to_string())
                }
            }
            "interchainCharge" => return Self::interchain_charge(stub, &raw),
            "interchainRollback" => Self::interchain_rollback(stub, &raw),
            other => Err(format!(
                "invalid function: {}, args: {}",
                other,
                args.join(",")
            )),
        };
        match result {
            Ok(payload) => ChaincodeResponse::success(payload),
            Err(message) => ChaincodeResponse::error(message),
        }
    }
}

fn text(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

fn call_broker(stub: &mut ChaincodeStub<'_>, function: &str, args: Vec<String>) -> ChaincodeResponse {
    let mut call = vec![function.as_bytes().to_vec()];
    call.extend(args.into_iter().map(String::into_bytes));
    let channel = stub.channel_id().to_string();
    stub.invoke_chaincode(BROKER_CONTRACT_NAME, call, &channel)
}

fn called_by_broker(stub: &ChaincodeStub<'_>) -> bool {
    stub.invoked_chaincode().name == BROKER_CONTRACT_NAME
}

fn parse_amount(raw: &str) -> Result<u64, String> {
    raw.parse()
        .map_err(|_| format!("get amount from arg: amount must be an integer, got {}", raw))
}

fn decode_amount(raw: &[u8]) -> Option<u64> {
    let array: [u8; 8] = raw.try_into().ok()?;
    Some(u64::from_be_bytes(array))
}

/// Balance of an account; unknown accounts hold zero.
fn balance(stub: &ChaincodeStub<'_>, account: &str) -> Result<u64, String> {
    match stub.get_state(account).map_err(|e: LedgerError| e.to_string())? {
        None => Ok(0),
        Some(raw) => String::from_utf8_lossy(&raw)
            .parse()
            .map_err(|_| format!("got account value from {}: not a number", account)),
    }
}

fn put_balance(stub: &mut ChaincodeStub<'_>, account: &str, amount: u64) -> Result<(), String> {
    stub.put_state(account, amount.to_string().into_bytes())
        .map_err(|e| e.to_string())
}

fn debit(stub: &mut ChaincodeStub<'_>, account: &str, amount: u64) -> Result<(), String> {
    let current = balance(stub, account)?;
    if current < amount {
        return Err("not sufficient funds".to_string());
    }
    put_balance(stub, account, current - amount)
}
