//! # Broker Contract
//!
//! Function-name dispatch over `BrokerService`.
//!
//! Interchain entrypoints answer with a `BrokerResponse` JSON: status 200
//! with `{ok:true,data}` on success, status 500 with `{ok:false,message}`
//! as the message on failure. Everything else answers with plain payloads
//! and plain error messages.

use crate::domain::{
    BrokerError, EmitRequest, IndexFamily, IndexUpdateRequest, InterchainRequest, ReceiptRequest,
    VoteOutcome, VoteStatus,
};
use crate::ports::{BrokerQueryApi, DirectModeApi, GovernanceApi, InterchainApi};
use crate::service::BrokerService;
use ir_01_ledger_store::{Chaincode, ChaincodeStub, CounterFamily};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared_types::{
    decode_byte_arg_lists, decode_byte_args, BrokerResponse, CallFunc, ChaincodeKey,
    ChaincodeResponse, IbtpType, TransactionStatus,
};
use tracing::{debug, warn};

/// Name local chaincodes and the relay client reach the broker under.
pub const BROKER_CONTRACT_NAME: &str = "broker";

/// Functions only admins may call.
const ADMIN_FUNCTIONS: [&str; 6] = [
    "audit",
    "initialize",
    "invokeInterchain",
    "invokeInterchains",
    "invokeReceipt",
    "invokeIndexUpdate",
];

/// Functions only whitelisted chaincodes may call.
const WHITELIST_FUNCTIONS: [&str; 1] = ["EmitInterchainEvent"];

/// Functions answering with `BrokerResponse` JSON.
const STRUCTURED_FUNCTIONS: [&str; 4] = [
    "invokeInterchain",
    "invokeInterchains",
    "invokeReceipt",
    "invokeIndexUpdate",
];

/// The broker chaincode.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrokerContract;

impl BrokerContract {
    /// Create the chaincode.
    pub fn new() -> Self {
        Self
    }

    fn check_access(stub: &mut ChaincodeStub<'_>, function: &str) -> Result<(), BrokerError> {
        let service = BrokerService::new(stub);
        if ADMIN_FUNCTIONS.contains(&function) {
            let creator = service.stub.creator().to_string();
            if !service.is_admin(&creator)? {
                return Err(BrokerError::NotAdmin);
            }
        }
        if WHITELIST_FUNCTIONS.contains(&function) {
            let caller = service.stub.invoked_chaincode().to_string();
            if !service.is_whitelisted(&caller)? {
                return Err(BrokerError::NotWhitelisted);
            }
        }
        Ok(())
    }

    fn dispatch(
        stub: &mut ChaincodeStub<'_>,
        function: &str,
        args: &[String],
    ) -> Result<Vec<u8>, BrokerError> {
        let mut service = BrokerService::new(stub);
        match function {
            "register" => {
                expect_args(args, 1)?;
                let key = service.register(parse_bool(&args[0])?)?;
                Ok(key.into_bytes())
            }
            "audit" => {
                expect_args(args, 3)?;
                let status = args[2].parse::<u64>().map_err(|_| {
                    BrokerError::InvalidArguments(format!("can not parse uint: {}", args[2]))
                })?;
                let target = ChaincodeKey::new(args[0].as_str(), args[1].as_str());
                match service.audit(&target, VoteStatus::from_code(status)?)? {
                    VoteOutcome::Pending => Ok(b"vote proposal pending".to_vec()),
                    _ => Ok(format!("set status of chaincode {} to {}", target, status)
                        .into_bytes()),
                }
            }
            "initialize" => {
                expect_args(args, 3)?;
                let threshold = parse_u64(&args[2])?;
                service.initialize(&args[0], &args[1], threshold)?;
                Ok(Vec::new())
            }
            "EmitInterchainEvent" => {
                expect_args(args, 8)?;
                let request = EmitRequest {
                    dst_full_id: args[0].clone(),
                    call_func: generate_call_func("callFunc", &args[1], &args[2])?,
                    callback: generate_call_func("callBack", &args[3], &args[4])?,
                    rollback: generate_call_func("rollBack", &args[5], &args[6])?,
                    encrypt: parse_bool(&args[7])?,
                };
                service.emit_interchain_event(request)?;
                Ok(Vec::new())
            }
            "invokeInterchain" => {
                expect_args(args, 9)?;
                let request = InterchainRequest {
                    src_full_id: args[0].clone(),
                    target: parse_target(&args[1])?,
                    index: parse_u64(&args[2])?,
                    typ: IbtpType::from_code(parse_u64(&args[3])?)?,
                    func: args[4].clone(),
                    args: decode_byte_args(&args[5])?,
                    tx_status: TransactionStatus::from_code(parse_u64(&args[6])?)?,
                    multi_sign: decode_byte_args(&args[7])?,
                    encrypt: parse_bool(&args[8])?,
                };
                service.invoke_interchain(request)
            }
            "invokeInterchains" => {
                expect_args(args, 9)?;
                service.invoke_interchains(parse_batch(args)?)?;
                Ok(Vec::new())
            }
            "invokeReceipt" => {
                expect_args(args, 7)?;
                let request = ReceiptRequest {
                    src_addr: parse_target(&args[0])?,
                    dst_full_id: args[1].clone(),
                    index: parse_u64(&args[2])?,
                    typ: IbtpType::from_code(parse_u64(&args[3])?)?,
                    result: decode_byte_args(&args[4])?,
                    tx_status: TransactionStatus::from_code(parse_u64(&args[5])?)?,
                    multi_sign: decode_byte_args(&args[6])?,
                };
                service.invoke_receipt(request)
            }
            "invokeIndexUpdate" => {
                expect_args(args, 4)?;
                let request = IndexUpdateRequest {
                    src_full_id: args[0].clone(),
                    dst_full_id: args[1].clone(),
                    index: parse_u64(&args[2])?,
                    family: IndexFamily::from_code(parse_u64(&args[3])?)?,
                };
                service.invoke_index_update(request)?;
                Ok(Vec::new())
            }
            "getInnerMeta" => to_json(&service.meta(CounterFamily::Inner)?),
            "getOuterMeta" => to_json(&service.meta(CounterFamily::Outer)?),
            "getCallbackMeta" => to_json(&service.meta(CounterFamily::Callback)?),
            "getDstRollbackMeta" => to_json(&service.meta(CounterFamily::DstRollback)?),
            "getOutMessage" => {
                expect_args(args, 2)?;
                to_json(&service.out_message(&args[0], parse_u64(&args[1])?)?)
            }
            "getInMessage" => {
                expect_args(args, 2)?;
                to_json(&service.in_message(&args[0], parse_u64(&args[1])?)?)
            }
            "getChainId" => Ok(service.chain_id()?.into_bytes()),
            "getLocalServices" => to_json(&service.local_services()?),
            "registerAppchain" => {
                expect_args(args, 4)?;
                service.register_appchain(&args[0], &args[1], &args[2], &args[3])
            }
            "registerRemoteService" => {
                expect_args(args, 3)?;
                service.register_remote_service(&args[0], &args[1], &args[2])?;
                Ok(Vec::new())
            }
            "getAppchainInfo" => {
                expect_args(args, 1)?;
                to_json(&service.appchain_info(&args[0])?)
            }
            "getRemoteServiceList" => to_json(&service.remote_services()?),
            "getRSWhiteList" => {
                expect_args(args, 1)?;
                to_json(&service.remote_ban_list(&args[0])?)
            }
            "getDirectTransactionMeta" => {
                expect_args(args, 1)?;
                to_json(&service.direct_transaction_meta(&args[0])?)
            }
            other => Err(BrokerError::InvalidArguments(format!(
                "invalid function: {}, args: {}",
                other,
                args.join(",")
            ))),
        }
    }
}

impl Chaincode for BrokerContract {
    fn init(&self, stub: &mut ChaincodeStub<'_>) -> ChaincodeResponse {
        let result = stub.string_params().map_err(BrokerError::from).and_then(|args| {
            let admins: Vec<String> = args
                .first()
                .map(|csv| csv.split(',').map(str::to_string).collect())
                .unwrap_or_default();
            let threshold = args.get(1).map(|raw| parse_u64(raw)).transpose()?;
            BrokerService::new(stub).bootstrap(&admins, threshold)
        });
        match result {
            Ok(()) => ChaincodeResponse::success(Vec::new()),
            Err(e) => ChaincodeResponse::error(e.to_string()),
        }
    }

    fn invoke(&self, stub: &mut ChaincodeStub<'_>) -> ChaincodeResponse {
        let function = stub.function().to_string();
        let structured = STRUCTURED_FUNCTIONS.contains(&function.as_str());
        debug!("[ir-03] invoke {}", function);

        let result = stub
            .string_params()
            .map_err(BrokerError::from)
            .and_then(|args| {
                Self::check_access(stub, &function)?;
                Self::dispatch(stub, &function, &args)
            });

        match (result, structured) {
            (Ok(data), true) => ChaincodeResponse::success(BrokerResponse::success(data).to_json()),
            (Ok(payload), false) => ChaincodeResponse::success(payload),
            (Err(e), true) => {
                warn!("[ir-03] {} rejected: {}", function, e);
                let body = BrokerResponse::failure(e.to_string()).to_json();
                ChaincodeResponse::error(String::from_utf8_lossy(&body).into_owned())
            }
            (Err(e), false) => {
                debug!("[ir-03] {} rejected: {}", function, e);
                match e {
                    BrokerError::OutMessageNotFound { .. }
                    | BrokerError::InMessageNotFound { .. } => {
                        ChaincodeResponse::not_found(e.to_string())
                    }
                    _ => ChaincodeResponse::error(e.to_string()),
                }
            }
        }
    }
}

fn expect_args(args: &[String], count: usize) -> Result<(), BrokerError> {
    if args.len() != count {
        return Err(BrokerError::InvalidArguments(format!(
            "incorrect number of arguments, expecting {}",
            count
        )));
    }
    Ok(())
}

fn parse_u64(raw: &str) -> Result<u64, BrokerError> {
    raw.parse()
        .map_err(|_| BrokerError::InvalidArguments(format!("cannot parse {} to uint64", raw)))
}

/// Boolean spellings accepted by the relay tooling.
fn parse_bool(raw: &str) -> Result<bool, BrokerError> {
    match raw {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        _ => Err(BrokerError::InvalidArguments(format!(
            "cannot parse {} to bool",
            raw
        ))),
    }
}

fn parse_target(raw: &str) -> Result<ChaincodeKey, BrokerError> {
    ChaincodeKey::parse(raw).map_err(|_| {
        BrokerError::InvalidArguments(format!("Target chaincode id {} is not valid", raw))
    })
}

/// Function plus JSON byte arguments; an empty argument string means none.
fn generate_call_func(label: &str, func: &str, args: &str) -> Result<CallFunc, BrokerError> {
    if args.is_empty() {
        return Ok(CallFunc::new(func, Vec::new()));
    }
    let args = decode_byte_args(args)
        .map_err(|e| BrokerError::InvalidArguments(format!("generate {}: {}", label, e)))?;
    Ok(CallFunc::new(func, args))
}

fn parse_column<T: DeserializeOwned>(raw: &str) -> Result<Vec<T>, BrokerError> {
    serde_json::from_str(raw)
        .map_err(|_| BrokerError::InvalidArguments(format!("unmarshal args failed for {}", raw)))
}

/// Nine JSON columns into one request per row.
fn parse_batch(args: &[String]) -> Result<Vec<InterchainRequest>, BrokerError> {
    let src: Vec<String> = parse_column(&args[0])?;
    let targets: Vec<String> = parse_column(&args[1])?;
    let indexes: Vec<u64> = parse_column(&args[2])?;
    let types: Vec<u64> = parse_column(&args[3])?;
    let funcs: Vec<String> = parse_column(&args[4])?;
    let call_args = decode_byte_arg_lists(&args[5])?;
    let statuses: Vec<u64> = parse_column(&args[6])?;
    let signatures = decode_byte_arg_lists(&args[7])?;
    let encrypts: Vec<bool> = parse_column(&args[8])?;

    let rows = src.len();
    let lengths = [
        targets.len(),
        indexes.len(),
        types.len(),
        funcs.len(),
        call_args.len(),
        statuses.len(),
        signatures.len(),
        encrypts.len(),
    ];
    if lengths.iter().any(|len| *len != rows) {
        return Err(BrokerError::InvalidArguments(
            "invokeInterchains columns differ in length".to_string(),
        ));
    }

    let mut requests = Vec::with_capacity(rows);
    let rows_iter = src.into_iter().zip(targets).zip(call_args).zip(signatures);
    for (i, (((src_full_id, target), call), multi_sign)) in rows_iter.enumerate() {
        requests.push(InterchainRequest {
            src_full_id,
            target: parse_target(&target)?,
            index: indexes[i],
            typ: IbtpType::from_code(types[i])?,
            func: funcs[i].clone(),
            args: call,
            tx_status: TransactionStatus::from_code(statuses[i])?,
            multi_sign,
            encrypt: encrypts[i],
        });
    }
    Ok(requests)
}

fn to_json<T: Serialize>(value: &T) -> Result<Vec<u8>, BrokerError> {
    serde_json::to_vec(value).map_err(|e| BrokerError::InvalidArguments(e.to_string()))
}
