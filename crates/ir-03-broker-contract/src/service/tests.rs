//! Broker flows over an in-process ledger with the tracker and the sample
//! transfer chaincode deployed next to the broker.

use crate::adapters::{BrokerContract, TransferContract, BROKER_CONTRACT_NAME, TRANSFER_CONTRACT_NAME};
use ir_01_ledger_store::{InMemoryKVStore, InProcessLedger, LedgerError, Proposal};
use ir_02_transaction_tracker::{TransactionContract, TRANSACTION_CONTRACT_NAME};
use shared_types::{encode_byte_args, BrokerResponse, Event, IbtpType, Receipt};
use std::collections::BTreeMap;
use std::sync::Arc;

const ADMIN: &str = "Org1MSP";
const OUTSIDER: &str = "Org2MSP";
const LOCAL: &str = "mychannel&transfer";
const SELF_FULL: &str = "1356:appchain1:mychannel&transfer";
const REMOTE: &str = "1356:appchain2:mychannel&transfer";

type Ledger = InProcessLedger<InMemoryKVStore>;

fn ledger() -> Ledger {
    let ledger = InProcessLedger::new("mychannel", InMemoryKVStore::new());
    ledger
        .deploy(TRANSACTION_CONTRACT_NAME, Arc::new(TransactionContract::new()), ADMIN, vec![])
        .unwrap();
    ledger
        .deploy(BROKER_CONTRACT_NAME, Arc::new(BrokerContract::new()), ADMIN, vec![])
        .unwrap();
    ledger
        .deploy(TRANSFER_CONTRACT_NAME, Arc::new(TransferContract::new()), ADMIN, vec![])
        .unwrap();
    ledger
}

fn exec(ledger: &Ledger, creator: &str, chaincode: &str, function: &str, args: &[&str]) -> Result<Vec<u8>, LedgerError> {
    let args = args.iter().map(|a| a.as_bytes().to_vec()).collect();
    ledger
        .execute(&Proposal::new(creator, chaincode, function, args))
        .map(|tx| tx.response.payload)
}

fn query(ledger: &Ledger, function: &str, args: &[&str]) -> Vec<u8> {
    let args = args.iter().map(|a| a.as_bytes().to_vec()).collect();
    ledger
        .query(&Proposal::new(ADMIN, BROKER_CONTRACT_NAME, function, args))
        .unwrap()
        .response
        .payload
}

fn meta(ledger: &Ledger, function: &str) -> BTreeMap<String, u64> {
    serde_json::from_slice(&query(ledger, function, &[])).unwrap()
}

fn structured_error(err: LedgerError) -> String {
    match err {
        LedgerError::ChaincodeStatus { status, message } => {
            assert_eq!(status, 500);
            let response = BrokerResponse::from_json(message.as_bytes()).unwrap();
            assert!(!response.ok);
            response.message
        }
        other => panic!("unexpected error {other}"),
    }
}

fn whitelist_transfer(ledger: &Ledger) {
    let key = exec(ledger, ADMIN, TRANSFER_CONTRACT_NAME, "register", &["false"]).unwrap();
    assert_eq!(key, LOCAL.as_bytes().to_vec());
    exec(ledger, ADMIN, BROKER_CONTRACT_NAME, "audit", &["mychannel", "transfer", "1"]).unwrap();
}

fn balance(ledger: &Ledger, account: &str) -> u64 {
    let raw = ledger
        .query(&Proposal::new(ADMIN, TRANSFER_CONTRACT_NAME, "getBalance", vec![account.as_bytes().to_vec()]))
        .unwrap()
        .response
        .payload;
    if raw.is_empty() {
        0
    } else {
        String::from_utf8(raw).unwrap().parse().unwrap()
    }
}

fn set_balance(ledger: &Ledger, account: &str, amount: u64) {
    exec(ledger, ADMIN, TRANSFER_CONTRACT_NAME, "setBalance", &[account, &amount.to_string()]).unwrap();
}

fn charge_args(sender: &str, receiver: &str, amount: u64) -> String {
    encode_byte_args(&[
        sender.as_bytes().to_vec(),
        receiver.as_bytes().to_vec(),
        amount.to_be_bytes().to_vec(),
    ])
}

fn invoke_interchain(
    ledger: &Ledger,
    creator: &str,
    src: &str,
    index: u64,
    tx_status: u64,
    args: &str,
) -> Result<BrokerResponse, LedgerError> {
    let index = index.to_string();
    let tx_status = tx_status.to_string();
    exec(
        ledger,
        creator,
        BROKER_CONTRACT_NAME,
        "invokeInterchain",
        &[src, LOCAL, &index, "0", "interchainCharge", args, &tx_status, "[]", "false"],
    )
    .map(|payload| BrokerResponse::from_json(&payload).unwrap())
}

fn invoke_receipt(ledger: &Ledger, dst: &str, index: u64, typ: u64, tx_status: u64) -> Result<Vec<u8>, LedgerError> {
    let (index, typ, tx_status) = (index.to_string(), typ.to_string(), tx_status.to_string());
    exec(
        ledger,
        ADMIN,
        BROKER_CONTRACT_NAME,
        "invokeReceipt",
        &[LOCAL, dst, &index, &typ, "[]", &tx_status, "[]"],
    )
}

fn in_message(ledger: &Ledger, pair: &str, index: u64) -> Receipt {
    Receipt::from_json(&query(ledger, "getInMessage", &[pair, &index.to_string()])).unwrap()
}

fn pair(from: &str, to: &str) -> String {
    format!("{}-{}", from, to)
}

// =============================================================================
// Governance
// =============================================================================

#[test]
fn test_init_defaults() {
    let ledger = ledger();
    assert_eq!(query(&ledger, "getChainId", &[]), b"1356-appchain1".to_vec());
    assert!(meta(&ledger, "getInnerMeta").is_empty());
    assert_eq!(query(&ledger, "getLocalServices", &[]), b"[]".to_vec());
}

#[test]
fn test_register_and_audit() {
    let ledger = ledger();
    exec(&ledger, ADMIN, TRANSFER_CONTRACT_NAME, "register", &["false"]).unwrap();
    // A pending registration is not duplicated.
    let again = exec(&ledger, ADMIN, TRANSFER_CONTRACT_NAME, "register", &["true"]).unwrap();
    assert_eq!(again, LOCAL.as_bytes().to_vec());

    let err = exec(&ledger, OUTSIDER, BROKER_CONTRACT_NAME, "audit", &["mychannel", "transfer", "1"]).unwrap_err();
    assert!(err.to_string().ends_with("Not allowed to invoke interchain function by non-admin client"));

    let err = exec(&ledger, ADMIN, BROKER_CONTRACT_NAME, "audit", &["mychannel", "transfer", "7"]).unwrap_err();
    assert!(err.to_string().ends_with("vote proposal: vote status should be 0 or 1"));

    let msg = exec(&ledger, ADMIN, BROKER_CONTRACT_NAME, "audit", &["mychannel", "transfer", "1"]).unwrap();
    assert_eq!(msg, b"set status of chaincode mychannel&transfer to 1".to_vec());

    let services: Vec<String> = serde_json::from_slice(&query(&ledger, "getLocalServices", &[])).unwrap();
    assert_eq!(services, vec![SELF_FULL.to_string()]);

    let err = exec(&ledger, ADMIN, BROKER_CONTRACT_NAME, "audit", &["mychannel", "transfer", "1"]).unwrap_err();
    assert!(err.to_string().ends_with("vote proposal: the proposal does not exist"));
    let err = exec(&ledger, ADMIN, BROKER_CONTRACT_NAME, "audit", &["mychannel", "other", "1"]).unwrap_err();
    assert!(err.to_string().ends_with("Proposal not found"));
}

#[test]
fn test_pending_vote_is_persisted() {
    let ledger = InProcessLedger::new("mychannel", InMemoryKVStore::new());
    ledger
        .deploy(
            BROKER_CONTRACT_NAME,
            Arc::new(BrokerContract::new()),
            ADMIN,
            vec![b"Org2MSP,Org3MSP".to_vec(), b"2".to_vec()],
        )
        .unwrap();
    ledger
        .deploy(TRANSFER_CONTRACT_NAME, Arc::new(TransferContract::new()), ADMIN, vec![])
        .unwrap();
    exec(&ledger, ADMIN, TRANSFER_CONTRACT_NAME, "register", &["false"]).unwrap();

    let msg = exec(&ledger, ADMIN, BROKER_CONTRACT_NAME, "audit", &["mychannel", "transfer", "1"]).unwrap();
    assert_eq!(msg, b"vote proposal pending".to_vec());
    let err = exec(&ledger, ADMIN, BROKER_CONTRACT_NAME, "audit", &["mychannel", "transfer", "1"]).unwrap_err();
    assert!(err.to_string().ends_with("current user has voted the proposal"));

    exec(&ledger, OUTSIDER, BROKER_CONTRACT_NAME, "audit", &["mychannel", "transfer", "1"]).unwrap();
    assert_eq!(query(&ledger, "getLocalServices", &[]), format!("[\"{}\"]", SELF_FULL).into_bytes());
}

#[test]
fn test_unknown_function() {
    let ledger = ledger();
    let err = exec(&ledger, ADMIN, BROKER_CONTRACT_NAME, "nope", &["a", "b"]).unwrap_err();
    assert!(err.to_string().ends_with("invalid function: nope, args: a,b"));
}

// =============================================================================
// Emission
// =============================================================================

#[test]
fn test_emit_requires_whitelist() {
    let ledger = ledger();
    set_balance(&ledger, "alice", 100);
    let err = exec(&ledger, ADMIN, TRANSFER_CONTRACT_NAME, "transfer", &[REMOTE, "alice", "bob", "10"]).unwrap_err();
    assert!(err.to_string().contains("Not allowed to invoke interchain function by unregister chaincode"));
    // The whole transaction was discarded, debit included.
    assert_eq!(balance(&ledger, "alice"), 100);
}

#[test]
fn test_emit_assigns_sequential_indexes() {
    let ledger = ledger();
    whitelist_transfer(&ledger);
    set_balance(&ledger, "alice", 100);

    exec(&ledger, ADMIN, TRANSFER_CONTRACT_NAME, "transfer", &[REMOTE, "alice", "bob", "10"]).unwrap();
    exec(&ledger, ADMIN, TRANSFER_CONTRACT_NAME, "transfer", &[REMOTE, "alice", "bob", "15"]).unwrap();
    assert_eq!(balance(&ledger, "alice"), 75);

    let outer = meta(&ledger, "getOuterMeta");
    assert_eq!(outer.get(&pair(SELF_FULL, REMOTE)), Some(&2));

    let event = Event::from_json(&query(&ledger, "getOutMessage", &[&pair(SELF_FULL, REMOTE), "1"])).unwrap();
    assert_eq!(event.index, 1);
    assert_eq!(event.src_full_id, SELF_FULL);
    assert_eq!(event.dst_full_id, REMOTE);
    assert_eq!(event.call_func.func, "interchainCharge");
    assert_eq!(event.call_func.args[2], 10u64.to_be_bytes().to_vec());
    assert_eq!(event.rollback.func, "interchainRollback");
    assert!(event.callback.is_empty());
}

#[test]
fn test_missing_message_rows_answer_not_found() {
    let ledger = ledger();
    for function in ["getOutMessage", "getInMessage"] {
        let args = vec![pair(SELF_FULL, REMOTE).into_bytes(), b"1".to_vec()];
        let err = ledger
            .execute(&Proposal::new(ADMIN, BROKER_CONTRACT_NAME, function, args))
            .unwrap_err();
        match err {
            LedgerError::ChaincodeStatus { status, message } => {
                assert_eq!(status, 404);
                assert!(message.ends_with("/1 not found"), "{message}");
            }
            other => panic!("unexpected error {other}"),
        }
    }
}

#[test]
fn test_emit_rejects_malformed_destination() {
    let ledger = ledger();
    whitelist_transfer(&ledger);
    set_balance(&ledger, "alice", 100);
    let err = exec(&ledger, ADMIN, TRANSFER_CONTRACT_NAME, "transfer", &["bogus", "alice", "bob", "10"]).unwrap_err();
    assert!(err.to_string().contains("invalid full service id"));
    assert!(meta(&ledger, "getOuterMeta").is_empty());
}

// =============================================================================
// Inbound delivery
// =============================================================================

#[test]
fn test_invoke_interchain_executes_once() {
    let ledger = ledger();
    whitelist_transfer(&ledger);

    let resp = invoke_interchain(&ledger, ADMIN, REMOTE, 1, 0, &charge_args("alice", "bob", 10)).unwrap();
    assert!(resp.ok);
    assert_eq!(balance(&ledger, "bob"), 10);

    let err = invoke_interchain(&ledger, ADMIN, REMOTE, 1, 0, &charge_args("alice", "bob", 10)).unwrap_err();
    assert_eq!(structured_error(err), "inner meta:incorrect index, expect 2");
    assert_eq!(balance(&ledger, "bob"), 10);

    let receipt = in_message(&ledger, &pair(REMOTE, SELF_FULL), 1);
    assert_eq!(receipt.typ, IbtpType::ReceiptSuccess);
    assert!(receipt.result.is_ok());
}

#[test]
fn test_invoke_interchain_out_of_order() {
    let ledger = ledger();
    whitelist_transfer(&ledger);
    let err = invoke_interchain(&ledger, ADMIN, REMOTE, 2, 0, &charge_args("alice", "bob", 10)).unwrap_err();
    assert_eq!(structured_error(err), "inner meta:incorrect index, expect 1");
    assert!(meta(&ledger, "getInnerMeta").is_empty());
    assert_eq!(balance(&ledger, "bob"), 0);
}

#[test]
fn test_invoke_interchain_authorization() {
    let ledger = ledger();
    let err = invoke_interchain(&ledger, ADMIN, REMOTE, 1, 0, &charge_args("alice", "bob", 10)).unwrap_err();
    assert_eq!(structured_error(err), "dest address is not in local white list");

    whitelist_transfer(&ledger);
    let err = invoke_interchain(&ledger, OUTSIDER, REMOTE, 1, 0, &charge_args("alice", "bob", 10)).unwrap_err();
    assert_eq!(
        structured_error(err),
        "Not allowed to invoke interchain function by non-admin client"
    );
}

#[test]
fn test_failed_target_records_failure_receipt() {
    let ledger = ledger();
    whitelist_transfer(&ledger);
    let bad = encode_byte_args(&[b"alice".to_vec(), b"bob".to_vec(), b"ten".to_vec()]);
    let resp = invoke_interchain(&ledger, ADMIN, REMOTE, 1, 0, &bad).unwrap();
    assert!(resp.ok);

    let receipt = in_message(&ledger, &pair(REMOTE, SELF_FULL), 1);
    assert_eq!(receipt.typ, IbtpType::ReceiptFailure);
    assert!(!receipt.result.is_ok());
    assert_eq!(meta(&ledger, "getInnerMeta").get(&pair(REMOTE, SELF_FULL)), Some(&1));
}

#[test]
fn test_acknowledgement_rolls_back_applied_call() {
    let ledger = ledger();
    whitelist_transfer(&ledger);
    invoke_interchain(&ledger, ADMIN, REMOTE, 1, 0, &charge_args("alice", "bob", 10)).unwrap();
    assert_eq!(balance(&ledger, "bob"), 10);

    // BeginRollback acknowledgement: the applied charge is undone.
    invoke_interchain(&ledger, ADMIN, REMOTE, 1, 2, &charge_args("alice", "bob", 10)).unwrap();
    assert_eq!(balance(&ledger, "bob"), 0);
    assert_eq!(in_message(&ledger, &pair(REMOTE, SELF_FULL), 1).typ, IbtpType::ReceiptRollback);
    assert_eq!(meta(&ledger, "getDstRollbackMeta").get(&pair(REMOTE, SELF_FULL)), Some(&1));
}

#[test]
fn test_acknowledgement_without_forward_skips_call() {
    let ledger = ledger();
    whitelist_transfer(&ledger);
    set_balance(&ledger, "bob", 5);

    invoke_interchain(&ledger, ADMIN, REMOTE, 1, 1, &charge_args("alice", "bob", 10)).unwrap();
    assert_eq!(balance(&ledger, "bob"), 5);
    let receipt = in_message(&ledger, &pair(REMOTE, SELF_FULL), 1);
    assert_eq!(receipt.typ, IbtpType::ReceiptFailure);
    assert_eq!(receipt.result.status, 0);
    // The rollback consumed the pending inner index.
    assert_eq!(meta(&ledger, "getInnerMeta").get(&pair(REMOTE, SELF_FULL)), Some(&1));
}

#[test]
fn test_invoke_interchains_batch() {
    let ledger = ledger();
    whitelist_transfer(&ledger);
    let args = format!(
        "[{},{}]",
        charge_args("alice", "bob", 10),
        charge_args("alice", "carol", 5)
    );
    let src = format!("[\"{}\",\"{}\"]", REMOTE, REMOTE);
    let dst = format!("[\"{}\",\"{}\"]", LOCAL, LOCAL);
    exec(
        &ledger,
        ADMIN,
        BROKER_CONTRACT_NAME,
        "invokeInterchains",
        &[&src, &dst, "[1,2]", "[0,0]", "[\"interchainCharge\",\"interchainCharge\"]", &args, "[0,0]", "[[],[]]", "[false,false]"],
    )
    .unwrap();
    assert_eq!(balance(&ledger, "bob"), 10);
    assert_eq!(balance(&ledger, "carol"), 5);
    assert_eq!(meta(&ledger, "getInnerMeta").get(&pair(REMOTE, SELF_FULL)), Some(&2));

    let err = exec(
        &ledger,
        ADMIN,
        BROKER_CONTRACT_NAME,
        "invokeInterchains",
        &[&format!("[\"{}\"]", REMOTE), "[\"mychannel&other\"]", "[1]", "[0]", "[\"f\"]", "[[]]", "[0]", "[[]]", "[false]"],
    )
    .unwrap_err();
    assert_eq!(structured_error(err), "cannot get service ordered");
}

#[test]
fn test_invoke_index_update() {
    let ledger = ledger();
    let update = |index: &str, family: &str| {
        exec(&ledger, ADMIN, BROKER_CONTRACT_NAME, "invokeIndexUpdate", &[REMOTE, SELF_FULL, index, family])
    };
    update("1", "0").unwrap();
    assert_eq!(meta(&ledger, "getInnerMeta").get(&pair(REMOTE, SELF_FULL)), Some(&1));

    update("3", "2").unwrap();
    assert_eq!(meta(&ledger, "getDstRollbackMeta").get(&pair(REMOTE, SELF_FULL)), Some(&3));
    assert_eq!(meta(&ledger, "getInnerMeta").get(&pair(REMOTE, SELF_FULL)), Some(&1));

    let err = update("2", "2").unwrap_err();
    assert_eq!(structured_error(err), "incorrect dstRollback index, expect 4");
    assert!(update("4", "9").is_err());
}

#[test]
fn test_dst_rollback_at_max_index_closes_the_pair() {
    let ledger = ledger();
    let update = |index: &str| {
        exec(&ledger, ADMIN, BROKER_CONTRACT_NAME, "invokeIndexUpdate", &[REMOTE, SELF_FULL, index, "2"])
    };
    let max = u64::MAX.to_string();
    update(&max).unwrap();
    assert_eq!(meta(&ledger, "getDstRollbackMeta").get(&pair(REMOTE, SELF_FULL)), Some(&u64::MAX));

    let err = update("1").unwrap_err();
    assert_eq!(structured_error(err), "dstRollback:index exhausted");
    let err = update(&max).unwrap_err();
    assert_eq!(structured_error(err), "dstRollback:index exhausted");
    assert_eq!(meta(&ledger, "getDstRollbackMeta").get(&pair(REMOTE, SELF_FULL)), Some(&u64::MAX));
}

// =============================================================================
// Receipts
// =============================================================================

#[test]
fn test_failure_receipt_runs_rollback() {
    let ledger = ledger();
    whitelist_transfer(&ledger);
    set_balance(&ledger, "alice", 100);
    exec(&ledger, ADMIN, TRANSFER_CONTRACT_NAME, "transfer", &[REMOTE, "alice", "bob", "10"]).unwrap();
    assert_eq!(balance(&ledger, "alice"), 90);

    // ReceiptFailure with relay status Failure.
    invoke_receipt(&ledger, REMOTE, 1, 2, 4).unwrap();
    assert_eq!(balance(&ledger, "alice"), 100);
    assert_eq!(meta(&ledger, "getCallbackMeta").get(&pair(SELF_FULL, REMOTE)), Some(&1));

    let err = invoke_receipt(&ledger, REMOTE, 1, 2, 4).unwrap_err();
    assert_eq!(structured_error(err), "callback:incorrect index, expect 2");
    assert_eq!(balance(&ledger, "alice"), 100);
}

#[test]
fn test_success_receipt_keeps_debit() {
    let ledger = ledger();
    whitelist_transfer(&ledger);
    set_balance(&ledger, "alice", 100);
    exec(&ledger, ADMIN, TRANSFER_CONTRACT_NAME, "transfer", &[REMOTE, "alice", "bob", "10"]).unwrap();

    invoke_receipt(&ledger, REMOTE, 1, 1, 3).unwrap();
    assert_eq!(balance(&ledger, "alice"), 90);
    assert_eq!(meta(&ledger, "getCallbackMeta").get(&pair(SELF_FULL, REMOTE)), Some(&1));
}

#[test]
fn test_receipt_for_unknown_event() {
    let ledger = ledger();
    let err = invoke_receipt(&ledger, REMOTE, 1, 1, 3).unwrap_err();
    assert!(structured_error(err).starts_with("out message"));
    assert!(meta(&ledger, "getCallbackMeta").is_empty());
}

// =============================================================================
// Direct mode
// =============================================================================

const PEER: &str = ":chainB:mychannel&transfer";
const SELF_DIRECT: &str = ":chainA:mychannel&transfer";

fn direct_ledger(ban_list: &str) -> Ledger {
    let ledger = ledger();
    exec(&ledger, ADMIN, BROKER_CONTRACT_NAME, "initialize", &["", "chainA", "0"]).unwrap();
    whitelist_transfer(&ledger);
    exec(&ledger, ADMIN, BROKER_CONTRACT_NAME, "registerAppchain", &["chainB", "broker", "root", "0xa2"]).unwrap();
    exec(&ledger, ADMIN, BROKER_CONTRACT_NAME, "registerRemoteService", &["chainB", LOCAL, ban_list]).unwrap();
    set_balance(&ledger, "alice", 100);
    ledger
}

fn direct_status(ledger: &Ledger, index: u64) -> u64 {
    let id = format!("{}-{}-{}", SELF_DIRECT, PEER, index);
    let meta: shared_types::DirectTransactionMeta =
        serde_json::from_slice(&query(ledger, "getDirectTransactionMeta", &[&id])).unwrap();
    meta.transaction_status
}

#[test]
fn test_initialize_resets_state() {
    let ledger = ledger();
    whitelist_transfer(&ledger);
    invoke_interchain(&ledger, ADMIN, REMOTE, 1, 0, &charge_args("alice", "bob", 10)).unwrap();

    exec(&ledger, ADMIN, BROKER_CONTRACT_NAME, "initialize", &["1356", "appchain1", "1"]).unwrap();
    assert!(meta(&ledger, "getInnerMeta").is_empty());
    assert_eq!(query(&ledger, "getLocalServices", &[]), b"[]".to_vec());

    let err = exec(&ledger, OUTSIDER, BROKER_CONTRACT_NAME, "initialize", &["1356", "appchain1", "1"]).unwrap_err();
    assert!(err.to_string().ends_with("non-admin client"));
}

#[test]
fn test_direct_mode_saga() {
    let ledger = direct_ledger("Org9MSP");
    assert_eq!(query(&ledger, "getChainId", &[]), b"-chainA".to_vec());

    exec(&ledger, ADMIN, TRANSFER_CONTRACT_NAME, "transfer", &[PEER, "alice", "bob", "10"]).unwrap();
    assert_eq!(direct_status(&ledger, 1), 1);

    invoke_receipt(&ledger, PEER, 1, 1, 0).unwrap();
    assert_eq!(direct_status(&ledger, 1), 3);
    assert_eq!(balance(&ledger, "alice"), 90);

    let err = exec(&ledger, ADMIN, TRANSFER_CONTRACT_NAME, "transfer", &[":chainC:mychannel&x", "alice", "bob", "1"]).unwrap_err();
    assert!(err.to_string().contains("remote service is not registered"));
}

#[test]
fn test_direct_mode_rollback_then_end() {
    let ledger = direct_ledger("Org9MSP");
    exec(&ledger, ADMIN, TRANSFER_CONTRACT_NAME, "transfer", &[PEER, "alice", "bob", "10"]).unwrap();

    invoke_receipt(&ledger, PEER, 1, 3, 0).unwrap();
    assert_eq!(direct_status(&ledger, 1), 2);
    assert_eq!(balance(&ledger, "alice"), 100);

    invoke_receipt(&ledger, PEER, 1, 4, 0).unwrap();
    assert_eq!(direct_status(&ledger, 1), 5);
    assert_eq!(meta(&ledger, "getCallbackMeta").get(&pair(SELF_DIRECT, PEER)), Some(&1));
    assert_eq!(balance(&ledger, "alice"), 100);

    let err = invoke_receipt(&ledger, PEER, 1, 0, 0).unwrap_err();
    assert_eq!(structured_error(err), "IBTP type is not correct in direct mode");
}

#[test]
fn test_direct_mode_banned_caller() {
    let ledger = direct_ledger(ADMIN);
    let err = exec(&ledger, ADMIN, TRANSFER_CONTRACT_NAME, "transfer", &[PEER, "alice", "bob", "10"]).unwrap_err();
    assert!(err.to_string().contains("remote service is not allowed to call dest address"));
    assert_eq!(balance(&ledger, "alice"), 100);
}

#[test]
fn test_direct_mode_inbound_source_check() {
    let ledger = direct_ledger("Org9MSP");
    invoke_interchain(&ledger, ADMIN, PEER, 1, 0, &charge_args("alice", "bob", 10)).unwrap();
    assert_eq!(balance(&ledger, "bob"), 10);

    let err = invoke_interchain(&ledger, ADMIN, ":chainC:mychannel&transfer", 1, 0, &charge_args("a", "b", 1)).unwrap_err();
    assert_eq!(structured_error(err), "remote service is not registered");
}
