//! # IR-03 Broker Benchmarks
//!
//! Throughput of the two broker paths every cross-chain message takes:
//!
//! - Emitting an event from the transfer chaincode (outer counter, event
//!   record, one nested chaincode call)
//! - Delivering an inbound request (inner counter, forward call, receipt
//!   record)
//!
//! Both run on an in-memory ledger, so the numbers bound broker overhead
//! rather than storage.

use criterion::{black_box, BenchmarkId, Criterion, Throughput};
use ir_01_ledger_store::{InMemoryKVStore, InProcessLedger, Proposal};
use ir_03_broker_contract::{BROKER_CONTRACT_NAME, TRANSFER_CONTRACT_NAME};
use ir_04_relay_client::InterchainCall;
use relay_node::runtime::bootstrap;
use relay_node::RelayConfig;
use shared_types::{IbtpType, TransactionStatus};
use std::time::Duration;

const REMOTE: &str = "1356:appchain2:mychannel&transfer";
const LOCAL: &str = "mychannel&transfer";

fn ledger(config: &RelayConfig) -> InProcessLedger<InMemoryKVStore> {
    let ledger = InProcessLedger::new(config.fabric.channel_id.clone(), InMemoryKVStore::new());
    bootstrap(&ledger, config).expect("bootstrap failed");
    ledger
}

fn charge(index: u64) -> InterchainCall {
    InterchainCall {
        src_full_id: REMOTE.to_string(),
        target: LOCAL.to_string(),
        index,
        typ: IbtpType::Interchain,
        func: "interchainCharge".to_string(),
        args: vec![b"alice".to_vec(), b"bob".to_vec(), 1u64.to_be_bytes().to_vec()],
        tx_status: TransactionStatus::Begin,
        multi_sign: Vec::new(),
        encrypt: false,
    }
}

/// Events emitted per second through the transfer chaincode.
pub fn emit_interchain_event(c: &mut Criterion) {
    let mut group = c.benchmark_group("ir-03-broker");
    group.measurement_time(Duration::from_secs(5));
    group.throughput(Throughput::Elements(1));

    let config = RelayConfig::default();
    let ledger = ledger(&config);
    let creator = config.fabric.creator.clone();
    ledger
        .execute(&Proposal::new(
            creator.as_str(),
            TRANSFER_CONTRACT_NAME,
            "setBalance",
            vec![b"alice".to_vec(), u64::MAX.to_string().into_bytes()],
        ))
        .expect("setBalance failed");

    let transfer = Proposal::new(
        creator.as_str(),
        TRANSFER_CONTRACT_NAME,
        "transfer",
        vec![
            REMOTE.as_bytes().to_vec(),
            b"alice".to_vec(),
            b"bob".to_vec(),
            b"1".to_vec(),
        ],
    );
    group.bench_function("emit_interchain_event", |b| {
        b.iter(|| black_box(ledger.execute(&transfer).is_ok()))
    });
    group.finish();
}

/// Inbound requests delivered per second, singly and in batches.
pub fn invoke_interchain(c: &mut Criterion) {
    let mut group = c.benchmark_group("ir-03-broker");
    group.measurement_time(Duration::from_secs(5));

    let config = RelayConfig::default();
    let creator = config.fabric.creator.clone();

    let ledger_single = ledger(&config);
    let mut next = 0u64;
    group.throughput(Throughput::Elements(1));
    group.bench_function("invoke_interchain", |b| {
        b.iter(|| {
            next += 1;
            let proposal = Proposal::new(
                creator.as_str(),
                BROKER_CONTRACT_NAME,
                "invokeInterchain",
                charge(next).to_args(),
            );
            black_box(ledger_single.execute(&proposal).is_ok())
        })
    });

    for size in [10u64, 50] {
        let ledger_batch = ledger(&config);
        let mut next = 0u64;
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::new("invoke_interchains", size), &size, |b, &size| {
            b.iter(|| {
                let calls: Vec<InterchainCall> = (next + 1..=next + size).map(charge).collect();
                next += size;
                let proposal = Proposal::new(
                    creator.as_str(),
                    BROKER_CONTRACT_NAME,
                    "invokeInterchains",
                    InterchainCall::to_batch_args(&calls).expect("batch columns"),
                );
                black_box(ledger_batch.execute(&proposal).is_ok())
            })
        });
    }
    group.finish();
}
