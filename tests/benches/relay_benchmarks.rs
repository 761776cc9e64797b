//! # Interchain Relay Benchmarks
//!
//! | Subsystem             | Path measured                       |
//! |-----------------------|-------------------------------------|
//! | ir-03 Broker Contract | event emission, inbound delivery    |
//! | ir-04 Relay Client    | multi-signature quorum verification |

use criterion::{criterion_group, criterion_main};
use ir_tests::benchmarks::{ir_03_broker, ir_04_multisign};

criterion_group!(
    benches,
    ir_03_broker::emit_interchain_event,
    ir_03_broker::invoke_interchain,
    ir_04_multisign::verify_quorum,
);
criterion_main!(benches);
