//! # Relay Benchmarks
//!
//! Criterion benchmarks per subsystem, driven from `benches/relay_benchmarks.rs`.

pub mod ir_03_broker;
pub mod ir_04_multisign;
