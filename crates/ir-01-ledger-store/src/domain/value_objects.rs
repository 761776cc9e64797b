//! # Domain Value Objects
//!
//! Counter families and the per-transaction execution context.

/// Nested chaincode invocations deeper than this are refused.
pub const MAX_CALL_DEPTH: usize = 8;

/// The four independent sequence counter families.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CounterFamily {
    /// Inbound interchain calls executed.
    Inner,
    /// Outbound events emitted.
    Outer,
    /// Inbound receipts applied.
    Callback,
    /// Rollback acknowledgements processed on the destination.
    DstRollback,
}

impl CounterFamily {
    /// All families.
    pub const ALL: [CounterFamily; 4] = [
        CounterFamily::Inner,
        CounterFamily::Outer,
        CounterFamily::Callback,
        CounterFamily::DstRollback,
    ];

    /// State key prefix of the family.
    pub fn key(&self) -> &'static str {
        match self {
            CounterFamily::Inner => "inner-meta",
            CounterFamily::Outer => "outter-meta",
            CounterFamily::Callback => "callback-meta",
            CounterFamily::DstRollback => "dst-rollback-meta",
        }
    }
}

/// Execution context of one ledger transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxContext {
    /// Transaction ID.
    pub tx_id: String,
    /// Channel the transaction runs on.
    pub channel_id: String,
    /// MSP ID of the submitting identity.
    pub creator: String,
    /// Name of the chaincode the proposal targeted.
    pub entry_chaincode: String,
    /// Unix seconds at proposal time.
    pub timestamp: u64,
}
