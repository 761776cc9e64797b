//! # Relay Client Entities
//!
//! Requests the relay hub hands to the client and the views the client
//! reads back from the broker.

use shared_types::{
    encode_byte_arg_lists, encode_byte_args, BxhProof, Content, IbtpType, InvokeResult,
    ProtocolError, TransactionStatus,
};

/// An IBTP delivered by the relay hub for execution on this chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InboundIbtp {
    /// Source full service ID.
    pub from: String,
    /// Index under the (from, destination) pair.
    pub index: u64,
    /// Local destination chaincode key (`channel&name`).
    pub service_id: String,
    /// IBTP type.
    pub typ: IbtpType,
    /// Decoded call descriptor.
    pub content: Content,
    /// Hub proof.
    pub proof: BxhProof,
    /// Whether the payload was encrypted.
    pub encrypted: bool,
}

/// A receipt delivered by the relay hub for one of our own events.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InboundReceipt {
    /// Destination full service ID of the original event.
    pub to: String,
    /// Index of the original event.
    pub index: u64,
    /// Local source chaincode key (`channel&name`).
    pub service_id: String,
    /// Receipt type.
    pub typ: IbtpType,
    /// Result produced on the destination.
    pub result: InvokeResult,
    /// Hub proof.
    pub proof: BxhProof,
}

/// Arguments of one `invokeInterchain` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InterchainCall {
    /// Source full service ID.
    pub src_full_id: String,
    /// Target chaincode key.
    pub target: String,
    /// Index under the pair.
    pub index: u64,
    /// IBTP type.
    pub typ: IbtpType,
    /// Function to run on the target.
    pub func: String,
    /// Its arguments.
    pub args: Vec<Vec<u8>>,
    /// Hub transaction status.
    pub tx_status: TransactionStatus,
    /// Validator signatures.
    pub multi_sign: Vec<Vec<u8>>,
    /// Whether the payload was encrypted.
    pub encrypt: bool,
}

impl InterchainCall {
    /// Build the call for an inbound IBTP.
    pub fn from_ibtp(ibtp: &InboundIbtp) -> Self {
        Self {
            src_full_id: ibtp.from.clone(),
            target: ibtp.service_id.clone(),
            index: ibtp.index,
            typ: ibtp.typ,
            func: ibtp.content.func.clone(),
            args: ibtp.content.args.clone(),
            tx_status: ibtp.proof.tx_status,
            multi_sign: ibtp.proof.multi_sign.clone(),
            encrypt: ibtp.encrypted,
        }
    }

    /// Positional `invokeInterchain` arguments.
    pub fn to_args(&self) -> Vec<Vec<u8>> {
        [
            self.src_full_id.clone(),
            self.target.clone(),
            self.index.to_string(),
            self.typ.code().to_string(),
            self.func.clone(),
            encode_byte_args(&self.args),
            self.tx_status.code().to_string(),
            encode_byte_args(&self.multi_sign),
            self.encrypt.to_string(),
        ]
        .into_iter()
        .map(String::into_bytes)
        .collect()
    }

    /// The nine JSON columns of `invokeInterchains`.
    pub fn to_batch_args(calls: &[InterchainCall]) -> Result<Vec<Vec<u8>>, ProtocolError> {
        fn column<T: serde::Serialize>(values: Vec<T>) -> Result<Vec<u8>, ProtocolError> {
            Ok(serde_json::to_vec(&values)?)
        }
        let args: Vec<Vec<Vec<u8>>> = calls.iter().map(|c| c.args.clone()).collect();
        let signs: Vec<Vec<Vec<u8>>> = calls.iter().map(|c| c.multi_sign.clone()).collect();
        Ok(vec![
            column(calls.iter().map(|c| c.src_full_id.as_str()).collect())?,
            column(calls.iter().map(|c| c.target.as_str()).collect())?,
            column(calls.iter().map(|c| c.index).collect())?,
            column(calls.iter().map(|c| c.typ.code()).collect())?,
            column(calls.iter().map(|c| c.func.as_str()).collect())?,
            encode_byte_arg_lists(&args)?.into_bytes(),
            column(calls.iter().map(|c| c.tx_status.code()).collect())?,
            encode_byte_arg_lists(&signs)?.into_bytes(),
            column(calls.iter().map(|c| c.encrypt).collect())?,
        ])
    }
}

/// Arguments of one `invokeReceipt` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReceiptCall {
    /// Local source chaincode key.
    pub src_addr: String,
    /// Destination full service ID.
    pub dst_full_id: String,
    /// Index of the original event.
    pub index: u64,
    /// Receipt type.
    pub typ: IbtpType,
    /// Result arguments appended to the callback.
    pub result: Vec<Vec<u8>>,
    /// Hub transaction status.
    pub tx_status: TransactionStatus,
    /// Validator signatures.
    pub multi_sign: Vec<Vec<u8>>,
}

impl ReceiptCall {
    /// Positional `invokeReceipt` arguments.
    pub fn to_args(&self) -> Vec<Vec<u8>> {
        [
            self.src_addr.clone(),
            self.dst_full_id.clone(),
            self.index.to_string(),
            self.typ.code().to_string(),
            encode_byte_args(&self.result),
            self.tx_status.code().to_string(),
            encode_byte_args(&self.multi_sign),
        ]
        .into_iter()
        .map(String::into_bytes)
        .collect()
    }
}

/// Which counter `invokeIndexUpdate` advances.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndexCategory {
    /// Inbound requests.
    Inner,
    /// Receipts for our own events.
    Callback,
    /// Rollbacks applied here as destination.
    DstRollback,
}

impl IndexCategory {
    /// Numeric wire code.
    pub const fn code(self) -> u64 {
        match self {
            Self::Inner => 0,
            Self::Callback => 1,
            Self::DstRollback => 2,
        }
    }
}

/// A stored inbound receipt as read from the broker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InMessage {
    /// Whether the local call succeeded.
    pub success: bool,
    /// Result arguments.
    pub results: Vec<Vec<u8>>,
    /// Proof of the read.
    pub proof: Vec<u8>,
    /// Whether the payload is to be encrypted.
    pub encrypt: bool,
    /// Stored receipt type.
    pub typ: IbtpType,
}

/// `{bxhID}-{appchainID}` split in two.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainIds {
    /// Relay hub domain ID.
    pub bxh_id: String,
    /// Application chain ID.
    pub appchain_id: String,
}

impl ChainIds {
    /// Full service ID of a local chaincode key.
    pub fn full_service_id(&self, service_id: &str) -> String {
        format!("{}:{}:{}", self.bxh_id, self.appchain_id, service_id)
    }
}

/// Direct-mode progress of one IBTP.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DirectTransactionInfo {
    /// Unix seconds when the transaction started.
    pub start_timestamp: u64,
    /// Configured timeout period in seconds.
    pub timeout_period: u64,
    /// Tracked status code.
    pub status: u64,
}
