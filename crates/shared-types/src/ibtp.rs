//! # IBTP Envelope
//!
//! The Interchain Business Transaction Protocol message and the records
//! nested inside its payload.
//!
//! ## Encoding
//!
//! | Layer | Format |
//! |-------|--------|
//! | `Ibtp` on the wire | bincode |
//! | `Ibtp.payload` | bincode `Payload` |
//! | `Payload.content` | bincode `Content` (request) or `InvokeResult` (receipt) |

use crate::errors::ProtocolError;
use crate::identifiers::{ibtp_id, ServicePair};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_with::base64::Base64;
use serde_with::serde_as;

/// Encode a value with the envelope codec.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, ProtocolError> {
    Ok(bincode::serialize(value)?)
}

/// Decode a value with the envelope codec.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ProtocolError> {
    Ok(bincode::deserialize(bytes)?)
}

/// Message classification carried by every IBTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u64", try_from = "u64")]
pub enum IbtpType {
    /// Forward interchain request.
    Interchain,
    /// The destination call succeeded.
    ReceiptSuccess,
    /// The destination call failed.
    ReceiptFailure,
    /// The call is being rolled back.
    ReceiptRollback,
    /// The destination finished its rollback.
    ReceiptRollbackEnd,
}

impl IbtpType {
    /// Numeric wire code.
    pub const fn code(self) -> u64 {
        match self {
            Self::Interchain => 0,
            Self::ReceiptSuccess => 1,
            Self::ReceiptFailure => 2,
            Self::ReceiptRollback => 3,
            Self::ReceiptRollbackEnd => 4,
        }
    }

    /// Parse a numeric wire code.
    pub fn from_code(code: u64) -> Result<Self, ProtocolError> {
        match code {
            0 => Ok(Self::Interchain),
            1 => Ok(Self::ReceiptSuccess),
            2 => Ok(Self::ReceiptFailure),
            3 => Ok(Self::ReceiptRollback),
            4 => Ok(Self::ReceiptRollbackEnd),
            other => Err(ProtocolError::UnknownIbtpType(other)),
        }
    }

    /// Request or response.
    pub fn category(self) -> IbtpCategory {
        match self {
            Self::Interchain => IbtpCategory::Request,
            Self::ReceiptSuccess
            | Self::ReceiptFailure
            | Self::ReceiptRollback
            | Self::ReceiptRollbackEnd => IbtpCategory::Response,
        }
    }

    /// Whether this type belongs to the rollback leg of the protocol.
    pub fn is_rollback(self) -> bool {
        matches!(self, Self::ReceiptRollback | Self::ReceiptRollbackEnd)
    }
}

impl From<IbtpType> for u64 {
    fn from(typ: IbtpType) -> Self {
        typ.code()
    }
}

impl TryFrom<u64> for IbtpType {
    type Error = ProtocolError;

    fn try_from(code: u64) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}

/// Direction of an IBTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IbtpCategory {
    /// Carries a call to execute.
    Request,
    /// Carries the outcome of a call.
    Response,
}

/// Transaction status assigned by the relay hub and carried in the proof.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u64", try_from = "u64")]
pub enum TransactionStatus {
    /// Request accepted, not yet answered.
    #[default]
    Begin,
    /// Request could not begin on the destination.
    BeginFailure,
    /// Rollback started.
    BeginRollback,
    /// Completed successfully.
    Success,
    /// Completed with failure.
    Failure,
    /// Rolled back.
    Rollback,
}

impl TransactionStatus {
    /// Numeric wire code.
    pub const fn code(self) -> u64 {
        match self {
            Self::Begin => 0,
            Self::BeginFailure => 1,
            Self::BeginRollback => 2,
            Self::Success => 3,
            Self::Failure => 4,
            Self::Rollback => 5,
        }
    }

    /// Parse a numeric wire code.
    pub fn from_code(code: u64) -> Result<Self, ProtocolError> {
        match code {
            0 => Ok(Self::Begin),
            1 => Ok(Self::BeginFailure),
            2 => Ok(Self::BeginRollback),
            3 => Ok(Self::Success),
            4 => Ok(Self::Failure),
            5 => Ok(Self::Rollback),
            other => Err(ProtocolError::UnknownTransactionStatus(other)),
        }
    }

    /// In relay mode a receipt must be rolled back unless the hub reports
    /// begin or success.
    pub fn requires_rollback(self) -> bool {
        match self {
            Self::Begin | Self::Success => false,
            Self::BeginFailure | Self::BeginRollback | Self::Failure | Self::Rollback => true,
        }
    }
}

impl From<TransactionStatus> for u64 {
    fn from(status: TransactionStatus) -> Self {
        status.code()
    }
}

impl TryFrom<u64> for TransactionStatus {
    type Error = ProtocolError;

    fn try_from(code: u64) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}

/// Interchain Business Transaction Protocol message.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ibtp {
    /// Source full service ID.
    pub from: String,
    /// Destination full service ID.
    pub to: String,
    /// Sequence number within the service pair.
    pub index: u64,
    /// Message classification.
    #[serde(rename = "type")]
    pub typ: IbtpType,
    /// Creation time, unix nanoseconds. Zero for receipts.
    pub timestamp: i64,
    /// Relay hub block height after which the call times out.
    pub timeout_height: i64,
    /// Opaque inclusion proof.
    #[serde_as(as = "Base64")]
    pub proof: Vec<u8>,
    /// Encoded `Payload`.
    #[serde_as(as = "Base64")]
    pub payload: Vec<u8>,
    /// Optional extension bytes.
    #[serde_as(as = "Base64")]
    #[serde(default)]
    pub extra: Vec<u8>,
}

impl Ibtp {
    /// `from-to-index`.
    pub fn id(&self) -> String {
        ibtp_id(&self.from, &self.to, self.index)
    }

    /// The `(from, to)` pair this message is sequenced under.
    pub fn service_pair(&self) -> ServicePair {
        ServicePair::new(self.from.clone(), self.to.clone())
    }

    /// Request or response.
    pub fn category(&self) -> IbtpCategory {
        self.typ.category()
    }

    /// Decode the outer payload.
    pub fn decode_payload(&self) -> Result<Payload, ProtocolError> {
        decode(&self.payload)
    }

    /// Encode for the wire.
    pub fn encode(&self) -> Result<Vec<u8>, ProtocolError> {
        encode(self)
    }

    /// Decode from the wire.
    pub fn decode(bytes: &[u8]) -> Result<Self, ProtocolError> {
        decode(bytes)
    }
}

/// Business call descriptor carried by request IBTPs.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    /// Calling contract.
    pub src_contract_id: String,
    /// Called contract.
    pub dst_contract_id: String,
    /// Function to invoke on the destination.
    pub func: String,
    /// Call arguments.
    #[serde_as(as = "Vec<Base64>")]
    pub args: Vec<Vec<u8>>,
    /// Callback function on the source.
    pub callback: String,
    /// Callback argument prefix.
    #[serde_as(as = "Vec<Base64>")]
    pub args_cb: Vec<Vec<u8>>,
    /// Rollback function on the source.
    pub rollback: String,
    /// Rollback arguments.
    #[serde_as(as = "Vec<Base64>")]
    pub args_rb: Vec<Vec<u8>>,
}

impl Content {
    /// Encode with the envelope codec.
    pub fn encode(&self) -> Result<Vec<u8>, ProtocolError> {
        encode(self)
    }

    /// Decode with the envelope codec.
    pub fn decode(bytes: &[u8]) -> Result<Self, ProtocolError> {
        decode(bytes)
    }
}

/// Outer payload of an IBTP.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    /// Whether `content` is encrypted.
    pub encrypted: bool,
    /// Encoded `Content` or `InvokeResult`.
    #[serde_as(as = "Base64")]
    pub content: Vec<u8>,
    /// Integrity hash over the carried arguments.
    #[serde_as(as = "Base64")]
    pub hash: Vec<u8>,
}

impl Payload {
    /// Encode with the envelope codec.
    pub fn encode(&self) -> Result<Vec<u8>, ProtocolError> {
        encode(self)
    }

    /// Decode with the envelope codec.
    pub fn decode(bytes: &[u8]) -> Result<Self, ProtocolError> {
        decode(bytes)
    }
}

/// Result values of a single call.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRes {
    /// Raw return values.
    #[serde_as(as = "Vec<Base64>")]
    pub data: Vec<Vec<u8>>,
}

/// Outcome of one or more calls, carried by receipt IBTPs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvokeResult {
    /// Per-call result values.
    pub data: Vec<ResultRes>,
    /// Per-call success flags.
    pub multi_status: Vec<bool>,
}

impl InvokeResult {
    /// Encode with the envelope codec.
    pub fn encode(&self) -> Result<Vec<u8>, ProtocolError> {
        encode(self)
    }

    /// Decode with the envelope codec.
    pub fn decode(bytes: &[u8]) -> Result<Self, ProtocolError> {
        decode(bytes)
    }
}

/// Proof attached by the relay hub to an inbound IBTP.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BxhProof {
    /// Hub-side transaction status.
    pub tx_status: TransactionStatus,
    /// Validator signatures over the message.
    #[serde_as(as = "Vec<Base64>")]
    pub multi_sign: Vec<Vec<u8>>,
}

/// Answer returned to the relay hub for a submitted IBTP.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitIbtpResponse {
    /// Whether the ledger accepted the call.
    pub status: bool,
    /// Human-readable outcome.
    pub message: String,
    /// Receipt or rollback IBTP produced by the call, if any.
    pub result: Option<Ibtp>,
}
