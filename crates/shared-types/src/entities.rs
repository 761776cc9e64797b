//! # Ledger Records
//!
//! Records persisted by the broker contract and returned through its
//! query functions. JSON field names are part of the ledger format.
//!
//! ## Records
//!
//! - **Outbound**: `Event`, `CallFunc`
//! - **Inbound**: `Receipt`
//! - **Responses**: `ChaincodeResponse`, `BrokerResponse`
//! - **Direct mode**: `Appchain`, `DirectTransactionMeta`

use crate::errors::ProtocolError;
use crate::ibtp::{Content, IbtpType};
use crate::identifiers::ServicePair;
use serde::{Deserialize, Serialize};
use serde_with::base64::Base64;
use serde_with::serde_as;

/// A function name plus its arguments.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallFunc {
    /// Function name. Empty means "nothing to call".
    #[serde(default)]
    pub func: String,
    /// Raw arguments.
    #[serde_as(as = "Vec<Base64>")]
    #[serde(default)]
    pub args: Vec<Vec<u8>>,
}

impl CallFunc {
    /// Build a call descriptor.
    pub fn new(func: impl Into<String>, args: Vec<Vec<u8>>) -> Self {
        Self {
            func: func.into(),
            args,
        }
    }

    /// Whether there is a function to invoke.
    pub fn is_empty(&self) -> bool {
        self.func.is_empty()
    }
}

/// Outbound interchain event, immutable once emitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Sequence number under the outer counter of the pair.
    pub index: u64,
    /// Destination full service ID.
    pub dst_full_id: String,
    /// Source full service ID.
    pub src_full_id: String,
    /// Whether the payload is to be encrypted.
    pub encrypt: bool,
    /// Call executed on the destination.
    pub call_func: CallFunc,
    /// Callback executed on the source after success.
    pub callback: CallFunc,
    /// Rollback executed on the source after failure.
    pub rollback: CallFunc,
}

impl Event {
    /// The pair this event is sequenced under.
    pub fn service_pair(&self) -> ServicePair {
        ServicePair::new(self.src_full_id.clone(), self.dst_full_id.clone())
    }

    /// Business call descriptor for the request IBTP.
    pub fn to_content(&self) -> Content {
        Content {
            src_contract_id: self.src_full_id.clone(),
            dst_contract_id: self.dst_full_id.clone(),
            func: self.call_func.func.clone(),
            args: self.call_func.args.clone(),
            callback: self.callback.func.clone(),
            args_cb: self.callback.args.clone(),
            rollback: self.rollback.func.clone(),
            args_rb: self.rollback.args.clone(),
        }
    }

    /// Parse from ledger JSON.
    pub fn from_json(bytes: &[u8]) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Raw response of a chaincode invocation.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaincodeResponse {
    /// Status code; 200 on success.
    pub status: i32,
    /// Error message, empty on success.
    #[serde(default)]
    pub message: String,
    /// Returned bytes.
    #[serde_as(as = "Base64")]
    #[serde(default)]
    pub payload: Vec<u8>,
}

impl ChaincodeResponse {
    /// Success status.
    pub const OK: i32 = 200;
    /// Statuses at or above this are errors.
    pub const ERROR_THRESHOLD: i32 = 400;
    /// Requested record does not exist.
    pub const NOT_FOUND: i32 = 404;
    /// Generic error status.
    pub const ERROR: i32 = 500;

    /// Successful response carrying `payload`.
    pub fn success(payload: Vec<u8>) -> Self {
        Self {
            status: Self::OK,
            message: String::new(),
            payload,
        }
    }

    /// Error response carrying `message`.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Self::ERROR,
            message: message.into(),
            payload: Vec::new(),
        }
    }

    /// Not-found response carrying `message`.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: Self::NOT_FOUND,
            message: message.into(),
            payload: Vec::new(),
        }
    }

    /// Whether the status is below the error threshold.
    pub fn is_ok(&self) -> bool {
        self.status < Self::ERROR_THRESHOLD
    }
}

/// Inbound receipt record kept for the relay client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Whether the payload is to be encrypted.
    pub encrypt: bool,
    /// Result classification.
    pub typ: IbtpType,
    /// Raw response of the local call.
    pub result: ChaincodeResponse,
}

impl Receipt {
    /// Parse from ledger JSON.
    pub fn from_json(bytes: &[u8]) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Structured `{ok, message, data}` response of broker entrypoints.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokerResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Failure reason.
    #[serde(default)]
    pub message: String,
    /// Returned bytes.
    #[serde_as(as = "Base64")]
    #[serde(default)]
    pub data: Vec<u8>,
}

impl BrokerResponse {
    /// Successful response.
    pub fn success(data: Vec<u8>) -> Self {
        Self {
            ok: true,
            message: String::new(),
            data,
        }
    }

    /// Failed response.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            data: Vec::new(),
        }
    }

    /// Serialize to JSON bytes.
    pub fn to_json(&self) -> Vec<u8> {
        // Only strings, bools and byte vectors; serialization cannot fail.
        serde_json::to_vec(self).unwrap_or_default()
    }

    /// Parse from JSON bytes.
    pub fn from_json(bytes: &[u8]) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// A peer application chain registered for direct mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appchain {
    /// Chain ID.
    pub id: String,
    /// Broker contract address on that chain.
    pub broker: String,
    /// Root of trust used to validate its proofs.
    pub trust_root: String,
    /// Validation rule address.
    pub rule_addr: String,
    /// 1 once available.
    pub status: u64,
    /// Registration marker.
    pub exist: bool,
}

/// Direct-mode bookkeeping for one IBTP.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectTransactionMeta {
    /// Unix seconds when the transaction started.
    pub start_timestamp: u64,
    /// Status code as tracked on the ledger.
    pub transaction_status: u64,
}
