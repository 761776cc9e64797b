//! # Identifiers
//!
//! Service identifiers and the service-pair key that indexes every
//! sequence counter and message record.
//!
//! - Full service ID: `{bxhID}:{chainID}:{channel&chaincode}`
//! - Service pair: `{from}-{to}`
//! - Chaincode key: `{channel}&{chaincode}`

use crate::errors::ProtocolError;
use std::fmt;
use std::str::FromStr;

/// Separator between the two halves of a service pair key.
pub const SERVICE_PAIR_SEPARATOR: char = '-';

/// Separator between the segments of a full service ID.
pub const SERVICE_ID_SEPARATOR: char = ':';

/// Separator between channel and chaincode name.
pub const CHAINCODE_KEY_DELIMITER: char = '&';

/// Chain-qualified contract address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FullServiceId {
    /// Relay hub domain ID. Empty for direct-mode remote services.
    pub bxh_id: String,
    /// Application chain ID.
    pub chain_id: String,
    /// Local service (for ledgers in this family, a chaincode key).
    pub service_id: String,
}

impl FullServiceId {
    /// Build a full service ID from its segments.
    pub fn new(
        bxh_id: impl Into<String>,
        chain_id: impl Into<String>,
        service_id: impl Into<String>,
    ) -> Self {
        Self {
            bxh_id: bxh_id.into(),
            chain_id: chain_id.into(),
            service_id: service_id.into(),
        }
    }

    /// Parse `bxh:chain:service`. The bxh segment may be empty.
    pub fn parse(raw: &str) -> Result<Self, ProtocolError> {
        let parts: Vec<&str> = raw.split(SERVICE_ID_SEPARATOR).collect();
        if parts.len() != 3 || parts[1].is_empty() || parts[2].is_empty() {
            return Err(ProtocolError::InvalidServiceId(raw.to_string()));
        }
        Ok(Self::new(parts[0], parts[1], parts[2]))
    }
}

impl fmt::Display for FullServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.bxh_id, self.chain_id, self.service_id)
    }
}

impl FromStr for FullServiceId {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Ordered `(from, to)` key for counters and message records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServicePair {
    /// Source full service ID.
    pub from: String,
    /// Destination full service ID.
    pub to: String,
}

impl ServicePair {
    /// Create a pair from two service IDs.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Parse a pair key. Exactly two non-empty halves are required.
    pub fn parse(key: &str) -> Result<Self, ProtocolError> {
        let parts: Vec<&str> = key.split(SERVICE_PAIR_SEPARATOR).collect();
        if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
            return Err(ProtocolError::InvalidServicePair(key.to_string()));
        }
        Ok(Self::new(parts[0], parts[1]))
    }

    /// The canonical key string.
    pub fn key(&self) -> String {
        self.to_string()
    }

    /// The same pair seen from the other side.
    pub fn reversed(&self) -> Self {
        Self::new(self.to.clone(), self.from.clone())
    }
}

impl fmt::Display for ServicePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.from, SERVICE_PAIR_SEPARATOR, self.to)
    }
}

impl FromStr for ServicePair {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// `channel&chaincode` address of a deployed chaincode.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChaincodeKey {
    /// Channel the chaincode is deployed on.
    pub channel: String,
    /// Chaincode name.
    pub name: String,
}

impl ChaincodeKey {
    /// Build a key from channel and name.
    pub fn new(channel: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            name: name.into(),
        }
    }

    /// Parse `channel&name`.
    pub fn parse(raw: &str) -> Result<Self, ProtocolError> {
        let parts: Vec<&str> = raw.split(CHAINCODE_KEY_DELIMITER).collect();
        if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
            return Err(ProtocolError::InvalidChaincodeKey(raw.to_string()));
        }
        Ok(Self::new(parts[0], parts[1]))
    }
}

impl fmt::Display for ChaincodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.channel, CHAINCODE_KEY_DELIMITER, self.name)
    }
}

/// Identifier of one interchain call: `from-to-index`.
pub fn ibtp_id(from: &str, to: &str, index: u64) -> String {
    format!("{}-{}-{}", from, to, index)
}
