//! # Relay Configuration
//!
//! `relay.toml` in the repo directory, with defaults for every field and
//! environment overrides.
//!
//! ## Environment Overrides
//!
//! Every key can be overridden with `FABRIC_` followed by its dotted path,
//! upper-cased, dots replaced by underscores:
//!
//! | Key                       | Variable                         |
//! |---------------------------|----------------------------------|
//! | `fabric.bxh_id`           | `FABRIC_FABRIC_BXH_ID`           |
//! | `mode.type`               | `FABRIC_MODE_TYPE`               |
//! | `mode.direct.rule_addr`   | `FABRIC_MODE_DIRECT_RULE_ADDR`   |

use ir_04_relay_client::ClientConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// File name of the configuration inside the repo directory.
pub const CONFIG_NAME: &str = "relay.toml";

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "FABRIC";

/// Relay mode tag.
pub const RELAY_MODE: &str = "relay";

/// Direct mode tag.
pub const DIRECT_MODE: &str = "direct";

/// Default rule address registered for direct-mode peers.
pub const DEFAULT_RULE_ADDR: &str = "0x00000000000000000000000000000000000000a2";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read or written.
    #[error("config file {path}: {source}")]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The file is not valid TOML for this layout.
    #[error("parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The defaults could not be rendered.
    #[error("render config: {0}")]
    Render(#[from] toml::ser::Error),

    /// `init` found an existing file.
    #[error("config file {0} already exists")]
    AlreadyExists(PathBuf),

    /// An environment override has the wrong type.
    #[error("environment variable {key}: cannot parse {value:?}")]
    InvalidEnv {
        /// Variable name.
        key: String,
        /// Offending value.
        value: String,
    },

    /// `mode.type` is neither `relay` nor `direct`.
    #[error("unknown mode {0:?}, expected \"relay\" or \"direct\"")]
    UnknownMode(String),

    /// Direct mode without a peer chain.
    #[error("direct mode requires mode.direct.chainId")]
    MissingPeerChain,
}

/// Full relay configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Ledger and relay identity.
    pub fabric: FabricConfig,
    /// Operating mode.
    pub mode: ModeConfig,
}

/// Ledger-side settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FabricConfig {
    /// Plugin name.
    pub name: String,
    /// Relay hub ID written into the broker.
    pub bxh_id: String,
    /// Application chain ID written into the broker.
    pub appchain_id: String,
    /// Port of the verification service; 0 disables it.
    pub port: u16,
    /// Channel the chaincodes are deployed on.
    pub channel_id: String,
    /// MSP ID the relay submits as.
    pub creator: String,
    /// Timeout height stamped on outbound IBTPs.
    pub timeout_height: i64,
    /// Polling interval in milliseconds.
    pub poll_interval_ms: u64,
    /// Retry interval in milliseconds.
    pub retry_interval_ms: u64,
    /// Capacity of the IBTP delivery channel.
    pub delivery_capacity: usize,
    /// Ledger directory. Empty keeps the ledger in memory.
    pub data_dir: String,
}

impl Default for FabricConfig {
    fn default() -> Self {
        Self {
            name: "fabric".to_string(),
            bxh_id: "1356".to_string(),
            appchain_id: "appchain1".to_string(),
            port: 0,
            channel_id: "mychannel".to_string(),
            creator: "Org1MSP".to_string(),
            timeout_height: 0,
            poll_interval_ms: 2_000,
            retry_interval_ms: 2_000,
            delivery_capacity: 1_024,
            data_dir: String::new(),
        }
    }
}

/// Operating mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeConfig {
    /// `relay` or `direct`. Empty means relay.
    #[serde(rename = "type")]
    pub kind: String,
    /// Direct-mode settings.
    pub direct: DirectConfig,
}

/// Direct-mode peer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectConfig {
    /// Peer chain ID.
    #[serde(rename = "chainId")]
    pub chain_id: String,
    /// Local service the peer may call, as `channel&chaincode`.
    #[serde(rename = "serviceId")]
    pub service_id: String,
    /// Seconds before an unfinished transaction times out.
    pub timeout_period: u64,
    /// Rule address registered for the peer.
    pub rule_addr: String,
}

impl Default for DirectConfig {
    fn default() -> Self {
        Self {
            chain_id: String::new(),
            service_id: String::new(),
            timeout_period: 60,
            rule_addr: DEFAULT_RULE_ADDR.to_string(),
        }
    }
}

impl RelayConfig {
    /// Path of the config file inside `repo`.
    pub fn path(repo: &Path) -> PathBuf {
        repo.join(CONFIG_NAME)
    }

    /// Read `repo/relay.toml`, then apply process environment overrides.
    pub fn load(repo: &Path) -> Result<Self, ConfigError> {
        let path = Self::path(repo);
        let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let mut config = Self::from_toml(&raw)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        info!("[relay-node] Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write the default configuration to `repo/relay.toml`.
    pub fn write_default(repo: &Path) -> Result<PathBuf, ConfigError> {
        let path = Self::path(repo);
        if path.exists() {
            return Err(ConfigError::AlreadyExists(path));
        }
        let io_err = |source| ConfigError::Io {
            path: path.clone(),
            source,
        };
        std::fs::create_dir_all(repo).map_err(io_err)?;
        std::fs::write(&path, Self::default().to_toml()?).map_err(io_err)?;
        Ok(path)
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let fabric = &mut self.fabric;
        override_with(&lookup, "fabric.name", &mut fabric.name)?;
        override_with(&lookup, "fabric.bxh_id", &mut fabric.bxh_id)?;
        override_with(&lookup, "fabric.appchain_id", &mut fabric.appchain_id)?;
        override_with(&lookup, "fabric.port", &mut fabric.port)?;
        override_with(&lookup, "fabric.channel_id", &mut fabric.channel_id)?;
        override_with(&lookup, "fabric.creator", &mut fabric.creator)?;
        override_with(&lookup, "fabric.timeout_height", &mut fabric.timeout_height)?;
        override_with(&lookup, "fabric.poll_interval_ms", &mut fabric.poll_interval_ms)?;
        override_with(&lookup, "fabric.retry_interval_ms", &mut fabric.retry_interval_ms)?;
        override_with(&lookup, "fabric.delivery_capacity", &mut fabric.delivery_capacity)?;
        override_with(&lookup, "fabric.data_dir", &mut fabric.data_dir)?;

        let mode = &mut self.mode;
        override_with(&lookup, "mode.type", &mut mode.kind)?;
        override_with(&lookup, "mode.direct.chainId", &mut mode.direct.chain_id)?;
        override_with(&lookup, "mode.direct.serviceId", &mut mode.direct.service_id)?;
        override_with(&lookup, "mode.direct.timeout_period", &mut mode.direct.timeout_period)?;
        override_with(&lookup, "mode.direct.rule_addr", &mut mode.direct.rule_addr)?;
        Ok(())
    }

    /// Check the mode settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.mode.kind.as_str() {
            "" | RELAY_MODE => Ok(()),
            DIRECT_MODE if self.mode.direct.chain_id.is_empty() => Err(ConfigError::MissingPeerChain),
            DIRECT_MODE => Ok(()),
            other => Err(ConfigError::UnknownMode(other.to_string())),
        }
    }

    /// Whether the broker runs without a relay hub.
    pub fn is_direct(&self) -> bool {
        self.mode.kind == DIRECT_MODE
    }

    /// Validator threshold passed to the broker: zero selects direct mode.
    pub fn val_threshold(&self) -> u64 {
        if self.is_direct() {
            0
        } else {
            1
        }
    }

    /// Relay client settings.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            name: self.fabric.name.clone(),
            timeout_height: self.fabric.timeout_height,
            timeout_period: self.mode.direct.timeout_period,
            poll_interval: Duration::from_millis(self.fabric.poll_interval_ms),
            retry_interval: Duration::from_millis(self.fabric.retry_interval_ms),
            delivery_capacity: self.fabric.delivery_capacity,
        }
    }
}

/// `fabric.bxh_id` -> `FABRIC_FABRIC_BXH_ID`.
pub fn env_key(path: &str) -> String {
    format!("{}_{}", ENV_PREFIX, path.replace('.', "_")).to_ascii_uppercase()
}

fn override_with<T, F>(lookup: &F, path: &str, slot: &mut T) -> Result<(), ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let key = env_key(path);
    if let Some(value) = lookup(&key) {
        *slot = value
            .parse()
            .map_err(|_| ConfigError::InvalidEnv { key, value })?;
    }
    Ok(())
}
