//! # Chaincode Stub
//!
//! The view a running chaincode has of its transaction: namespaced state,
//! proposal arguments, caller identity and nested invocation.

use super::overlay::RawState;
use crate::domain::{LedgerError, TxContext, MAX_CALL_DEPTH};
use crate::ports::{Chaincode, StateAccess};
use shared_types::{ChaincodeKey, ChaincodeResponse};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Deployed chaincodes by name.
pub type ChaincodeRegistry = HashMap<String, Arc<dyn Chaincode>>;

const NAMESPACE_SEPARATOR: u8 = 0;

/// Transaction handle passed to `Chaincode::init` and `Chaincode::invoke`.
pub struct ChaincodeStub<'a> {
    state: &'a mut dyn RawState,
    registry: &'a ChaincodeRegistry,
    ctx: &'a TxContext,
    namespace: String,
    function: String,
    params: Vec<Vec<u8>>,
    depth: usize,
}

impl<'a> ChaincodeStub<'a> {
    /// Stub for the top-level call of a proposal. `args[0]` is the function.
    pub fn new(
        state: &'a mut dyn RawState,
        registry: &'a ChaincodeRegistry,
        ctx: &'a TxContext,
        namespace: impl Into<String>,
        args: Vec<Vec<u8>>,
    ) -> Self {
        let (function, params) = split_args(args);
        Self {
            state,
            registry,
            ctx,
            namespace: namespace.into(),
            function,
            params,
            depth: 0,
        }
    }

    /// Function name of this call.
    pub fn function(&self) -> &str {
        &self.function
    }

    /// Raw parameters after the function name.
    pub fn params(&self) -> &[Vec<u8>] {
        &self.params
    }

    /// Parameters decoded as UTF-8.
    pub fn string_params(&self) -> Result<Vec<String>, LedgerError> {
        self.params
            .iter()
            .map(|p| {
                String::from_utf8(p.clone())
                    .map_err(|_| LedgerError::InvalidArgument("argument is not utf-8".to_string()))
            })
            .collect()
    }

    /// MSP ID of the identity that submitted the proposal.
    pub fn creator(&self) -> &str {
        &self.ctx.creator
    }

    /// Transaction ID.
    pub fn tx_id(&self) -> &str {
        &self.ctx.tx_id
    }

    /// Channel the transaction runs on.
    pub fn channel_id(&self) -> &str {
        &self.ctx.channel_id
    }

    /// Unix seconds at proposal time.
    pub fn tx_timestamp(&self) -> u64 {
        self.ctx.timestamp
    }

    /// The chaincode the proposal was sent to, as `channel&name`.
    ///
    /// Stays the same across nested calls, so a callee sees who called it
    /// from outside the ledger.
    pub fn invoked_chaincode(&self) -> ChaincodeKey {
        ChaincodeKey::new(self.ctx.channel_id.clone(), self.ctx.entry_chaincode.clone())
    }

    /// Name of the chaincode currently executing.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Call another chaincode inside the same transaction.
    ///
    /// Writes made by the callee share this transaction's overlay.
    pub fn invoke_chaincode(
        &mut self,
        name: &str,
        args: Vec<Vec<u8>>,
        channel: &str,
    ) -> ChaincodeResponse {
        if channel != self.ctx.channel_id {
            return ChaincodeResponse::error(format!(
                "cross-channel invocation to {} is not supported",
                channel
            ));
        }
        if self.depth >= MAX_CALL_DEPTH {
            return ChaincodeResponse::error("maximum chaincode call depth exceeded");
        }
        let chaincode = match self.registry.get(name) {
            Some(cc) => Arc::clone(cc),
            None => return ChaincodeResponse::error(format!("chaincode {} not found", name)),
        };

        let (function, params) = split_args(args);
        debug!(
            "[ir-01] {} -> {}.{} (depth {})",
            self.namespace,
            name,
            function,
            self.depth + 1
        );

        let mut child = ChaincodeStub {
            state: &mut *self.state,
            registry: self.registry,
            ctx: self.ctx,
            namespace: name.to_string(),
            function,
            params,
            depth: self.depth + 1,
        };
        chaincode.invoke(&mut child)
    }

    fn raw_key(&self, key: &str) -> Vec<u8> {
        let mut raw = Vec::with_capacity(self.namespace.len() + 1 + key.len());
        raw.extend_from_slice(self.namespace.as_bytes());
        raw.push(NAMESPACE_SEPARATOR);
        raw.extend_from_slice(key.as_bytes());
        raw
    }
}

impl StateAccess for ChaincodeStub<'_> {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        Ok(self.state.get(&self.raw_key(key))?)
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        if key.is_empty() {
            return Err(LedgerError::InvalidArgument("empty state key".to_string()));
        }
        let raw = self.raw_key(key);
        self.state.put(raw, value);
        Ok(())
    }

    fn del_state(&mut self, key: &str) -> Result<(), LedgerError> {
        let raw = self.raw_key(key);
        self.state.delete(raw);
        Ok(())
    }

    fn get_state_by_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, LedgerError> {
        let raw_prefix = self.raw_key(prefix);
        let strip = self.namespace.len() + 1;
        self.state
            .scan(&raw_prefix)?
            .into_iter()
            .map(|(key, value)| {
                let key = String::from_utf8(key[strip..].to_vec()).map_err(|_| {
                    LedgerError::CorruptedState {
                        key: String::from_utf8_lossy(&key).into_owned(),
                        message: "key is not utf-8".to_string(),
                    }
                })?;
                Ok((key, value))
            })
            .collect()
    }
}

fn split_args(args: Vec<Vec<u8>>) -> (String, Vec<Vec<u8>>) {
    let mut iter = args.into_iter();
    let function = iter
        .next()
        .map(|f| String::from_utf8_lossy(&f).into_owned())
        .unwrap_or_default();
    (function, iter.collect())
}
