//! # Broker Service - Governance
//!
//! Admin bootstrap, full reset and the register/audit whitelist workflow.

use super::*;
use crate::domain::{
    RegistrationProposal, VoteOutcome, VoteStatus, DEFAULT_ADMIN_THRESHOLD, DEFAULT_APPCHAIN_ID,
    DEFAULT_BXH_ID,
};
use crate::ports::GovernanceApi;
use ir_01_ledger_store::{CounterFamily, MessageStore, SequenceStore};
use shared_types::ChaincodeKey;
use std::collections::BTreeMap;
use tracing::info;

type AdminList = BTreeMap<String, u64>;
type Whitelist = BTreeMap<String, bool>;
type Proposals = BTreeMap<String, RegistrationProposal>;

impl BrokerService<'_, '_> {
    /// Number of admins with an active entry.
    pub(crate) fn admin_count(&self) -> Result<u64, BrokerError> {
        let admins: AdminList = self.get_json(keys::ADMIN_LIST)?;
        Ok(admins.values().filter(|flag| **flag == 1).count() as u64)
    }

    pub(crate) fn admin_threshold(&self) -> Result<u64, BrokerError> {
        match self.get_string(keys::ADMIN_THRESHOLD)? {
            None => Ok(DEFAULT_ADMIN_THRESHOLD),
            Some(raw) => raw.parse().map_err(|_| {
                BrokerError::Ledger(LedgerError::CorruptedState {
                    key: keys::ADMIN_THRESHOLD.to_string(),
                    message: format!("not an integer: {}", raw),
                })
            }),
        }
    }

    /// Key of the chaincode the proposal entered through.
    pub(crate) fn caller_key(&self) -> String {
        self.stub.invoked_chaincode().to_string()
    }

    /// Empty every counter, message, whitelist and proposal.
    fn reset_state(&mut self) -> Result<(), BrokerError> {
        for family in CounterFamily::ALL {
            self.stub.clear_counters(family)?;
        }
        self.stub.clear_messages()?;
        self.put_json(keys::LOCAL_WHITELIST, &Whitelist::new())?;
        self.put_json(keys::LOCAL_SERVICE_PROPOSAL, &Proposals::new())?;
        self.put_json(keys::LOCAL_SERVICE_LIST, &Vec::<String>::new())?;
        self.put_json(keys::SERVICE_ORDERED_LIST, &Whitelist::new())?;
        self.put_json(keys::VALIDATOR_LIST, &Vec::<String>::new())?;
        self.put_string(keys::ADMIN_THRESHOLD, &DEFAULT_ADMIN_THRESHOLD.to_string())
    }
}

impl GovernanceApi for BrokerService<'_, '_> {
    fn bootstrap(
        &mut self,
        extra_admins: &[String],
        admin_threshold: Option<u64>,
    ) -> Result<(), BrokerError> {
        let mut admins = AdminList::new();
        admins.insert(self.stub.creator().to_string(), 1);
        for admin in extra_admins.iter().filter(|a| !a.is_empty()) {
            admins.insert(admin.clone(), 1);
        }

        let threshold = admin_threshold.unwrap_or(DEFAULT_ADMIN_THRESHOLD);
        if threshold == 0 || threshold > admins.len() as u64 {
            return Err(BrokerError::InvalidArguments(format!(
                "admin threshold {} out of range for {} admins",
                threshold,
                admins.len()
            )));
        }

        self.put_json(keys::ADMIN_LIST, &admins)?;
        self.put_string(keys::BXH_ID, DEFAULT_BXH_ID)?;
        self.put_string(keys::APPCHAIN_ID, DEFAULT_APPCHAIN_ID)?;
        self.put_string(keys::VAL_THRESHOLD, &DEFAULT_VAL_THRESHOLD.to_string())?;
        self.reset_state()?;
        self.put_string(keys::ADMIN_THRESHOLD, &threshold.to_string())?;
        info!(
            "[ir-03] Broker bootstrapped with {} admins, threshold {}",
            admins.len(),
            threshold
        );
        Ok(())
    }

    fn initialize(
        &mut self,
        bxh_id: &str,
        appchain_id: &str,
        val_threshold: u64,
    ) -> Result<(), BrokerError> {
        self.reset_state()?;
        self.put_string(keys::BXH_ID, bxh_id)?;
        self.put_string(keys::APPCHAIN_ID, appchain_id)?;
        self.put_string(keys::VAL_THRESHOLD, &val_threshold.to_string())?;

        let mode = Mode::from_threshold(val_threshold);
        if mode.is_direct() {
            self.call_tracker("initialize", &[])?;
        }
        info!(
            "[ir-03] Broker initialized as {}:{} in {:?} mode",
            bxh_id, appchain_id, mode
        );
        Ok(())
    }

    fn register(&mut self, ordered: bool) -> Result<String, BrokerError> {
        let key = self.caller_key();
        let whitelist: Whitelist = self.get_json(keys::LOCAL_WHITELIST)?;
        let mut proposals: Proposals = self.get_json(keys::LOCAL_SERVICE_PROPOSAL)?;

        let pending = proposals.get(&key).map(|p| p.exist).unwrap_or(false);
        if whitelist.get(&key).copied().unwrap_or(false) || pending {
            return Ok(key);
        }

        proposals.insert(key.clone(), RegistrationProposal::open(ordered));
        self.put_json(keys::LOCAL_SERVICE_PROPOSAL, &proposals)?;
        info!("[ir-03] Registration proposal opened for {}", key);
        Ok(key)
    }

    fn audit(
        &mut self,
        target: &ChaincodeKey,
        status: VoteStatus,
    ) -> Result<VoteOutcome, BrokerError> {
        let key = target.to_string();
        let mut proposals: Proposals = self.get_json(keys::LOCAL_SERVICE_PROPOSAL)?;
        let threshold = self.admin_threshold()?;
        let admin_count = self.admin_count()?;
        let voter = self.stub.creator().to_string();

        let proposal = proposals.get_mut(&key).ok_or(BrokerError::ProposalNotFound)?;
        let outcome = proposal.vote(&voter, status, threshold, admin_count)?;
        let ordered = proposal.ordered;
        self.put_json(keys::LOCAL_SERVICE_PROPOSAL, &proposals)?;

        if outcome == VoteOutcome::Approved {
            let mut whitelist: Whitelist = self.get_json(keys::LOCAL_WHITELIST)?;
            whitelist.insert(key.clone(), true);
            self.put_json(keys::LOCAL_WHITELIST, &whitelist)?;

            let mut services: Vec<String> = self.get_json(keys::LOCAL_SERVICE_LIST)?;
            if !services.contains(&key) {
                services.push(key.clone());
            }
            self.put_json(keys::LOCAL_SERVICE_LIST, &services)?;

            let mut ordered_list: Whitelist = self.get_json(keys::SERVICE_ORDERED_LIST)?;
            ordered_list.insert(key.clone(), ordered);
            self.put_json(keys::SERVICE_ORDERED_LIST, &ordered_list)?;
        }
        info!("[ir-03] {} voted on {}: {:?}", voter, key, outcome);
        Ok(outcome)
    }

    fn is_admin(&self, msp_id: &str) -> Result<bool, BrokerError> {
        let admins: AdminList = self.get_json(keys::ADMIN_LIST)?;
        Ok(admins.get(msp_id).copied() == Some(1))
    }

    fn is_whitelisted(&self, key: &str) -> Result<bool, BrokerError> {
        let whitelist: Whitelist = self.get_json(keys::LOCAL_WHITELIST)?;
        Ok(whitelist.get(key).copied().unwrap_or(false))
    }
}
