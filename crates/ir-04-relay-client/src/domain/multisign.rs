//! # Multi-Signature Verification
//!
//! Checks that enough distinct relay hub validators signed a hash.
//!
//! Signatures are 65 bytes `r || s || v`. Anything of another length is
//! ignored. Signer addresses are the last 20 bytes of keccak256 over the
//! uncompressed public key, compared against validator addresses without
//! regard to case or a `0x` prefix.

use super::errors::MultiSignError;
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use rayon::prelude::*;
use shared_types::keccak256;
use std::collections::HashSet;

/// Length of a recoverable signature.
pub const SIGNATURE_LENGTH: usize = 65;

/// 20-byte account address.
pub type Address = [u8; 20];

/// Parse a hex hash, with or without `0x`.
pub fn parse_hash(raw: &str) -> Result<[u8; 32], MultiSignError> {
    let bytes = hex::decode(strip_prefix(raw.trim()))
        .map_err(|e| MultiSignError::InvalidHash(e.to_string()))?;
    bytes
        .try_into()
        .map_err(|b: Vec<u8>| MultiSignError::InvalidHash(format!("expected 32 bytes, got {}", b.len())))
}

/// Recover the signer of a 65-byte signature.
pub fn recover_signer(hash: &[u8; 32], signature: &[u8]) -> Result<Address, MultiSignError> {
    if signature.len() != SIGNATURE_LENGTH {
        return Err(MultiSignError::RecoveryFailed);
    }
    let recovery_id = parse_recovery_id(signature[64])?;
    let sig = Signature::from_slice(&signature[..64]).map_err(|_| MultiSignError::RecoveryFailed)?;
    let key = VerifyingKey::recover_from_prehash(hash, &sig, recovery_id)
        .map_err(|_| MultiSignError::RecoveryFailed)?;
    Ok(address_from_pubkey(&key))
}

/// Address of a public key.
pub fn address_from_pubkey(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    address
}

/// Whether `threshold` distinct validators signed `hash`.
///
/// Signatures are recovered in parallel and then counted in order; the
/// check passes as soon as the count reaches `threshold`, so an
/// unrecoverable signature after that point is never reported. A zero
/// threshold never passes.
pub fn verify_multi_sign(
    hash: &[u8; 32],
    signatures: &[Vec<u8>],
    validators: &[String],
    threshold: u64,
) -> Result<bool, MultiSignError> {
    let allowed: HashSet<String> = validators
        .iter()
        .map(|v| strip_prefix(v.trim()).to_ascii_lowercase())
        .collect();

    let recovered: Vec<Result<Address, MultiSignError>> = signatures
        .par_iter()
        .filter(|sig| sig.len() == SIGNATURE_LENGTH)
        .map(|sig| recover_signer(hash, sig))
        .collect();

    let mut signers = HashSet::new();
    for result in recovered {
        let address = hex::encode(result?);
        if allowed.contains(&address) && signers.insert(address) && signers.len() as u64 == threshold {
            return Ok(true);
        }
    }
    Ok(false)
}

fn parse_recovery_id(v: u8) -> Result<RecoveryId, MultiSignError> {
    let normalized = match v {
        0 | 27 => 0,
        1 | 28 => 1,
        _ => return Err(MultiSignError::RecoveryFailed),
    };
    RecoveryId::try_from(normalized).map_err(|_| MultiSignError::RecoveryFailed)
}

fn strip_prefix(raw: &str) -> &str {
    raw.strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .unwrap_or(raw)
}
