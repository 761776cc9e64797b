//! Keccak-256 helpers used for payload integrity hashes.

use sha3::{Digest, Keccak256};

/// Compute keccak256 of a byte slice.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute keccak256 over the concatenation of several byte strings.
pub fn keccak256_concat<T: AsRef<[u8]>>(parts: &[T]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    for part in parts {
        hasher.update(part.as_ref());
    }
    hasher.finalize().into()
}
