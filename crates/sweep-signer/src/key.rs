//! Address derivation from secp256k1 keys.

use alloy::primitives::Address;
use k256::ecdsa::{SigningKey, VerifyingKey};
use sha3::{Digest, Keccak256};

/// Derives the 20-byte account address from a signing key.
///
/// EVM chains use it directly; Tron prefixes it with its `0x41` marker.
pub fn public_key_to_address(key: &SigningKey) -> Address {
    verifying_key_to_address(key.verifying_key())
}

pub fn verifying_key_to_address(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    // Skip the 0x04 prefix byte, hash the remaining 64 bytes
    let hash = Keccak256::digest(&point.as_bytes()[1..]);
    Address::from_slice(&hash[12..])
}
