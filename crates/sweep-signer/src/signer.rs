//! Signing interface.
//!
//! Provides a unified trait for signing 32-byte digests, plus an in-memory
//! implementation backed by a raw private key.

use std::fmt;

use alloy::primitives::Address;
use k256::ecdsa::SigningKey;
use thiserror::Error;

use crate::key::public_key_to_address;

/// Errors from key loading or signing.
#[derive(Debug, Error)]
pub enum SignerError {
    #[error("invalid private key: {0}")]
    InvalidKey(String),
    #[error("signing failed: {0}")]
    Signing(String),
}

/// A recoverable secp256k1 signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub r: [u8; 32],
    pub s: [u8; 32],
    /// Recovery id plus 27.
    pub v: u8,
}

impl Signature {
    /// Zero-based recovery id.
    pub fn recovery_id(&self) -> u8 {
        self.v - 27
    }

    /// `r ‖ s ‖ v`, 65 bytes.
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[..32].copy_from_slice(&self.r);
        out[32..64].copy_from_slice(&self.s);
        out[64] = self.v;
        out
    }
}

/// A signer that can sign prehashed digests.
pub trait Signer: Send + Sync {
    /// Sign a 32-byte digest.
    fn sign_hash(&self, hash: &[u8; 32]) -> Result<Signature, SignerError>;

    /// Returns the signer's 20-byte address.
    fn address(&self) -> Address;
}

/// Signer holding a private key in memory.
pub struct LocalSigner {
    key: SigningKey,
    address: Address,
}

impl fmt::Debug for LocalSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalSigner")
            .field("address", &self.address)
            .field("key", &"<redacted>")
            .finish()
    }
}

impl LocalSigner {
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self, SignerError> {
        let key = SigningKey::from_bytes(&(*bytes).into())
            .map_err(|e| SignerError::InvalidKey(e.to_string()))?;
        let address = public_key_to_address(&key);
        Ok(Self { key, address })
    }

    /// Parses a 32-byte hex private key, with or without `0x`.
    pub fn from_hex(key_hex: &str) -> Result<Self, SignerError> {
        let trimmed = key_hex.trim();
        let stripped = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes = hex::decode(stripped)
            .map_err(|_| SignerError::InvalidKey("not valid hex".into()))?;
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|v: Vec<u8>| SignerError::InvalidKey(format!("expected 32 bytes, got {}", v.len())))?;
        Self::from_bytes(&bytes)
    }
}

impl Signer for LocalSigner {
    fn sign_hash(&self, hash: &[u8; 32]) -> Result<Signature, SignerError> {
        let (sig, recid) = self
            .key
            .sign_prehash_recoverable(hash)
            .map_err(|e| SignerError::Signing(e.to_string()))?;
        let bytes = sig.to_bytes();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..]);
        Ok(Signature {
            r,
            s,
            v: recid.to_byte() + 27,
        })
    }

    fn address(&self) -> Address {
        self.address
    }
}
