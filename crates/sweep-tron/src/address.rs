//! Tron address codec.
//!
//! A Tron account is the same 20-byte hash an EVM chain uses, prefixed
//! with the `0x41` marker. Externally it is written in base58check; the
//! HTTP API takes the 21-byte hex form; contract parameters take the bare
//! 20-byte form.

use std::fmt;
use std::str::FromStr;

use alloy::primitives::Address;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Version byte of every mainnet and testnet Tron address.
pub const ADDRESS_PREFIX: u8 = 0x41;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("invalid base58: {0}")]
    Base58(String),
    #[error("bad checksum")]
    Checksum,
    #[error("expected 21 bytes with 0x41 prefix")]
    Prefix,
    #[error("invalid hex: {0}")]
    Hex(String),
    #[error("unrecognized address format: {0}")]
    Format(String),
}

/// A Tron address in its canonical 21-byte form.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TronAddress([u8; 21]);

fn checksum(payload: &[u8]) -> [u8; 4] {
    let first = Sha256::digest(payload);
    let second = Sha256::digest(first);
    let mut out = [0u8; 4];
    out.copy_from_slice(&second[..4]);
    out
}

impl TronAddress {
    pub fn from_evm(address: Address) -> Self {
        let mut bytes = [0u8; 21];
        bytes[0] = ADDRESS_PREFIX;
        bytes[1..].copy_from_slice(address.as_slice());
        Self(bytes)
    }

    /// The 20-byte form used inside ABI-encoded parameters.
    pub fn to_evm(&self) -> Address {
        Address::from_slice(&self.0[1..])
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AddressError> {
        if bytes.len() != 21 || bytes[0] != ADDRESS_PREFIX {
            return Err(AddressError::Prefix);
        }
        let mut out = [0u8; 21];
        out.copy_from_slice(bytes);
        Ok(Self(out))
    }

    pub fn as_bytes(&self) -> &[u8; 21] {
        &self.0
    }

    pub fn from_base58(s: &str) -> Result<Self, AddressError> {
        let raw = bs58::decode(s)
            .into_vec()
            .map_err(|e| AddressError::Base58(e.to_string()))?;
        if raw.len() != 25 {
            return Err(AddressError::Prefix);
        }
        let (payload, check) = raw.split_at(21);
        if checksum(payload) != check {
            return Err(AddressError::Checksum);
        }
        Self::from_bytes(payload)
    }

    pub fn to_base58(&self) -> String {
        let mut raw = Vec::with_capacity(25);
        raw.extend_from_slice(&self.0);
        raw.extend_from_slice(&checksum(&self.0));
        bs58::encode(raw).into_string()
    }

    /// Hex form with the `41` marker and no `0x`, as the HTTP API expects.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, AddressError> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(stripped).map_err(|e| AddressError::Hex(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Accepts base58check (`T...`) or 21-byte hex (`41...`).
    pub fn parse(s: &str) -> Result<Self, AddressError> {
        let s = s.trim();
        if s.starts_with('T') && s.len() == 34 {
            return Self::from_base58(s);
        }
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        if stripped.len() == 42 && stripped.starts_with("41") {
            return Self::from_hex(stripped);
        }
        Err(AddressError::Format(s.to_string()))
    }
}

impl FromStr for TronAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TronAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl fmt::Debug for TronAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TronAddress({})", self.to_base58())
    }
}
