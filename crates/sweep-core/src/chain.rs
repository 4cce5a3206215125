//! Supported chain identifiers.
//!
//! Ethereum and BSC share the EVM family; Tron has its own address and
//! transport conventions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Chains the sweeper knows how to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Chain {
    /// Ethereum (mainnet and testnets)
    Eth,
    /// BNB Smart Chain
    Bsc,
    /// Tron
    Trx,
}

/// Execution environment a chain belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainFamily {
    Evm,
    Tron,
}

impl Chain {
    /// All supported chains.
    pub const ALL: [Chain; 3] = [Self::Eth, Self::Bsc, Self::Trx];

    /// Canonical upper-case identifier, as used in config files and on the CLI.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eth => "ETH",
            Self::Bsc => "BSC",
            Self::Trx => "TRX",
        }
    }

    pub const fn family(self) -> ChainFamily {
        match self {
            Self::Eth | Self::Bsc => ChainFamily::Evm,
            Self::Trx => ChainFamily::Tron,
        }
    }
}

impl FromStr for Chain {
    type Err = UnknownChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ETH" => Ok(Self::Eth),
            "BSC" => Ok(Self::Bsc),
            "TRX" | "TRON" => Ok(Self::Trx),
            _ => Err(UnknownChainError(s.to_string())),
        }
    }
}

impl TryFrom<String> for Chain {
    type Error = UnknownChainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Chain> for String {
    fn from(chain: Chain) -> String {
        chain.as_str().to_string()
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ChainFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Evm => f.write_str("evm"),
            Self::Tron => f.write_str("tron"),
        }
    }
}

/// Error when a chain identifier is not in the supported set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownChainError(pub String);

impl fmt::Display for UnknownChainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown chain '{}'; supported chains: {}",
            self.0,
            Chain::ALL
                .iter()
                .map(|c| c.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl std::error::Error for UnknownChainError {}

/// Upper-cased network name within a chain (e.g. `MAINNET`, `NILE`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct NetworkId(String);

impl NetworkId {
    pub fn new(name: &str) -> Self {
        Self(name.trim().to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for NetworkId {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

impl From<&str> for NetworkId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<NetworkId> for String {
    fn from(id: NetworkId) -> String {
        id.0
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
