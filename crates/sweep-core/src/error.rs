//! Error taxonomy shared by every adapter and the orchestrator.
//!
//! Failures are classified exactly once, where they leave an adapter, and
//! travel upward as typed values. Callers match on variants and never
//! re-parse messages.

use std::fmt;

use alloy::primitives::Bytes;
use thiserror::Error;

use crate::report::SweepReport;
use crate::types::TxHash;

/// Why a contract call reverted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractRevert {
    /// Custom error whose selector matched the contract ABI.
    Decoded { name: String, args: Vec<String> },
    /// `Error(string)` reason.
    Reason(String),
    /// Revert without reason data, or data no known error matches.
    Opaque { data: Bytes },
}

impl ContractRevert {
    pub fn taxonomy(&self) -> &'static str {
        match self {
            Self::Decoded { .. } => "ContractRevert.Decoded",
            Self::Reason(_) => "ContractRevert.Reason",
            Self::Opaque { .. } => "ContractRevert.Opaque",
        }
    }

    /// Name of the decoded custom error, if any.
    pub fn error_name(&self) -> Option<&str> {
        match self {
            Self::Decoded { name, .. } => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for ContractRevert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decoded { name, args } => write!(f, "{name}({})", args.join(", ")),
            Self::Reason(reason) => write!(f, "reason: {reason}"),
            Self::Opaque { data } if data.is_empty() => f.write_str("reverted without reason"),
            Self::Opaque { data } => write!(f, "undecodable revert data {data}"),
        }
    }
}

/// Errors surfaced by sweep operations.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("bad input: {0}")]
    InvalidInput(String),
    #[error("unknown chain: {0}")]
    UnknownChain(String),
    #[error("transient transport error: {0}")]
    TransientTransport(String),
    #[error("transport retries exhausted after {attempts} attempts{}: {last}", fmt_hash(.tx_hash))]
    TransportExhausted {
        attempts: u32,
        last: String,
        /// Hash of the envelope that may already be on the network.
        tx_hash: Option<TxHash>,
    },
    #[error("contract reverted{}: {revert}", fmt_hash(.tx_hash))]
    Reverted {
        /// `Some` when the revert was mined, `None` when simulation rejected it.
        tx_hash: Option<TxHash>,
        revert: ContractRevert,
    },
    #[error("transaction {tx_hash} not included: {reason}")]
    NotIncluded { tx_hash: TxHash, reason: String },
    #[error("node rejected transaction: {0}")]
    NodeRejected(String),
    #[error("ABI mismatch: {0}")]
    AbiMismatch(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("batch failed: none of {} clones were swept", .0.entries.len())]
    BatchFailed(Box<SweepReport>),
}

fn fmt_hash(hash: &Option<TxHash>) -> String {
    match hash {
        Some(h) => format!(" (tx {h})"),
        None => String::new(),
    }
}

impl SweepError {
    /// Stable class name, suitable for logs and exit messages.
    pub fn taxonomy(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "InvalidInput",
            Self::UnknownChain(_) => "UnknownChain",
            Self::TransientTransport(_) => "TransientTransport",
            Self::TransportExhausted { .. } => "TransportExhausted",
            Self::Reverted { revert, .. } => revert.taxonomy(),
            Self::NotIncluded { .. } => "NotIncluded",
            Self::NodeRejected(_) => "NodeRejected",
            Self::AbiMismatch(_) => "AbiMismatch",
            Self::Config(_) => "Config",
            Self::BatchFailed(_) => "BatchFailed",
        }
    }

    /// Whether retrying the same operation may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::TransientTransport(_))
    }

    /// Hash of a transaction that may have reached the network.
    pub fn tx_hash(&self) -> Option<TxHash> {
        match self {
            Self::TransportExhausted { tx_hash, .. } | Self::Reverted { tx_hash, .. } => *tx_hash,
            Self::NotIncluded { tx_hash, .. } => Some(*tx_hash),
            _ => None,
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

impl From<crate::chain::UnknownChainError> for SweepError {
    fn from(e: crate::chain::UnknownChainError) -> Self {
        Self::UnknownChain(e.0)
    }
}

/// Result alias for sweep operations.
pub type Result<T> = std::result::Result<T, SweepError>;
