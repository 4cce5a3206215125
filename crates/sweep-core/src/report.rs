//! Per-clone ledger kept across the chunks of a sweep.

use alloy::primitives::{Address, U256};
use serde::Serialize;

use crate::chain::{Chain, NetworkId};
use crate::error::SweepError;
use crate::types::{ConfirmedTx, TxHash};

/// What happened to one clone in a sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemOutcome {
    Swept {
        tx_hash: TxHash,
        block: u64,
    },
    Failed {
        taxonomy: String,
        message: String,
        tx_hash: Option<TxHash>,
    },
    /// Broadcast, but whether it landed is unknown. Never re-sent automatically.
    Indeterminate { tx_hash: TxHash, message: String },
}

impl ItemOutcome {
    pub fn from_confirmed(tx: ConfirmedTx) -> Self {
        Self::Swept {
            tx_hash: tx.tx_hash,
            block: tx.block,
        }
    }

    /// Maps an error to a ledger outcome. Errors that carry a hash of an
    /// unresolved broadcast become indeterminate.
    pub fn from_error(err: &SweepError) -> Self {
        match err {
            SweepError::TransportExhausted {
                tx_hash: Some(hash),
                ..
            }
            | SweepError::NotIncluded { tx_hash: hash, .. } => Self::Indeterminate {
                tx_hash: *hash,
                message: err.to_string(),
            },
            _ => Self::Failed {
                taxonomy: err.taxonomy().to_string(),
                message: err.to_string(),
                tx_hash: err.tx_hash(),
            },
        }
    }

    pub fn is_swept(&self) -> bool {
        matches!(self, Self::Swept { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerEntry {
    pub clone: Address,
    pub amount: U256,
    /// Zero-based index of the chunk that carried this clone.
    pub chunk: usize,
    pub outcome: ItemOutcome,
}

/// Overall result of a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepOutcome {
    Complete,
    /// Some chunks landed and some did not.
    Partial,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub chain: Chain,
    pub network: NetworkId,
    pub asset: String,
    pub recipient: Address,
    /// Number of on-chain calls attempted.
    pub calls_issued: usize,
    pub entries: Vec<LedgerEntry>,
}

impl SweepReport {
    pub fn new(chain: Chain, network: NetworkId, asset: &str, recipient: Address) -> Self {
        Self {
            chain,
            network,
            asset: asset.to_string(),
            recipient,
            calls_issued: 0,
            entries: Vec::new(),
        }
    }

    pub fn record_chunk(
        &mut self,
        chunk: usize,
        clones: &[Address],
        amounts: &[U256],
        outcome: ItemOutcome,
    ) {
        for (clone, amount) in clones.iter().zip(amounts) {
            self.entries.push(LedgerEntry {
                clone: *clone,
                amount: *amount,
                chunk,
                outcome: outcome.clone(),
            });
        }
    }

    pub fn swept_count(&self) -> usize {
        self.entries.iter().filter(|e| e.outcome.is_swept()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.entries.len() - self.swept_count()
    }

    pub fn outcome(&self) -> SweepOutcome {
        match (self.swept_count(), self.entries.len()) {
            (0, _) => SweepOutcome::Failed,
            (swept, total) if swept == total => SweepOutcome::Complete,
            _ => SweepOutcome::Partial,
        }
    }

    /// Clones that may still hold a balance of the swept asset.
    pub fn unswept(&self) -> Vec<Address> {
        self.entries
            .iter()
            .filter(|e| !e.outcome.is_swept())
            .map(|e| e.clone)
            .collect()
    }

    /// Total amount confirmed as moved to the recipient.
    pub fn swept_total(&self) -> U256 {
        self.entries
            .iter()
            .filter(|e| e.outcome.is_swept())
            .fold(U256::ZERO, |acc, e| acc.saturating_add(e.amount))
    }
}
