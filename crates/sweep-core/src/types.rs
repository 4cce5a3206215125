//! Core value types for withdrawal requests and transaction tracking.
//!
//! Addresses are held in their 20-byte EVM form for every chain. Tron
//! addresses are converted at the adapter boundary.

use alloy::primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

use crate::abi::{ContractCall, Erc20Layout};
use crate::chain::{Chain, NetworkId};
use crate::error::{ContractRevert, Result, SweepError};
use crate::registry::CloneAbi;

/// A 32-byte transaction hash. For Tron this is the `txID`.
pub type TxHash = B256;

/// An asset registered for a (chain, network) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetDescriptor {
    pub chain: Chain,
    pub network: NetworkId,
    pub symbol: String,
    /// Token contract; `None` for the chain's native currency.
    pub contract: Option<Address>,
    pub decimals: u8,
}

impl AssetDescriptor {
    pub fn is_native(&self) -> bool {
        self.contract.is_none()
    }

    /// Asset argument for factory-level sweeps, where the zero address
    /// selects the native currency.
    pub fn sweep_address(&self) -> Address {
        self.contract.unwrap_or(Address::ZERO)
    }
}

/// A single validated withdrawal from one clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawalIntent {
    pub asset: AssetDescriptor,
    pub clone: Address,
    /// Amount in atomic units.
    pub amount: U256,
    pub recipient: Address,
}

impl WithdrawalIntent {
    /// Contract call that performs this withdrawal against a clone of the
    /// given deployment generation.
    pub fn to_call(&self, clone_abi: CloneAbi) -> ContractCall {
        match (self.asset.contract, clone_abi) {
            (None, CloneAbi::Universal) => ContractCall::Withdraw {
                clone: self.clone,
                recipients: vec![self.recipient],
                amounts: vec![self.amount],
            },
            (None, CloneAbi::Legacy) => ContractCall::WithdrawLegacyNative {
                clone: self.clone,
                amount: self.amount,
                recipient: self.recipient,
            },
            (Some(token), abi) => ContractCall::WithdrawErc20 {
                clone: self.clone,
                token,
                recipient: self.recipient,
                amount: self.amount,
                layout: match abi {
                    CloneAbi::Universal => Erc20Layout::TokenRecipientAmount,
                    CloneAbi::Legacy => Erc20Layout::TokenAmountRecipient,
                },
            },
        }
    }
}

/// Sweep of one asset from many clones to a single recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchWithdrawalRequest {
    pub asset: AssetDescriptor,
    pub clones: Vec<Address>,
    pub amounts: Vec<U256>,
    pub recipient: Address,
}

impl BatchWithdrawalRequest {
    /// Creates a request, rejecting mismatched list lengths.
    pub fn new(
        asset: AssetDescriptor,
        clones: Vec<Address>,
        amounts: Vec<U256>,
        recipient: Address,
    ) -> Result<Self> {
        let req = Self {
            asset,
            clones,
            amounts,
            recipient,
        };
        req.validate()?;
        Ok(req)
    }

    pub fn validate(&self) -> Result<()> {
        if self.clones.len() != self.amounts.len() {
            return Err(SweepError::InvalidInput(format!(
                "{} clones but {} amounts",
                self.clones.len(),
                self.amounts.len()
            )));
        }
        if self.clones.is_empty() {
            return Err(SweepError::invalid_input("no clones to sweep"));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.clones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clones.is_empty()
    }

    /// Splits the request into consecutive sub-requests of at most
    /// `max_chunk` items, preserving order.
    pub fn chunks(&self, max_chunk: usize) -> Vec<BatchWithdrawalRequest> {
        let size = max_chunk.max(1);
        self.clones
            .chunks(size)
            .zip(self.amounts.chunks(size))
            .map(|(clones, amounts)| BatchWithdrawalRequest {
                asset: self.asset.clone(),
                clones: clones.to_vec(),
                amounts: amounts.to_vec(),
                recipient: self.recipient,
            })
            .collect()
    }

    /// Factory-level call sweeping every clone in this request.
    pub fn to_call(&self, factory: Address) -> ContractCall {
        ContractCall::WithdrawAssetsFromClones {
            factory,
            clones: self.clones.clone(),
            amounts: self.amounts.clone(),
            recipient: self.recipient,
            asset: self.asset.contract,
        }
    }
}

/// Observed state of a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxStatus {
    /// The node has never seen the hash, or has dropped it.
    NotFound,
    /// Known to the node but not yet in a block.
    Pending,
    /// Mined successfully but below the required confirmation depth.
    Included { block: u64, confirmations: u64 },
    /// Mined successfully at or beyond the required depth.
    Confirmed { block: u64 },
    /// Mined and reverted.
    Reverted { block: u64, revert: ContractRevert },
}

impl TxStatus {
    /// Whether polling again can change the outcome.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed { .. } | Self::Reverted { .. })
    }

    /// Whether the network has accepted the transaction in some form.
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::NotFound)
    }
}

/// A transaction observed at its required confirmation depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmedTx {
    pub tx_hash: TxHash,
    pub block: u64,
}
