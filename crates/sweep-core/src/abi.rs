//! Canonical contract ABI and chain-neutral contract calls.
//!
//! The withdrawal contracts are external and fixed. Everything that needs a
//! selector, a signature string, or calldata derives it from the `sol!`
//! definitions below.

use alloy::primitives::{Address, B256, U256};
use alloy::sol;
use alloy::sol_types::SolCall;

use crate::error::{Result, SweepError};

sol! {
    /// Withdrawal logic bound at every clone.
    #[derive(Debug, PartialEq, Eq)]
    interface IUniversalWithdrawal {
        function universalTransfer(address token, address to, uint256 amount, uint8 transferType) external;
        function withdraw(address[] calldata recipients, uint256[] calldata amounts) external;
        function withdrawERC20(address token, address recipient, uint256 amount) external;
        function withdrawFactory(address token, address recipient, uint256 amount) external;
        function withdrawManyERC20(address[] calldata tokens, address[] calldata recipients, uint256[] calldata amounts) external;
        function setAdmin(address[] calldata admins, bool status) external;
        function isAdmined(address account) external view returns (bool);
    }

    /// Overloads exposed by clones of the first deployment.
    #[derive(Debug, PartialEq, Eq)]
    interface ILegacyWithdrawal {
        function withdraw(uint256 amount, address recipient) external;
        function withdrawERC20(address token, uint256 amount, address recipient) external;
    }

    /// Factory that deploys clones and sweeps them in bulk.
    #[derive(Debug, PartialEq, Eq)]
    interface IWithdrawalFactory {
        function predictAddress(bytes32 salt) external view returns (address predictedAddress);
        function createClone(bytes32 salt) external returns (address clone);
        function withdrawAssetsFromClones(address[] calldata clones, uint256[] calldata amounts, address recipient, address asset) external;
    }

    /// Custom errors raised by the clone and factory contracts.
    #[derive(Debug, PartialEq, Eq)]
    interface ISweepErrors {
        error ArrayLengthMismatch();
        error InvalidAddressClone();
        error InvalidAddressRecipient();
        error WithdrawFailed();
        error OnlyAdmin();
    }
}

/// Argument order of the `withdrawERC20` overload a clone exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Erc20Layout {
    /// `withdrawERC20(address token, address recipient, uint256 amount)`
    TokenRecipientAmount,
    /// `withdrawERC20(address token, uint256 amount, address recipient)`
    TokenAmountRecipient,
}

/// `universalTransfer` mode argument.
///
/// The contract defines three modes and chooses the transfer strategy
/// on-chain; the value is passed through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferMode(u8);

impl TransferMode {
    pub const MAX: u8 = 2;

    pub fn new(mode: u8) -> Result<Self> {
        if mode > Self::MAX {
            return Err(SweepError::InvalidInput(format!(
                "transfer mode {mode} out of range 0..={}",
                Self::MAX
            )));
        }
        Ok(Self(mode))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

/// A state-changing call against a clone or the factory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractCall {
    Withdraw {
        clone: Address,
        recipients: Vec<Address>,
        amounts: Vec<U256>,
    },
    WithdrawLegacyNative {
        clone: Address,
        amount: U256,
        recipient: Address,
    },
    WithdrawErc20 {
        clone: Address,
        token: Address,
        recipient: Address,
        amount: U256,
        layout: Erc20Layout,
    },
    WithdrawManyErc20 {
        clone: Address,
        tokens: Vec<Address>,
        recipients: Vec<Address>,
        amounts: Vec<U256>,
    },
    UniversalTransfer {
        clone: Address,
        token: Address,
        to: Address,
        amount: U256,
        mode: TransferMode,
    },
    WithdrawAssetsFromClones {
        factory: Address,
        clones: Vec<Address>,
        amounts: Vec<U256>,
        recipient: Address,
        /// `None` sweeps the native currency.
        asset: Option<Address>,
    },
    CreateClone {
        factory: Address,
        salt: B256,
    },
    SetAdmin {
        clone: Address,
        admins: Vec<Address>,
        status: bool,
    },
}

impl ContractCall {
    /// Contract the call is sent to.
    pub fn target(&self) -> Address {
        match self {
            Self::Withdraw { clone, .. }
            | Self::WithdrawLegacyNative { clone, .. }
            | Self::WithdrawErc20 { clone, .. }
            | Self::WithdrawManyErc20 { clone, .. }
            | Self::UniversalTransfer { clone, .. }
            | Self::SetAdmin { clone, .. } => *clone,
            Self::WithdrawAssetsFromClones { factory, .. } | Self::CreateClone { factory, .. } => {
                *factory
            }
        }
    }

    /// Canonical signature string, e.g. `withdraw(address[],uint256[])`.
    pub fn signature(&self) -> &'static str {
        match self {
            Self::Withdraw { .. } => IUniversalWithdrawal::withdrawCall::SIGNATURE,
            Self::WithdrawLegacyNative { .. } => ILegacyWithdrawal::withdrawCall::SIGNATURE,
            Self::WithdrawErc20 {
                layout: Erc20Layout::TokenRecipientAmount,
                ..
            } => IUniversalWithdrawal::withdrawERC20Call::SIGNATURE,
            Self::WithdrawErc20 {
                layout: Erc20Layout::TokenAmountRecipient,
                ..
            } => ILegacyWithdrawal::withdrawERC20Call::SIGNATURE,
            Self::WithdrawManyErc20 { .. } => IUniversalWithdrawal::withdrawManyERC20Call::SIGNATURE,
            Self::UniversalTransfer { .. } => IUniversalWithdrawal::universalTransferCall::SIGNATURE,
            Self::WithdrawAssetsFromClones { .. } => {
                IWithdrawalFactory::withdrawAssetsFromClonesCall::SIGNATURE
            }
            Self::CreateClone { .. } => IWithdrawalFactory::createCloneCall::SIGNATURE,
            Self::SetAdmin { .. } => IUniversalWithdrawal::setAdminCall::SIGNATURE,
        }
    }

    /// Rejects calls the contract would refuse for malformed input.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Withdraw {
                recipients,
                amounts,
                ..
            } => check_lengths("recipients", recipients.len(), amounts.len()),
            Self::WithdrawManyErc20 {
                tokens,
                recipients,
                amounts,
                ..
            } => {
                check_lengths("tokens", tokens.len(), amounts.len())?;
                check_lengths("recipients", recipients.len(), amounts.len())
            }
            Self::WithdrawAssetsFromClones { clones, amounts, .. } => {
                check_lengths("clones", clones.len(), amounts.len())
            }
            Self::SetAdmin { admins, .. } if admins.is_empty() => {
                Err(SweepError::invalid_input("setAdmin requires at least one address"))
            }
            _ => Ok(()),
        }
    }

    /// Selector-prefixed calldata.
    pub fn abi_encode(&self) -> Vec<u8> {
        match self.clone() {
            Self::Withdraw {
                recipients,
                amounts,
                ..
            } => IUniversalWithdrawal::withdrawCall {
                recipients,
                amounts,
            }
            .abi_encode(),
            Self::WithdrawLegacyNative {
                amount, recipient, ..
            } => ILegacyWithdrawal::withdrawCall { amount, recipient }.abi_encode(),
            Self::WithdrawErc20 {
                token,
                recipient,
                amount,
                layout: Erc20Layout::TokenRecipientAmount,
                ..
            } => IUniversalWithdrawal::withdrawERC20Call {
                token,
                recipient,
                amount,
            }
            .abi_encode(),
            Self::WithdrawErc20 {
                token,
                recipient,
                amount,
                layout: Erc20Layout::TokenAmountRecipient,
                ..
            } => ILegacyWithdrawal::withdrawERC20Call {
                token,
                amount,
                recipient,
            }
            .abi_encode(),
            Self::WithdrawManyErc20 {
                tokens,
                recipients,
                amounts,
                ..
            } => IUniversalWithdrawal::withdrawManyERC20Call {
                tokens,
                recipients,
                amounts,
            }
            .abi_encode(),
            Self::UniversalTransfer {
                token,
                to,
                amount,
                mode,
                ..
            } => IUniversalWithdrawal::universalTransferCall {
                token,
                to,
                amount,
                transferType: mode.get(),
            }
            .abi_encode(),
            Self::WithdrawAssetsFromClones {
                clones,
                amounts,
                recipient,
                asset,
                ..
            } => IWithdrawalFactory::withdrawAssetsFromClonesCall {
                clones,
                amounts,
                recipient,
                asset: asset.unwrap_or(Address::ZERO),
            }
            .abi_encode(),
            Self::CreateClone { salt, .. } => IWithdrawalFactory::createCloneCall { salt }.abi_encode(),
            Self::SetAdmin { admins, status, .. } => {
                IUniversalWithdrawal::setAdminCall { admins, status }.abi_encode()
            }
        }
    }

    /// Short label for logs.
    pub fn method(&self) -> &'static str {
        let sig = self.signature();
        sig.split('(').next().unwrap_or(sig)
    }
}

fn check_lengths(what: &str, left: usize, amounts: usize) -> Result<()> {
    if left != amounts {
        return Err(SweepError::InvalidInput(format!(
            "array length mismatch: {left} {what} but {amounts} amounts"
        )));
    }
    Ok(())
}

/// A read-only call answered without a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewCall {
    PredictAddress { factory: Address, salt: B256 },
    IsAdmined { clone: Address, account: Address },
}

impl ViewCall {
    pub fn target(&self) -> Address {
        match self {
            Self::PredictAddress { factory, .. } => *factory,
            Self::IsAdmined { clone, .. } => *clone,
        }
    }

    pub fn signature(&self) -> &'static str {
        match self {
            Self::PredictAddress { .. } => IWithdrawalFactory::predictAddressCall::SIGNATURE,
            Self::IsAdmined { .. } => IUniversalWithdrawal::isAdminedCall::SIGNATURE,
        }
    }

    pub fn abi_encode(&self) -> Vec<u8> {
        match self {
            Self::PredictAddress { salt, .. } => {
                IWithdrawalFactory::predictAddressCall { salt: *salt }.abi_encode()
            }
            Self::IsAdmined { account, .. } => {
                IUniversalWithdrawal::isAdminedCall { account: *account }.abi_encode()
            }
        }
    }

    /// Decodes the raw return data of this view.
    pub fn decode_output(&self, data: &[u8]) -> Result<ViewResult> {
        let decoded = match self {
            Self::PredictAddress { .. } => {
                IWithdrawalFactory::predictAddressCall::abi_decode_returns(data)
                    .map(ViewResult::Address)
            }
            Self::IsAdmined { .. } => {
                IUniversalWithdrawal::isAdminedCall::abi_decode_returns(data).map(ViewResult::Bool)
            }
        };
        decoded.map_err(|e| {
            SweepError::AbiMismatch(format!("cannot decode {} output: {e}", self.signature()))
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewResult {
    Address(Address),
    Bool(bool),
}

/// Converts a free-form clone label into the 32-byte salt the factory uses.
/// Labels longer than 32 bytes are rejected; shorter ones are right-padded
/// with zeros.
pub fn salt_from_label(label: &str) -> Result<B256> {
    if let Some(hex_str) = label.strip_prefix("0x") {
        if hex_str.len() == 64 {
            return hex_str
                .parse::<B256>()
                .map_err(|e| SweepError::InvalidInput(format!("invalid salt {label}: {e}")));
        }
    }
    let bytes = label.as_bytes();
    if bytes.is_empty() || bytes.len() > 32 {
        return Err(SweepError::InvalidInput(format!(
            "salt label must be 1..=32 bytes, got {}",
            bytes.len()
        )));
    }
    let mut salt = [0u8; 32];
    salt[..bytes.len()].copy_from_slice(bytes);
    Ok(B256::from(salt))
}
