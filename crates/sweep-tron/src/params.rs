//! Contract parameter encoding for `triggersmartcontract`.
//!
//! The node takes the function selector as a literal signature string and
//! the arguments as a separate hex blob: standard ABI encoding, no selector,
//! no `0x` prefix. Addresses go in as 20-byte words with the Tron marker
//! stripped.

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, B256, U256};
use sweep_core::abi::{ContractCall, ViewCall};

use crate::address::TronAddress;

/// One typed contract argument. Addresses are only accepted as
/// [`TronAddress`], so every address goes through [`param_address`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TronParam {
    Address(TronAddress),
    AddressArray(Vec<TronAddress>),
    Uint256(U256),
    Uint256Array(Vec<U256>),
    Uint8(u8),
    Bool(bool),
    Bytes32(B256),
}

/// Parameter form of a Tron address.
pub fn param_address(address: &TronAddress) -> Address {
    address.to_evm()
}

impl TronParam {
    fn to_dyn(&self) -> DynSolValue {
        match self {
            Self::Address(a) => DynSolValue::Address(param_address(a)),
            Self::AddressArray(list) => DynSolValue::Array(
                list.iter()
                    .map(|a| DynSolValue::Address(param_address(a)))
                    .collect(),
            ),
            Self::Uint256(v) => DynSolValue::Uint(*v, 256),
            Self::Uint256Array(list) => {
                DynSolValue::Array(list.iter().map(|v| DynSolValue::Uint(*v, 256)).collect())
            }
            Self::Uint8(v) => DynSolValue::Uint(U256::from(*v), 8),
            Self::Bool(b) => DynSolValue::Bool(*b),
            Self::Bytes32(b) => DynSolValue::FixedBytes(*b, 32),
        }
    }
}

/// Encodes `params` in order. Returns an empty string for no parameters.
pub fn encode_params(params: &[TronParam]) -> String {
    if params.is_empty() {
        return String::new();
    }
    let tuple = DynSolValue::Tuple(params.iter().map(TronParam::to_dyn).collect());
    hex::encode(tuple.abi_encode_params())
}

fn addr(a: &Address) -> TronParam {
    TronParam::Address(TronAddress::from_evm(*a))
}

fn addrs(list: &[Address]) -> TronParam {
    TronParam::AddressArray(list.iter().copied().map(TronAddress::from_evm).collect())
}

/// Arguments of `call` in the order of its signature.
pub fn call_params(call: &ContractCall) -> Vec<TronParam> {
    use sweep_core::abi::Erc20Layout;

    match call {
        ContractCall::Withdraw {
            recipients,
            amounts,
            ..
        } => vec![addrs(recipients), TronParam::Uint256Array(amounts.clone())],
        ContractCall::WithdrawLegacyNative {
            amount, recipient, ..
        } => vec![TronParam::Uint256(*amount), addr(recipient)],
        ContractCall::WithdrawErc20 {
            token,
            recipient,
            amount,
            layout: Erc20Layout::TokenRecipientAmount,
            ..
        } => vec![addr(token), addr(recipient), TronParam::Uint256(*amount)],
        ContractCall::WithdrawErc20 {
            token,
            recipient,
            amount,
            layout: Erc20Layout::TokenAmountRecipient,
            ..
        } => vec![addr(token), TronParam::Uint256(*amount), addr(recipient)],
        ContractCall::WithdrawManyErc20 {
            tokens,
            recipients,
            amounts,
            ..
        } => vec![
            addrs(tokens),
            addrs(recipients),
            TronParam::Uint256Array(amounts.clone()),
        ],
        ContractCall::UniversalTransfer {
            token,
            to,
            amount,
            mode,
            ..
        } => vec![
            addr(token),
            addr(to),
            TronParam::Uint256(*amount),
            TronParam::Uint8(mode.get()),
        ],
        ContractCall::WithdrawAssetsFromClones {
            clones,
            amounts,
            recipient,
            asset,
            ..
        } => vec![
            addrs(clones),
            TronParam::Uint256Array(amounts.clone()),
            addr(recipient),
            addr(&asset.unwrap_or(Address::ZERO)),
        ],
        ContractCall::CreateClone { salt, .. } => vec![TronParam::Bytes32(*salt)],
        ContractCall::SetAdmin { admins, status, .. } => {
            vec![addrs(admins), TronParam::Bool(*status)]
        }
    }
}

pub fn view_params(view: &ViewCall) -> Vec<TronParam> {
    match view {
        ViewCall::PredictAddress { salt, .. } => vec![TronParam::Bytes32(*salt)],
        ViewCall::IsAdmined { account, .. } => vec![addr(account)],
    }
}
