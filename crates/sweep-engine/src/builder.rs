//! Turns user-supplied strings into validated withdrawal requests.
//!
//! Everything here is pure: the registry is consulted, the network is not.

use std::str::FromStr;

use alloy::primitives::{Address, U256};
use rust_decimal::Decimal;
use sweep_core::{
    AssetDescriptor, BatchWithdrawalRequest, Chain, ChainEndpoint, ChainFamily, CloneAbi,
    NetworkId, Registry, Result, SweepError, WithdrawalIntent,
};
use sweep_tron::TronAddress;

/// How an amount string is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AmountMode {
    /// A non-negative integer in the asset's smallest unit.
    #[default]
    Atomic,
    /// A decimal in whole units, scaled by the asset's decimals.
    Decimal,
}

/// A single withdrawal ready to be turned into a contract call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedWithdrawal {
    pub intent: WithdrawalIntent,
    pub family: ChainFamily,
    pub clone_abi: CloneAbi,
}

/// A batch sweep ready for the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedBatch {
    pub request: BatchWithdrawalRequest,
    pub family: ChainFamily,
    pub factory: Address,
}

/// Resolves requests against a [`Registry`].
#[derive(Debug, Clone, Copy)]
pub struct RequestBuilder<'r> {
    registry: &'r Registry,
}

impl<'r> RequestBuilder<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    /// Looks up the endpoint for a chain/network pair given as strings.
    pub fn endpoint(&self, chain: &str, network: &str) -> Result<&'r ChainEndpoint> {
        let chain: Chain = chain.parse()?;
        let network = require("network", network)?;
        let network = NetworkId::new(network);
        self.registry.endpoint(chain, &network).ok_or_else(|| {
            SweepError::InvalidInput(format!("network {chain}/{network} is not registered"))
        })
    }

    /// Resolves `symbol` on `endpoint` into an asset descriptor.
    pub fn asset(&self, endpoint: &ChainEndpoint, symbol: &str) -> Result<AssetDescriptor> {
        let symbol = require("token symbol", symbol)?;
        let entry = endpoint.asset(symbol).ok_or_else(|| {
            SweepError::InvalidInput(format!(
                "token {symbol} is not registered on {}/{}",
                endpoint.chain, endpoint.network
            ))
        })?;
        let contract = if entry.is_native() {
            None
        } else {
            Some(parse_address(endpoint.chain.family(), &entry.address)?)
        };
        Ok(AssetDescriptor {
            chain: endpoint.chain,
            network: endpoint.network.clone(),
            symbol: entry.symbol.clone(),
            contract,
            decimals: entry.decimals,
        })
    }

    /// Builds a single-clone withdrawal.
    #[allow(clippy::too_many_arguments)]
    pub fn withdrawal(
        &self,
        chain: &str,
        network: &str,
        symbol: &str,
        clone: &str,
        amount: &str,
        recipient: &str,
        mode: AmountMode,
    ) -> Result<PreparedWithdrawal> {
        let endpoint = self.endpoint(chain, network)?;
        let family = endpoint.chain.family();
        let asset = self.asset(endpoint, symbol)?;
        let clone = parse_address(family, require("clone address", clone)?)?;
        let recipient = parse_address(family, require("recipient address", recipient)?)?;
        let amount = parse_amount(require("amount", amount)?, mode, asset.decimals)?;
        Ok(PreparedWithdrawal {
            intent: WithdrawalIntent {
                asset,
                clone,
                amount,
                recipient,
            },
            family,
            clone_abi: endpoint.clone_abi,
        })
    }

    /// Builds a factory-level sweep. `clones` and `amounts` must line up.
    #[allow(clippy::too_many_arguments)]
    pub fn batch<S: AsRef<str>>(
        &self,
        chain: &str,
        network: &str,
        symbol: &str,
        clones: &[S],
        amounts: &[S],
        recipient: &str,
        mode: AmountMode,
    ) -> Result<PreparedBatch> {
        let endpoint = self.endpoint(chain, network)?;
        if clones.len() != amounts.len() {
            return Err(SweepError::InvalidInput(format!(
                "{} clones but {} amounts",
                clones.len(),
                amounts.len()
            )));
        }
        let family = endpoint.chain.family();
        let factory = self.factory(endpoint)?;
        let asset = self.asset(endpoint, symbol)?;
        let recipient = parse_address(family, require("recipient address", recipient)?)?;

        let clones = clones
            .iter()
            .map(|c| parse_address(family, require("clone address", c.as_ref())?))
            .collect::<Result<Vec<_>>>()?;
        let amounts = amounts
            .iter()
            .map(|a| parse_amount(require("amount", a.as_ref())?, mode, asset.decimals))
            .collect::<Result<Vec<_>>>()?;

        Ok(PreparedBatch {
            request: BatchWithdrawalRequest::new(asset, clones, amounts, recipient)?,
            family,
            factory,
        })
    }

    /// The endpoint's factory, required for batch sweeps and clone creation.
    pub fn factory(&self, endpoint: &ChainEndpoint) -> Result<Address> {
        let raw = endpoint.factory.as_deref().ok_or_else(|| {
            SweepError::InvalidInput(format!(
                "{}/{} has no factory configured",
                endpoint.chain, endpoint.network
            ))
        })?;
        parse_address(endpoint.chain.family(), raw)
    }
}

fn require<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SweepError::InvalidInput(format!("{field} is required")));
    }
    Ok(trimmed)
}

/// Parses an address in the family's textual form into its 20-byte form.
pub fn parse_address(family: ChainFamily, s: &str) -> Result<Address> {
    let s = s.trim();
    match family {
        ChainFamily::Evm => {
            let hex = s
                .strip_prefix("0x")
                .or_else(|| s.strip_prefix("0X"))
                .ok_or_else(|| SweepError::InvalidInput(format!("invalid EVM address {s}")))?;
            if hex.len() != 40 {
                return Err(SweepError::InvalidInput(format!("invalid EVM address {s}")));
            }
            Address::from_str(s)
                .map_err(|e| SweepError::InvalidInput(format!("invalid EVM address {s}: {e}")))
        }
        ChainFamily::Tron => TronAddress::parse(s)
            .map(|a| a.to_evm())
            .map_err(|e| SweepError::InvalidInput(format!("invalid Tron address {s}: {e}"))),
    }
}

/// Converts an amount string into atomic units.
pub fn parse_amount(s: &str, mode: AmountMode, decimals: u8) -> Result<U256> {
    let s = s.trim();
    match mode {
        AmountMode::Atomic => {
            if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
                return Err(SweepError::InvalidInput(format!(
                    "amount must be a non-negative integer, got {s:?}"
                )));
            }
            U256::from_str_radix(s, 10)
                .map_err(|e| SweepError::InvalidInput(format!("amount {s} out of range: {e}")))
        }
        AmountMode::Decimal => {
            let value = Decimal::from_str(s)
                .map_err(|e| SweepError::InvalidInput(format!("invalid decimal amount {s}: {e}")))?;
            if value.is_sign_negative() {
                return Err(SweepError::InvalidInput(format!("amount {s} is negative")));
            }
            let value = value.normalize();
            let scale = value.scale();
            if scale > u32::from(decimals) {
                return Err(SweepError::InvalidInput(format!(
                    "amount {s} has {scale} fractional digits, asset supports {decimals}"
                )));
            }
            let mantissa = u128::try_from(value.mantissa())
                .map_err(|_| SweepError::InvalidInput(format!("amount {s} is negative")))?;
            let factor = U256::from(10u64)
                .checked_pow(U256::from(u32::from(decimals) - scale))
                .ok_or_else(|| SweepError::InvalidInput(format!("amount {s} out of range")))?;
            mantissa_times(mantissa, factor, s)
        }
    }
}

fn mantissa_times(mantissa: u128, factor: U256, s: &str) -> Result<U256> {
    U256::from(mantissa)
        .checked_mul(factor)
        .ok_or_else(|| SweepError::InvalidInput(format!("amount {s} out of range")))
}
