//! CLI subcommand implementations.

use std::path::{Path, PathBuf};

use alloy::primitives::{Address, B256};
use sweep_core::{Chain, ChainFamily, Registry, SweepError};
use sweep_tron::TronAddress;

pub mod check_abi;
pub mod clone;
pub mod status;
pub mod sweep;
pub mod withdraw;

pub(crate) type CmdResult = Result<(), Box<dyn std::error::Error>>;

pub(crate) fn resolve_config_path(
    config: Option<PathBuf>,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(path) = config {
        return Ok(path);
    }

    let home = dirs::home_dir().ok_or("could not determine home directory")?;
    Ok(home.join(".clonesweep").join("sweep.yaml"))
}

pub(crate) fn load_registry(config: Option<PathBuf>) -> Result<Registry, Box<dyn std::error::Error>> {
    let path = resolve_config_path(config)?;
    Ok(load_registry_from(&path)?)
}

fn load_registry_from(path: &Path) -> Result<Registry, SweepError> {
    Registry::from_file(path).map_err(|e| match SweepError::from(e) {
        SweepError::Config(msg) => SweepError::Config(format!("{}: {msg}", path.display())),
        other => other,
    })
}

/// Fails early with `UnknownChain` before any file or network access.
pub(crate) fn parse_chain(chain: &str) -> Result<Chain, SweepError> {
    Ok(chain.parse()?)
}

/// Accepts a hash with or without `0x`.
pub(crate) fn parse_hash(hash: &str) -> Result<B256, SweepError> {
    let trimmed = hash.trim();
    let stripped = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    format!("0x{stripped}")
        .parse()
        .map_err(|e| SweepError::InvalidInput(format!("invalid transaction hash {hash}: {e}")))
}

/// Formats an address the way users of the chain write it.
pub(crate) fn display_address(family: ChainFamily, address: Address) -> String {
    match family {
        ChainFamily::Evm => address.to_checksum(None),
        ChainFamily::Tron => TronAddress::from_evm(address).to_base58(),
    }
}
