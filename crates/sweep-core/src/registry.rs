//! Network registry loaded from YAML.
//!
//! Maps each (chain, network) pair to an RPC endpoint, a signing key
//! source, and the assets that can be withdrawn there. Secrets may be given
//! inline for local development but are normally read from environment
//! variables named in the file.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::chain::{Chain, NetworkId};
use crate::config::SweepSettings;
use crate::error::SweepError;

/// Largest decimal count whose scale factor fits in a `uint256`.
pub const MAX_DECIMALS: u8 = 77;

/// Errors from loading or querying the registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to parse registry YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid registry: {0}")]
    Invalid(String),
    #[error("environment variable {0} is not set")]
    MissingEnv(String),
}

impl From<RegistryError> for SweepError {
    fn from(e: RegistryError) -> Self {
        SweepError::Config(e.to_string())
    }
}

/// Which generation of clone contract a network runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloneAbi {
    #[default]
    Universal,
    Legacy,
}

/// A string that never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}

/// Where a configuration value comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Source {
    Inline(String),
    Env(String),
}

impl Source {
    fn pick(inline: Option<String>, env: Option<String>, what: &str) -> Result<Self, RegistryError> {
        match (inline, env) {
            (Some(v), None) => Ok(Self::Inline(v)),
            (None, Some(var)) => Ok(Self::Env(var)),
            (Some(_), Some(_)) => Err(RegistryError::Invalid(format!(
                "{what}: set either the value or its _env variant, not both"
            ))),
            (None, None) => Err(RegistryError::Invalid(format!("{what} is required"))),
        }
    }

    fn resolve(&self) -> Result<String, RegistryError> {
        match self {
            Self::Inline(v) => Ok(v.clone()),
            Self::Env(var) => match std::env::var(var) {
                Ok(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
                _ => Err(RegistryError::MissingEnv(var.clone())),
            },
        }
    }
}

/// An asset as written in the registry. Addresses stay in their chain's
/// textual form until the request builder parses them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetEntry {
    pub symbol: String,
    /// Token contract address; empty for the native asset.
    pub address: String,
    pub decimals: u8,
}

impl AssetEntry {
    pub fn is_native(&self) -> bool {
        self.address.is_empty()
    }
}

/// Everything needed to talk to one network.
pub struct ChainEndpoint {
    pub chain: Chain,
    pub network: NetworkId,
    rpc_url: Source,
    signing_key: Source,
    /// Blocks on top of the inclusion block required before a result is final.
    pub confirmations: u64,
    /// Factory address in the chain's textual form.
    pub factory: Option<String>,
    pub clone_abi: CloneAbi,
    assets: BTreeMap<String, AssetEntry>,
}

impl fmt::Debug for ChainEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainEndpoint")
            .field("chain", &self.chain)
            .field("network", &self.network)
            .field("rpc_url", &self.rpc_url)
            .field("signing_key", &"<redacted>")
            .field("confirmations", &self.confirmations)
            .field("factory", &self.factory)
            .field("clone_abi", &self.clone_abi)
            .field("assets", &self.assets.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ChainEndpoint {
    pub fn rpc_url(&self) -> Result<String, RegistryError> {
        self.rpc_url.resolve()
    }

    pub fn signing_key(&self) -> Result<Secret, RegistryError> {
        self.signing_key.resolve().map(Secret)
    }

    /// Looks up an asset by symbol, ignoring case.
    pub fn asset(&self, symbol: &str) -> Option<&AssetEntry> {
        self.assets.get(&symbol.trim().to_ascii_uppercase())
    }

    pub fn native_asset(&self) -> Option<&AssetEntry> {
        self.assets.values().find(|a| a.is_native())
    }

    pub fn assets(&self) -> impl Iterator<Item = &AssetEntry> {
        self.assets.values()
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RegistryFile {
    #[serde(default)]
    settings: SweepSettings,
    #[serde(default)]
    networks: Vec<NetworkFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NetworkFile {
    chain: Chain,
    network: NetworkId,
    rpc_url: Option<String>,
    rpc_url_env: Option<String>,
    signing_key: Option<String>,
    signing_key_env: Option<String>,
    #[serde(default = "default_confirmations")]
    confirmations: u64,
    factory: Option<String>,
    #[serde(default)]
    clone_abi: CloneAbi,
    #[serde(default)]
    assets: BTreeMap<String, AssetFile>,
}

fn default_confirmations() -> u64 {
    1
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AssetFile {
    #[serde(default)]
    address: String,
    #[serde(default)]
    native: bool,
    decimals: u8,
}

/// Read-only registry of networks and settings.
#[derive(Debug)]
pub struct Registry {
    settings: SweepSettings,
    endpoints: Vec<ChainEndpoint>,
}

impl Registry {
    /// Parse a registry from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, RegistryError> {
        let file: RegistryFile = serde_yaml::from_str(yaml)?;
        Self::build(file)
    }

    /// Load a registry from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self, RegistryError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    fn build(file: RegistryFile) -> Result<Self, RegistryError> {
        file.settings.validate().map_err(RegistryError::Invalid)?;

        let mut seen = HashSet::new();
        let mut endpoints = Vec::with_capacity(file.networks.len());
        for net in file.networks {
            let label = format!("{}/{}", net.chain, net.network);
            if !seen.insert((net.chain, net.network.clone())) {
                return Err(RegistryError::Invalid(format!("{label} is defined twice")));
            }
            if net.confirmations == 0 {
                return Err(RegistryError::Invalid(format!(
                    "{label}: confirmations must be at least 1"
                )));
            }

            let mut assets: BTreeMap<String, AssetEntry> = BTreeMap::new();
            for (symbol, asset) in net.assets {
                let symbol = symbol.trim().to_ascii_uppercase();
                if assets.contains_key(&symbol) {
                    return Err(RegistryError::Invalid(format!(
                        "{label}: asset {symbol} is defined twice"
                    )));
                }
                if asset.decimals > MAX_DECIMALS {
                    return Err(RegistryError::Invalid(format!(
                        "{label}: asset {symbol} has {} decimals, at most {MAX_DECIMALS} are supported",
                        asset.decimals
                    )));
                }
                let address = asset.address.trim().to_string();
                match (asset.native, address.is_empty()) {
                    (true, true) => {}
                    (true, false) => {
                        return Err(RegistryError::Invalid(format!(
                            "{label}: native asset {symbol} must have an empty address"
                        )))
                    }
                    (false, true) => {
                        return Err(RegistryError::Invalid(format!(
                            "{label}: asset {symbol} has no address"
                        )))
                    }
                    (false, false) => {}
                }
                assets.insert(
                    symbol.clone(),
                    AssetEntry {
                        symbol,
                        address,
                        decimals: asset.decimals,
                    },
                );
            }
            let natives = assets.values().filter(|a| a.is_native()).count();
            if natives != 1 {
                return Err(RegistryError::Invalid(format!(
                    "{label}: expected exactly one native asset, found {natives}"
                )));
            }

            endpoints.push(ChainEndpoint {
                chain: net.chain,
                network: net.network,
                rpc_url: Source::pick(net.rpc_url, net.rpc_url_env, &format!("{label}: rpc_url"))?,
                signing_key: Source::pick(
                    net.signing_key,
                    net.signing_key_env,
                    &format!("{label}: signing_key"),
                )?,
                confirmations: net.confirmations,
                factory: net.factory.filter(|f| !f.trim().is_empty()),
                clone_abi: net.clone_abi,
                assets,
            });
        }

        debug!(networks = endpoints.len(), "registry loaded");
        Ok(Self {
            settings: file.settings,
            endpoints,
        })
    }

    pub fn settings(&self) -> &SweepSettings {
        &self.settings
    }

    pub fn endpoints(&self) -> &[ChainEndpoint] {
        &self.endpoints
    }

    pub fn endpoint(&self, chain: Chain, network: &NetworkId) -> Option<&ChainEndpoint> {
        self.endpoints
            .iter()
            .find(|e| e.chain == chain && &e.network == network)
    }
}
