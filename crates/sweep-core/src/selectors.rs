//! Selector registry derived from the canonical ABI.
//!
//! Both adapters look signatures up here: the EVM adapter indirectly through
//! calldata, the Tron adapter directly as the `function_selector` string.

use std::collections::HashSet;
use std::path::Path;

use alloy::json_abi::JsonAbi;
use alloy::primitives::{keccak256, Selector, B256};
use alloy::sol_types::SolCall;
use tracing::debug;

use crate::abi::{ILegacyWithdrawal, IUniversalWithdrawal, IWithdrawalFactory};
use crate::error::{Result, SweepError};
use crate::registry::CloneAbi;

/// Contract a selector is dispatched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorScope {
    Clone,
    LegacyClone,
    Factory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorEntry {
    pub signature: &'static str,
    pub selector: Selector,
    pub scope: SelectorScope,
}

macro_rules! entry {
    ($call:ty, $scope:expr) => {
        SelectorEntry {
            signature: <$call as SolCall>::SIGNATURE,
            selector: Selector::new(<$call as SolCall>::SELECTOR),
            scope: $scope,
        }
    };
}

/// Every write and view method the sweeper may call.
#[derive(Debug, Clone)]
pub struct SelectorRegistry {
    entries: Vec<SelectorEntry>,
}

impl Default for SelectorRegistry {
    fn default() -> Self {
        Self::canonical()
    }
}

impl SelectorRegistry {
    pub fn canonical() -> Self {
        use SelectorScope::*;
        Self {
            entries: vec![
                entry!(IUniversalWithdrawal::universalTransferCall, Clone),
                entry!(IUniversalWithdrawal::withdrawCall, Clone),
                entry!(IUniversalWithdrawal::withdrawERC20Call, Clone),
                entry!(IUniversalWithdrawal::withdrawFactoryCall, Clone),
                entry!(IUniversalWithdrawal::withdrawManyERC20Call, Clone),
                entry!(IUniversalWithdrawal::setAdminCall, Clone),
                entry!(IUniversalWithdrawal::isAdminedCall, Clone),
                entry!(ILegacyWithdrawal::withdrawCall, LegacyClone),
                entry!(ILegacyWithdrawal::withdrawERC20Call, LegacyClone),
                entry!(IWithdrawalFactory::predictAddressCall, Factory),
                entry!(IWithdrawalFactory::createCloneCall, Factory),
                entry!(IWithdrawalFactory::withdrawAssetsFromClonesCall, Factory),
            ],
        }
    }

    pub fn entries(&self) -> &[SelectorEntry] {
        &self.entries
    }

    pub fn get(&self, signature: &str) -> Option<&SelectorEntry> {
        self.entries.iter().find(|e| e.signature == signature)
    }

    /// Checks each selector against its signature and rejects collisions.
    pub fn verify(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for entry in &self.entries {
            let hash = keccak256(entry.signature.as_bytes());
            if hash[..4] != entry.selector[..] {
                return Err(SweepError::AbiMismatch(format!(
                    "selector {} does not match {}",
                    entry.selector, entry.signature
                )));
            }
            if !seen.insert(entry.selector) {
                return Err(SweepError::AbiMismatch(format!(
                    "duplicate selector {} ({})",
                    entry.selector, entry.signature
                )));
            }
        }
        Ok(())
    }

    /// keccak256 over the sorted, newline-joined signatures.
    pub fn checksum(&self) -> B256 {
        let mut sigs: Vec<&str> = self.entries.iter().map(|e| e.signature).collect();
        sigs.sort_unstable();
        keccak256(sigs.join("\n").as_bytes())
    }

    /// Ensures a deployed ABI exposes every method this deployment
    /// generation relies on.
    pub fn validate_against(&self, abi: &JsonAbi, clone_abi: CloneAbi) -> Result<()> {
        let deployed: HashSet<String> = abi.functions().map(|f| f.signature()).collect();
        let clone_scope = match clone_abi {
            CloneAbi::Universal => SelectorScope::Clone,
            CloneAbi::Legacy => SelectorScope::LegacyClone,
        };
        let missing: Vec<&str> = self
            .entries
            .iter()
            .filter(|e| e.scope == clone_scope || e.scope == SelectorScope::Factory)
            .filter(|e| !deployed.contains(e.signature))
            .map(|e| e.signature)
            .collect();
        if !missing.is_empty() {
            return Err(SweepError::AbiMismatch(format!(
                "deployed ABI lacks {}",
                missing.join(", ")
            )));
        }
        debug!(checked = deployed.len(), "deployed ABI matches selector registry");
        Ok(())
    }
}

/// Loads a deployed ABI from a JSON file. Accepts either a bare ABI array or
/// a build artifact with an `abi` field.
pub fn load_abi(path: &Path) -> Result<JsonAbi> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| SweepError::Config(format!("cannot read ABI {}: {e}", path.display())))?;
    let value: serde_json::Value = serde_json::from_str(&contents)
        .map_err(|e| SweepError::Config(format!("invalid ABI JSON {}: {e}", path.display())))?;
    let abi_value = match value {
        serde_json::Value::Object(mut obj) if obj.contains_key("abi") => {
            obj.remove("abi").unwrap_or_default()
        }
        other => other,
    };
    serde_json::from_value(abi_value)
        .map_err(|e| SweepError::Config(format!("invalid ABI {}: {e}", path.display())))
}
