//! Batch files consumed by `clonesweep sweep`.

use std::path::Path;

use serde::Deserialize;
use sweep_core::{Result, SweepError};

use crate::builder::{AmountMode, PreparedBatch, RequestBuilder};

/// One asset symbol, or several swept as separate passes in order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AssetList {
    One(String),
    Many(Vec<String>),
}

impl AssetList {
    pub fn symbols(&self) -> Vec<&str> {
        match self {
            Self::One(s) => vec![s.as_str()],
            Self::Many(list) => list.iter().map(String::as_str).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SweepItem {
    pub clone: String,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SweepFile {
    pub chain: String,
    pub network: String,
    pub asset: AssetList,
    pub recipient: String,
    /// Amounts are whole-unit decimals instead of atomic integers.
    #[serde(default)]
    pub decimal: bool,
    pub items: Vec<SweepItem>,
}

impl SweepFile {
    /// Parses YAML (or JSON).
    pub fn from_yaml(contents: &str) -> Result<Self> {
        serde_yaml::from_str(contents)
            .map_err(|e| SweepError::InvalidInput(format!("invalid sweep file: {e}")))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SweepError::InvalidInput(format!("cannot read {}: {e}", path.display())))?;
        Self::from_yaml(&contents)
    }

    /// Resolves one batch per asset symbol, in file order.
    pub fn prepare(&self, builder: &RequestBuilder<'_>) -> Result<Vec<PreparedBatch>> {
        let mode = if self.decimal {
            AmountMode::Decimal
        } else {
            AmountMode::Atomic
        };
        let clones: Vec<&str> = self.items.iter().map(|i| i.clone.as_str()).collect();
        let amounts: Vec<&str> = self.items.iter().map(|i| i.amount.as_str()).collect();
        self.asset
            .symbols()
            .into_iter()
            .map(|symbol| {
                builder.batch(
                    &self.chain,
                    &self.network,
                    symbol,
                    &clones,
                    &amounts,
                    &self.recipient,
                    mode,
                )
            })
            .collect()
    }
}
