//! Process-wide sweep settings.

use std::path::PathBuf;
use std::time::Duration;

use alloy::primitives::B256;
use serde::{Deserialize, Serialize};

use crate::retry::RetryPolicy;

/// Default fee ceiling for Tron contract calls, in sun.
pub const DEFAULT_TRON_FEE_LIMIT: u64 = 306_000_000;

/// Default number of clones per factory sweep call.
pub const DEFAULT_MAX_CHUNK: usize = 50;

/// Tunables shared by every network in a registry file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepSettings {
    /// Maximum clones per on-chain batch call.
    pub max_chunk: usize,
    pub poll_interval_ms: u64,
    /// How long to wait for the confirmation depth before giving up.
    pub confirmation_timeout_secs: u64,
    pub tron_fee_limit: u64,
    pub tron_requests_per_second: u32,
    pub retry: RetryPolicy,
    /// Deployed ABI JSON checked against the selector registry at startup.
    pub deployed_abi_path: Option<PathBuf>,
    /// Expected selector registry checksum.
    pub expected_abi_checksum: Option<B256>,
}

impl Default for SweepSettings {
    fn default() -> Self {
        Self {
            max_chunk: DEFAULT_MAX_CHUNK,
            poll_interval_ms: 1_000,
            confirmation_timeout_secs: 180,
            tron_fee_limit: DEFAULT_TRON_FEE_LIMIT,
            tron_requests_per_second: 10,
            retry: RetryPolicy::default(),
            deployed_abi_path: None,
            expected_abi_checksum: None,
        }
    }
}

impl SweepSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_secs(self.confirmation_timeout_secs)
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.max_chunk == 0 {
            return Err("settings.max_chunk must be at least 1".into());
        }
        if self.poll_interval_ms == 0 {
            return Err("settings.poll_interval_ms must be positive".into());
        }
        if self.tron_requests_per_second == 0 {
            return Err("settings.tron_requests_per_second must be positive".into());
        }
        if self.retry.max_attempts == 0 {
            return Err("settings.retry.max_attempts must be at least 1".into());
        }
        Ok(())
    }
}
