//! # sweep-core
//!
//! Chain-neutral building blocks for sweeping funds out of clone wallets.
//!
//! ## Modules
//!
//! - [`abi`] — canonical contract ABI (`sol!`) and chain-neutral calls
//! - [`adapter`] — the [`ChainAdapter`] capability set and the shared execution pipeline
//! - [`chain`] — supported chains and network identifiers
//! - [`classify`] — revert data decoding and transport message classification
//! - [`config`] — sweep settings
//! - [`error`] — the error taxonomy
//! - [`ops`] — withdrawal operations shared by every adapter
//! - [`registry`] — YAML network registry
//! - [`report`] — per-clone sweep ledger
//! - [`retry`] — bounded exponential backoff
//! - [`selectors`] — selector registry and deployed-ABI checks
//! - [`types`] — withdrawal intents, batch requests, transaction status

pub mod abi;
pub mod adapter;
pub mod chain;
pub mod classify;
pub mod config;
pub mod error;
pub mod ops;
pub mod registry;
pub mod report;
pub mod retry;
pub mod selectors;
pub mod types;

pub use adapter::{execute, ChainAdapter, Polling};
pub use chain::{Chain, ChainFamily, NetworkId};
pub use error::{ContractRevert, Result, SweepError};
pub use ops::ContractOps;
pub use registry::{ChainEndpoint, CloneAbi, Registry};
pub use report::{ItemOutcome, SweepOutcome, SweepReport};
pub use types::{AssetDescriptor, BatchWithdrawalRequest, ConfirmedTx, TxHash, TxStatus, WithdrawalIntent};
