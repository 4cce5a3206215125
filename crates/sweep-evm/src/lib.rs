//! # sweep-evm
//!
//! EVM chain adapter for Ethereum and BSC.
//!
//! ## Modules
//!
//! - [`adapter`] — JSON-RPC adapter implementing `ChainAdapter`
//! - [`error`] — JSON-RPC error classification
//! - [`receipt`] — transaction status and confirmation depth
//! - [`tx`] — legacy transaction building and signing

pub mod adapter;
pub mod error;
pub mod receipt;
pub mod tx;

pub use adapter::{parse_tx_hash, EvmAdapter};
pub use error::classify_rpc_error;
pub use tx::SignedLegacy;
