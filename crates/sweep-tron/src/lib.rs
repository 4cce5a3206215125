//! # sweep-tron
//!
//! Tron support for clonesweep: base58check addresses, parameter encoding
//! for `triggersmartcontract`, local txID signing, and a [`TronAdapter`]
//! implementing the shared chain adapter interface over the node's HTTP API.

pub mod adapter;
pub mod address;
pub mod client;
pub mod params;
pub mod tx;

pub use adapter::{classify_broadcast_code, classify_revert_data, TronAdapter};
pub use address::{AddressError, TronAddress};
pub use params::{encode_params, TronParam};
