//! # sweep-signer
//!
//! Local secp256k1 signing. Keys are loaded from hex, held in memory only,
//! and never formatted.

pub mod key;
pub mod signer;

pub use key::public_key_to_address;
pub use signer::{LocalSigner, Signature, Signer, SignerError};
