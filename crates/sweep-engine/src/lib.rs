//! # sweep-engine
//!
//! Glue between the registry and the chain adapters:
//!
//! - [`builder`] resolves user input into withdrawal requests
//! - [`client`] selects and connects the adapter for a network
//! - [`orchestrator`] splits batch sweeps into chunks and keeps the ledger
//! - [`batch_file`] reads sweep batch files

pub mod batch_file;
pub mod builder;
pub mod client;
pub mod orchestrator;

pub use batch_file::SweepFile;
pub use builder::{parse_address, parse_amount, AmountMode, PreparedBatch, PreparedWithdrawal, RequestBuilder};
pub use client::{startup_checks, ChainClient};
pub use orchestrator::SweepOrchestrator;
