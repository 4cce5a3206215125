//! Revert data decoding and transport message classification.

use alloy::dyn_abi::{DynSolType, DynSolValue};
use alloy::json_abi::JsonAbi;
use alloy::primitives::{Bytes, Selector};
use alloy::sol_types::{Panic, Revert, SolError};

use crate::abi::ISweepErrors;
use crate::error::{ContractRevert, SweepError};

#[derive(Debug, Clone)]
struct KnownError {
    selector: Selector,
    name: String,
    inputs: Vec<DynSolType>,
}

/// Decodes revert payloads against the contracts' custom errors.
#[derive(Debug, Clone)]
pub struct RevertDecoder {
    known: Vec<KnownError>,
}

impl Default for RevertDecoder {
    fn default() -> Self {
        Self::canonical()
    }
}

impl RevertDecoder {
    pub fn canonical() -> Self {
        fn known<E: SolError>() -> KnownError {
            let name = E::SIGNATURE.split('(').next().unwrap_or(E::SIGNATURE);
            KnownError {
                selector: Selector::new(E::SELECTOR),
                name: name.to_string(),
                inputs: Vec::new(),
            }
        }
        Self {
            known: vec![
                known::<ISweepErrors::ArrayLengthMismatch>(),
                known::<ISweepErrors::InvalidAddressClone>(),
                known::<ISweepErrors::InvalidAddressRecipient>(),
                known::<ISweepErrors::WithdrawFailed>(),
                known::<ISweepErrors::OnlyAdmin>(),
            ],
        }
    }

    /// Adds the custom errors of a deployed ABI. Errors whose parameter
    /// types cannot be parsed are skipped.
    pub fn with_abi(mut self, abi: &JsonAbi) -> Self {
        for error in abi.errors() {
            let selector = error.selector();
            if self.known.iter().any(|k| k.selector == selector) {
                continue;
            }
            let inputs: Option<Vec<DynSolType>> = error
                .inputs
                .iter()
                .map(|p| DynSolType::parse(&p.selector_type()).ok())
                .collect();
            if let Some(inputs) = inputs {
                self.known.push(KnownError {
                    selector,
                    name: error.name.clone(),
                    inputs,
                });
            }
        }
        self
    }

    /// Classifies raw revert data.
    pub fn decode(&self, data: &[u8]) -> ContractRevert {
        if data.len() < 4 {
            return ContractRevert::Opaque {
                data: Bytes::copy_from_slice(data),
            };
        }
        let selector = Selector::from_slice(&data[..4]);

        if selector == Selector::new(Revert::SELECTOR) {
            if let Ok(revert) = Revert::abi_decode(data) {
                return ContractRevert::Reason(revert.reason);
            }
        }
        if selector == Selector::new(Panic::SELECTOR) {
            if let Ok(panic) = Panic::abi_decode(data) {
                return ContractRevert::Decoded {
                    name: "Panic".into(),
                    args: vec![panic.code.to_string()],
                };
            }
        }
        if let Some(known) = self.known.iter().find(|k| k.selector == selector) {
            let body = DynSolType::Tuple(known.inputs.clone()).abi_decode_params(&data[4..]);
            if let Ok(DynSolValue::Tuple(values)) = body {
                return ContractRevert::Decoded {
                    name: known.name.clone(),
                    args: values.iter().map(format_value).collect(),
                };
            }
        }
        ContractRevert::Opaque {
            data: Bytes::copy_from_slice(data),
        }
    }

    /// Decodes and wraps in a [`SweepError::Reverted`].
    pub fn revert_error(&self, data: &[u8], tx_hash: Option<crate::types::TxHash>) -> SweepError {
        SweepError::Reverted {
            tx_hash,
            revert: self.decode(data),
        }
    }
}

fn format_value(value: &DynSolValue) -> String {
    match value {
        DynSolValue::Address(a) => a.to_string(),
        DynSolValue::Bool(b) => b.to_string(),
        DynSolValue::Uint(u, _) => u.to_string(),
        DynSolValue::Int(i, _) => i.to_string(),
        DynSolValue::String(s) => s.clone(),
        DynSolValue::Bytes(b) => format!("0x{}", hex::encode(b)),
        DynSolValue::FixedBytes(word, size) => format!("0x{}", hex::encode(&word[..*size])),
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) | DynSolValue::Tuple(items) => {
            let inner: Vec<String> = items.iter().map(format_value).collect();
            format!("[{}]", inner.join(", "))
        }
        other => format!("{other:?}"),
    }
}

/// Node messages that indicate a retry may succeed.
const TRANSIENT_MARKERS: &[&str] = &[
    "timeout",
    "timed out",
    "connection reset",
    "connection refused",
    "connection closed",
    "broken pipe",
    "temporarily unavailable",
    "too many requests",
    "rate limit",
    "server busy",
    "nonce too low",
    "replacement transaction underpriced",
    "header not found",
    "502 bad gateway",
    "503 service unavailable",
];

/// Node messages meaning the exact transaction is already in the mempool
/// or chain.
const ALREADY_KNOWN_MARKERS: &[&str] = &[
    "already known",
    "known transaction",
    "already imported",
    "dup_transaction",
    "transaction already exists",
];

pub fn is_transient_message(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    TRANSIENT_MARKERS.iter().any(|m| lower.contains(m))
}

pub fn is_already_known_message(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    ALREADY_KNOWN_MARKERS.iter().any(|m| lower.contains(m))
}

/// Classifies a free-form node or transport message with no revert data.
pub fn classify_message(message: &str) -> SweepError {
    if is_transient_message(message) {
        SweepError::TransientTransport(message.to_string())
    } else {
        SweepError::NodeRejected(message.to_string())
    }
}
