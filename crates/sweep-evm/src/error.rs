//! Classification of JSON-RPC failures.

use alloy::primitives::Bytes;
use alloy::transports::{RpcError, TransportErrorKind};
use sweep_core::classify::{classify_message, RevertDecoder};
use sweep_core::{ContractRevert, SweepError};

/// Maps a provider error onto the sweep taxonomy.
///
/// Revert data attached to an error response is decoded against `decoder`.
/// Such reverts come from simulation or `eth_call`, so they carry no
/// transaction hash.
pub fn classify_rpc_error(err: &RpcError<TransportErrorKind>, decoder: &RevertDecoder) -> SweepError {
    match err {
        RpcError::ErrorResp(payload) => {
            if let Some(data) = payload.as_revert_data() {
                return decoder.revert_error(&data, None);
            }
            let message = payload.message.to_string();
            if let Some(reason) = message.strip_prefix("execution reverted: ") {
                return SweepError::Reverted {
                    tx_hash: None,
                    revert: ContractRevert::Reason(reason.to_string()),
                };
            }
            if message.starts_with("execution reverted") || payload.code == 3 {
                return SweepError::Reverted {
                    tx_hash: None,
                    revert: ContractRevert::Opaque { data: Bytes::new() },
                };
            }
            // -32005: limit exceeded
            if payload.code == -32005 {
                return SweepError::TransientTransport(message);
            }
            classify_message(&message)
        }
        RpcError::Transport(kind) => SweepError::TransientTransport(kind.to_string()),
        RpcError::NullResp => SweepError::TransientTransport("null response from node".into()),
        RpcError::DeserError { err, .. } => {
            SweepError::TransientTransport(format!("malformed node response: {err}"))
        }
        other => SweepError::NodeRejected(other.to_string()),
    }
}
