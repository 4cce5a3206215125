//! Legacy (EIP-155) transaction building and signing.
//!
//! `eth_estimateGas` doubles as the pre-broadcast simulation: a call that
//! would revert fails here with its revert data, before anything is signed.

use alloy::consensus::{SignableTransaction, TxEnvelope, TxLegacy};
use alloy::eips::eip2718::Encodable2718;
use alloy::primitives::{Bytes, Signature, TxKind, B256, U256};
use alloy::providers::Provider;
use alloy::rpc::types::TransactionRequest;
use sweep_core::abi::ContractCall;
use sweep_core::{Result, SweepError};
use sweep_signer::Signer;
use tracing::debug;

use crate::adapter::EvmAdapter;
use crate::error::classify_rpc_error;

/// Percentage added on top of the estimated gas.
const GAS_HEADROOM_PERCENT: u64 = 20;

/// A signed transaction ready for `eth_sendRawTransaction`.
#[derive(Debug, Clone)]
pub struct SignedLegacy {
    pub hash: B256,
    pub raw: Bytes,
    pub nonce: u64,
}

/// Builds an unsigned legacy transaction for `call`, simulating it first.
///
/// Must run under the adapter's nonce lock so the pending nonce is not
/// handed out twice.
pub async fn build_legacy(adapter: &EvmAdapter, call: &ContractCall) -> Result<TxLegacy> {
    let provider = adapter.provider();
    let decoder = adapter.decoder();
    let sender = adapter.address();
    let target = call.target();
    let input = Bytes::from(call.abi_encode());

    let request = TransactionRequest::default()
        .from(sender)
        .to(target)
        .input(input.clone().into());

    let estimated: u64 = provider
        .estimate_gas(request)
        .await
        .map_err(|e| classify_rpc_error(&e, decoder))?;
    let gas_limit = estimated + estimated * GAS_HEADROOM_PERCENT / 100;

    let nonce: u64 = provider
        .get_transaction_count(sender)
        .pending()
        .await
        .map_err(|e| classify_rpc_error(&e, decoder))?;

    let gas_price: u128 = provider
        .get_gas_price()
        .await
        .map_err(|e| classify_rpc_error(&e, decoder))?;

    debug!(method = call.method(), nonce, gas_limit, gas_price, "built legacy transaction");

    Ok(TxLegacy {
        chain_id: Some(adapter.chain_id()),
        nonce,
        gas_price,
        gas_limit,
        to: TxKind::Call(target),
        value: U256::ZERO,
        input,
    })
}

/// Signs `tx` with the EIP-155 signature hash.
pub fn sign_legacy(signer: &dyn Signer, tx: TxLegacy) -> Result<SignedLegacy> {
    let sighash = tx.signature_hash();
    let sig = signer
        .sign_hash(&sighash.0)
        .map_err(|e| SweepError::NodeRejected(format!("local signing failed: {e}")))?;
    let signature = Signature::new(
        U256::from_be_bytes(sig.r),
        U256::from_be_bytes(sig.s),
        sig.recovery_id() == 1,
    );

    let nonce = tx.nonce;
    let envelope = TxEnvelope::from(tx.into_signed(signature));
    let hash = *envelope.tx_hash();
    let raw = Bytes::from(envelope.encoded_2718());
    Ok(SignedLegacy { hash, raw, nonce })
}
