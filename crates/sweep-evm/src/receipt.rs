//! Transaction status and confirmation depth.

use alloy::consensus::Transaction as _;
use alloy::eips::BlockId;
use alloy::network::TransactionResponse;
use alloy::primitives::{Bytes, B256};
use alloy::providers::Provider;
use alloy::rpc::types::TransactionRequest;
use alloy::transports::RpcError;
use sweep_core::{ContractRevert, Result, TxStatus};
use tracing::debug;

use crate::adapter::EvmAdapter;
use crate::error::classify_rpc_error;

/// Looks up the status of `hash` without side effects.
pub async fn tx_status(adapter: &EvmAdapter, hash: B256) -> Result<TxStatus> {
    let provider = adapter.provider();
    let decoder = adapter.decoder();

    let receipt = provider
        .get_transaction_receipt(hash)
        .await
        .map_err(|e| classify_rpc_error(&e, decoder))?;

    let Some(receipt) = receipt else {
        let pending = provider
            .get_transaction_by_hash(hash)
            .await
            .map_err(|e| classify_rpc_error(&e, decoder))?;
        return Ok(match pending {
            Some(_) => TxStatus::Pending,
            None => TxStatus::NotFound,
        });
    };

    let Some(block) = receipt.block_number else {
        return Ok(TxStatus::Pending);
    };

    if !receipt.status() {
        let revert = replay_revert(adapter, hash, block).await;
        return Ok(TxStatus::Reverted { block, revert });
    }

    let head = provider
        .get_block_number()
        .await
        .map_err(|e| classify_rpc_error(&e, decoder))?;
    let confirmations = head.saturating_sub(block) + 1;
    if confirmations >= adapter.confirmations() {
        Ok(TxStatus::Confirmed { block })
    } else {
        Ok(TxStatus::Included {
            block,
            confirmations,
        })
    }
}

/// Re-executes a mined, failed transaction with `eth_call` against the
/// parent block to recover its revert data. Best effort: anything that
/// prevents the replay yields an opaque revert.
async fn replay_revert(adapter: &EvmAdapter, hash: B256, block: u64) -> ContractRevert {
    let opaque = ContractRevert::Opaque { data: Bytes::new() };
    let provider = adapter.provider();

    let tx = match provider.get_transaction_by_hash(hash).await {
        Ok(Some(tx)) => tx,
        _ => return opaque,
    };
    let Some(to) = tx.to() else {
        return opaque;
    };

    let request = TransactionRequest::default()
        .from(TransactionResponse::from(&tx))
        .to(to)
        .value(tx.value())
        .input(tx.input().clone().into())
        .gas_limit(tx.gas_limit());

    match provider
        .call(request)
        .block(BlockId::number(block.saturating_sub(1)))
        .await
    {
        Ok(_) => {
            debug!(%hash, "replay succeeded; revert depends on in-block state");
            opaque
        }
        Err(RpcError::ErrorResp(payload)) => match payload.as_revert_data() {
            Some(data) => adapter.decoder().decode(&data),
            None => match payload.message.strip_prefix("execution reverted: ") {
                Some(reason) => ContractRevert::Reason(reason.to_string()),
                None => opaque,
            },
        },
        Err(e) => {
            debug!(%hash, error = %e, "revert replay failed");
            opaque
        }
    }
}
