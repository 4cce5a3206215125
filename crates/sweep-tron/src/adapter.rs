//! Tron chain adapter.
//!
//! Builds transactions through the node's `triggersmartcontract`, signs
//! the returned txID locally, and broadcasts the signed envelope.

use std::sync::Arc;

use alloy::primitives::Address;
use async_trait::async_trait;
use sweep_core::abi::{ContractCall, ViewCall, ViewResult};
use sweep_core::classify::RevertDecoder;
use sweep_core::config::DEFAULT_TRON_FEE_LIMIT;
use sweep_core::retry::RetryPolicy;
use sweep_core::{ChainAdapter, ChainFamily, ContractRevert, Polling, Result, SweepError, TxHash, TxStatus};
use sweep_signer::Signer;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::address::TronAddress;
use crate::client::TronClient;
use crate::params::{call_params, encode_params, view_params};
use crate::tx::{
    decode_message, sign_transaction, BroadcastResponse, IdRequest, NowBlock, SignedTron,
    TransactionInfo, TriggerRequest, TriggerResponse, TronTransaction,
};

const TRANSIENT_CODES: &[&str] = &["SERVER_BUSY", "NO_CONNECTION", "NOT_ENOUGH_EFFECTIVE_CONNECTION"];
const DUPLICATE_CODE: &str = "DUP_TRANSACTION_ERROR";

/// Maps a broadcast return code to the error taxonomy. `Ok` means the
/// node already has the transaction.
pub fn classify_broadcast_code(code: &str, message: &str) -> Result<()> {
    let message = decode_message(message);
    if code == DUPLICATE_CODE {
        return Ok(());
    }
    if TRANSIENT_CODES.contains(&code) {
        return Err(SweepError::TransientTransport(format!("{code}: {message}")));
    }
    Err(SweepError::NodeRejected(format!("{code}: {message}")))
}

/// Classifies `contractResult` bytes of a failed transaction.
pub fn classify_revert_data(decoder: &RevertDecoder, data: &[u8]) -> ContractRevert {
    decoder.decode(data)
}

/// A Tron adapter bound to one full node and one signing key.
pub struct TronAdapter {
    client: TronClient,
    signer: Arc<dyn Signer>,
    owner: TronAddress,
    fee_limit: u64,
    confirmations: u64,
    polling: Polling,
    retry: RetryPolicy,
    decoder: RevertDecoder,
}

impl std::fmt::Debug for TronAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TronAdapter")
            .field("node", &self.client.base_url())
            .field("owner", &self.owner)
            .field("fee_limit", &self.fee_limit)
            .field("confirmations", &self.confirmations)
            .finish()
    }
}

impl TronAdapter {
    pub fn new(node_url: &str, signer: Arc<dyn Signer>, requests_per_second: u32) -> Result<Self> {
        let client = TronClient::new(node_url, requests_per_second)?;
        let owner = TronAddress::from_evm(signer.address());
        info!(node = node_url, %owner, "tron adapter ready");
        Ok(Self {
            client,
            signer,
            owner,
            fee_limit: DEFAULT_TRON_FEE_LIMIT,
            confirmations: 1,
            polling: Polling::default(),
            retry: RetryPolicy::default(),
            decoder: RevertDecoder::canonical(),
        })
    }

    pub fn with_fee_limit(mut self, fee_limit: u64) -> Self {
        self.fee_limit = fee_limit;
        self
    }

    pub fn with_confirmations(mut self, confirmations: u64) -> Self {
        self.confirmations = confirmations.max(1);
        self
    }

    pub fn with_polling(mut self, polling: Polling) -> Self {
        self.polling = polling;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_decoder(mut self, decoder: RevertDecoder) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn owner(&self) -> TronAddress {
        self.owner
    }

    pub fn fee_limit(&self) -> u64 {
        self.fee_limit
    }

    pub fn confirmations(&self) -> u64 {
        self.confirmations
    }

    pub fn client(&self) -> &TronClient {
        &self.client
    }

    fn trigger_request(&self, target: Address, signature: &str, parameter: String, fee_limit: Option<u64>) -> TriggerRequest {
        TriggerRequest {
            owner_address: self.owner.to_hex(),
            contract_address: TronAddress::from_evm(target).to_hex(),
            function_selector: signature.to_string(),
            parameter,
            call_value: 0,
            fee_limit,
        }
    }

    async fn head_block(&self) -> Result<u64> {
        let block: NowBlock = self
            .client
            .post("/wallet/getnowblock", &serde_json::json!({}))
            .await?;
        Ok(block.block_header.raw_data.number)
    }
}

fn trigger_failure(status: &crate::tx::ReturnStatus) -> SweepError {
    let code = status.code.as_deref().unwrap_or("UNKNOWN");
    let message = status.message.as_deref().map(decode_message).unwrap_or_default();
    SweepError::NodeRejected(format!("{code}: {message}"))
}

#[async_trait]
impl ChainAdapter for TronAdapter {
    type Unsigned = TronTransaction;
    type Signed = SignedTron;

    fn family(&self) -> ChainFamily {
        ChainFamily::Tron
    }

    fn sender(&self) -> Address {
        self.signer.address()
    }

    async fn build_call(&self, call: &ContractCall) -> Result<Self::Unsigned> {
        let request = self.trigger_request(
            call.target(),
            call.signature(),
            encode_params(&call_params(call)),
            Some(self.fee_limit),
        );
        debug!(
            contract = %request.contract_address,
            selector = %request.function_selector,
            "triggersmartcontract"
        );
        let resp: TriggerResponse = self
            .client
            .post("/wallet/triggersmartcontract", &request)
            .await?;
        match resp.transaction {
            Some(tx) if resp.result.result => Ok(tx),
            _ => Err(trigger_failure(&resp.result)),
        }
    }

    fn sign(&self, unsigned: Self::Unsigned) -> Result<Self::Signed> {
        sign_transaction(self.signer.as_ref(), unsigned)
    }

    fn tx_hash(&self, signed: &Self::Signed) -> TxHash {
        signed.hash
    }

    async fn submit(&self, signed: &Self::Signed) -> Result<TxHash> {
        let resp: BroadcastResponse = self
            .client
            .post("/wallet/broadcasttransaction", &signed.transaction)
            .await?;
        if resp.result {
            debug!(hash = %signed.hash, "broadcast accepted");
            return Ok(signed.hash);
        }
        let code = resp.code.as_deref().unwrap_or("UNKNOWN");
        classify_broadcast_code(code, resp.message.as_deref().unwrap_or_default())?;
        debug!(hash = %signed.hash, "node already has transaction");
        Ok(signed.hash)
    }

    async fn tx_status(&self, hash: &TxHash) -> Result<TxStatus> {
        let id = IdRequest {
            value: hex::encode(hash),
        };
        let info: TransactionInfo = self
            .client
            .post("/wallet/gettransactioninfobyid", &id)
            .await?;

        let block = match (info.id.as_ref(), info.block_number) {
            (Some(_), Some(block)) => block,
            _ => {
                let tx: serde_json::Value = self
                    .client
                    .post("/wallet/gettransactionbyid", &id)
                    .await?;
                return Ok(if tx.get("txID").is_some() {
                    TxStatus::Pending
                } else {
                    TxStatus::NotFound
                });
            }
        };

        if info.failed() {
            let revert = classify_revert_data(&self.decoder, &info.revert_data());
            if let Some(msg) = info.res_message.as_deref() {
                debug!(%hash, message = %decode_message(msg), "transaction failed");
            }
            return Ok(TxStatus::Reverted { block, revert });
        }

        let head = self.head_block().await?;
        let confirmations = head.saturating_sub(block) + 1;
        if confirmations >= self.confirmations {
            Ok(TxStatus::Confirmed { block })
        } else {
            Ok(TxStatus::Included {
                block,
                confirmations,
            })
        }
    }

    async fn call_view(&self, view: &ViewCall) -> Result<ViewResult> {
        let request = self.trigger_request(
            view.target(),
            view.signature(),
            encode_params(&view_params(view)),
            None,
        );
        let resp: TriggerResponse = self
            .client
            .post("/wallet/triggerconstantcontract", &request)
            .await?;
        if !resp.result.result {
            return Err(trigger_failure(&resp.result));
        }
        let output = resp
            .constant_result
            .first()
            .and_then(|s| hex::decode(s).ok())
            .unwrap_or_default();
        // selector-prefixed output is revert data, not a return value
        if output.len() % 32 == 4 {
            return Err(self.decoder.revert_error(&output, None));
        }
        view.decode_output(&output)
    }

    fn sender_lock(&self) -> Option<&Mutex<()>> {
        None
    }

    fn polling(&self) -> Polling {
        self.polling
    }

    fn retry_policy(&self) -> RetryPolicy {
        self.retry.clone()
    }
}
