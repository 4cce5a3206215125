//! EVM chain adapter.
//!
//! Connects to an EVM-compatible JSON-RPC endpoint, signs legacy
//! transactions locally, and implements [`ChainAdapter`].

use std::sync::Arc;

use alloy::network::Ethereum;
use alloy::primitives::{Address, Bytes, B256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use sweep_core::abi::{ContractCall, ViewCall, ViewResult};
use sweep_core::classify::{is_already_known_message, RevertDecoder};
use sweep_core::retry::RetryPolicy;
use sweep_core::{ChainAdapter, ChainFamily, Polling, Result, SweepError, TxHash, TxStatus};
use sweep_signer::Signer;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::classify_rpc_error;
use crate::receipt;
use crate::tx::{self, SignedLegacy};

/// An EVM chain adapter bound to one RPC endpoint and one signing key.
pub struct EvmAdapter {
    provider: DynProvider<Ethereum>,
    rpc_url: String,
    chain_id: u64,
    signer: Arc<dyn Signer>,
    confirmations: u64,
    polling: Polling,
    retry: RetryPolicy,
    decoder: RevertDecoder,
    nonce_lock: Mutex<()>,
}

impl std::fmt::Debug for EvmAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvmAdapter")
            .field("rpc_url", &self.rpc_url)
            .field("chain_id", &self.chain_id)
            .field("sender", &self.signer.address())
            .field("confirmations", &self.confirmations)
            .finish()
    }
}

impl EvmAdapter {
    /// Creates an adapter for a node whose chain id is already known.
    pub fn new(rpc_url: &str, chain_id: u64, signer: Arc<dyn Signer>) -> Result<Self> {
        let url: alloy::transports::http::reqwest::Url = rpc_url
            .parse()
            .map_err(|e| SweepError::Config(format!("invalid RPC URL {rpc_url}: {e}")))?;

        let provider = ProviderBuilder::new().connect_http(url).erased();

        Ok(Self {
            provider,
            rpc_url: rpc_url.to_string(),
            chain_id,
            signer,
            confirmations: 1,
            polling: Polling::default(),
            retry: RetryPolicy::default(),
            decoder: RevertDecoder::canonical(),
            nonce_lock: Mutex::new(()),
        })
    }

    /// Creates an adapter and asks the node for its chain id.
    pub async fn connect(rpc_url: &str, signer: Arc<dyn Signer>, retry: &RetryPolicy) -> Result<Self> {
        let mut adapter = Self::new(rpc_url, 0, signer)?;
        let probe = &adapter;
        let chain_id = retry
            .run("eth_chainId", move || async move {
                probe
                    .provider
                    .get_chain_id()
                    .await
                    .map_err(|e| classify_rpc_error(&e, &probe.decoder))
            })
            .await?;
        adapter.chain_id = chain_id;
        info!(rpc_url, chain_id, sender = %adapter.signer.address(), "connected to EVM node");
        Ok(adapter.with_retry(retry.clone()))
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

    /// Returns a reference to the underlying provider.
    pub fn provider(&self) -> &DynProvider<Ethereum> {
        &self.provider
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    pub fn confirmations(&self) -> u64 {
        self.confirmations
    }

    pub fn decoder(&self) -> &RevertDecoder {
        &self.decoder
    }
}

#[async_trait]
impl ChainAdapter for EvmAdapter {
    type Unsigned = alloy::consensus::TxLegacy;
    type Signed = SignedLegacy;

    fn family(&self) -> ChainFamily {
        ChainFamily::Evm
    }

    fn sender(&self) -> Address {
        self.signer.address()
    }

    async fn build_call(&self, call: &ContractCall) -> Result<Self::Unsigned> {
        tx::build_legacy(self, call).await
    }

    fn sign(&self, unsigned: Self::Unsigned) -> Result<Self::Signed> {
        tx::sign_legacy(self.signer.as_ref(), unsigned)
    }

    fn tx_hash(&self, signed: &Self::Signed) -> TxHash {
        signed.hash
    }

    async fn submit(&self, signed: &Self::Signed) -> Result<TxHash> {
        match self.provider.send_raw_transaction(&signed.raw).await {
            Ok(pending) => {
                debug!(hash = %pending.tx_hash(), nonce = signed.nonce, "raw transaction accepted");
                Ok(signed.hash)
            }
            Err(e) => {
                if is_already_known_message(&e.to_string()) {
                    debug!(hash = %signed.hash, "node already knows transaction");
                    return Ok(signed.hash);
                }
                Err(classify_rpc_error(&e, &self.decoder))
            }
        }
    }

    async fn tx_status(&self, hash: &TxHash) -> Result<TxStatus> {
        receipt::tx_status(self, *hash).await
    }

    async fn call_view(&self, view: &ViewCall) -> Result<ViewResult> {
        let request = TransactionRequest::default()
            .to(view.target())
            .input(Bytes::from(view.abi_encode()).into());
        let output: Bytes = self
            .provider
            .call(request)
            .await
            .map_err(|e| classify_rpc_error(&e, &self.decoder))?;
        view.decode_output(&output)
    }

    fn sender_lock(&self) -> Option<&Mutex<()>> {
        Some(&self.nonce_lock)
    }

    fn polling(&self) -> Polling {
        self.polling
    }

    fn retry_policy(&self) -> RetryPolicy {
        self.retry.clone()
    }
}

/// Hash helper for callers holding a hex string.
pub fn parse_tx_hash(s: &str) -> Result<B256> {
    s.trim()
        .parse::<B256>()
        .map_err(|e| SweepError::InvalidInput(format!("invalid transaction hash {s}: {e}")))
}
