//! Per-network chain client.
//!
//! One [`ChainClient`] is built for each (chain, network) the caller
//! touches and passed around explicitly.

use std::sync::Arc;

use alloy::consensus::TxLegacy;
use alloy::primitives::Address;
use async_trait::async_trait;
use sweep_core::abi::{ContractCall, ViewCall, ViewResult};
use sweep_core::classify::RevertDecoder;
use sweep_core::config::SweepSettings;
use sweep_core::retry::RetryPolicy;
use sweep_core::selectors::{load_abi, SelectorRegistry};
use sweep_core::{
    ChainAdapter, ChainEndpoint, ChainFamily, CloneAbi, Polling, Result, SweepError, TxHash,
    TxStatus,
};
use sweep_evm::{EvmAdapter, SignedLegacy};
use sweep_signer::{LocalSigner, Signer};
use sweep_tron::tx::{SignedTron, TronTransaction};
use sweep_tron::TronAdapter;
use tokio::sync::Mutex;
use tracing::info;

/// Adapter for one network, selected by chain family.
#[derive(Debug)]
pub enum ChainClient {
    Evm(EvmAdapter),
    Tron(TronAdapter),
}

#[derive(Debug, Clone)]
pub enum UnsignedTx {
    Evm(TxLegacy),
    Tron(TronTransaction),
}

#[derive(Debug, Clone)]
pub enum SignedTx {
    Evm(SignedLegacy),
    Tron(SignedTron),
}

/// Verifies the selector registry and, when configured, the deployed ABI.
/// Returns the revert decoder adapters should use.
pub fn startup_checks(settings: &SweepSettings, clone_abi: CloneAbi) -> Result<RevertDecoder> {
    let selectors = SelectorRegistry::canonical();
    selectors.verify()?;
    let checksum = selectors.checksum();
    info!(%checksum, entries = selectors.entries().len(), "selector registry verified");

    if let Some(expected) = settings.expected_abi_checksum {
        if expected != checksum {
            return Err(SweepError::AbiMismatch(format!(
                "selector registry checksum {checksum} does not match expected {expected}"
            )));
        }
    }

    let mut decoder = RevertDecoder::canonical();
    if let Some(path) = &settings.deployed_abi_path {
        let abi = load_abi(path)?;
        selectors.validate_against(&abi, clone_abi)?;
        decoder = decoder.with_abi(&abi);
        info!(path = %path.display(), "deployed ABI checked");
    }
    Ok(decoder)
}

impl ChainClient {
    /// Builds the adapter for `endpoint` and connects to its node.
    pub async fn connect(endpoint: &ChainEndpoint, settings: &SweepSettings) -> Result<Self> {
        let decoder = startup_checks(settings, endpoint.clone_abi)?;
        let rpc_url = endpoint.rpc_url()?;
        let key = endpoint.signing_key()?;
        let signer: Arc<dyn Signer> = Arc::new(LocalSigner::from_hex(key.expose()).map_err(|e| {
            SweepError::Config(format!(
                "{}/{} signing key: {e}",
                endpoint.chain, endpoint.network
            ))
        })?);
        let polling = Polling {
            interval: settings.poll_interval(),
            timeout: settings.confirmation_timeout(),
        };

        let client = match endpoint.chain.family() {
            ChainFamily::Evm => Self::Evm(
                EvmAdapter::connect(&rpc_url, signer, &settings.retry)
                    .await?
                    .with_confirmations(endpoint.confirmations)
                    .with_polling(polling)
                    .with_decoder(decoder),
            ),
            ChainFamily::Tron => Self::Tron(
                TronAdapter::new(&rpc_url, signer, settings.tron_requests_per_second)?
                    .with_fee_limit(settings.tron_fee_limit)
                    .with_confirmations(endpoint.confirmations)
                    .with_polling(polling)
                    .with_retry(settings.retry.clone())
                    .with_decoder(decoder),
            ),
        };
        info!(chain = %endpoint.chain, network = %endpoint.network, sender = %client.sender(), "chain client ready");
        Ok(client)
    }
}

fn family_mismatch() -> SweepError {
    SweepError::InvalidInput("transaction belongs to another chain family".into())
}

#[async_trait]
impl ChainAdapter for ChainClient {
    type Unsigned = UnsignedTx;
    type Signed = SignedTx;

    fn family(&self) -> ChainFamily {
        match self {
            Self::Evm(a) => a.family(),
            Self::Tron(a) => a.family(),
        }
    }

    fn sender(&self) -> Address {
        match self {
            Self::Evm(a) => a.sender(),
            Self::Tron(a) => a.sender(),
        }
    }

    async fn build_call(&self, call: &ContractCall) -> Result<UnsignedTx> {
        match self {
            Self::Evm(a) => a.build_call(call).await.map(UnsignedTx::Evm),
            Self::Tron(a) => a.build_call(call).await.map(UnsignedTx::Tron),
        }
    }

    fn sign(&self, unsigned: UnsignedTx) -> Result<SignedTx> {
        match (self, unsigned) {
            (Self::Evm(a), UnsignedTx::Evm(tx)) => a.sign(tx).map(SignedTx::Evm),
            (Self::Tron(a), UnsignedTx::Tron(tx)) => a.sign(tx).map(SignedTx::Tron),
            _ => Err(family_mismatch()),
        }
    }

    fn tx_hash(&self, signed: &SignedTx) -> TxHash {
        match signed {
            SignedTx::Evm(s) => s.hash,
            SignedTx::Tron(s) => s.hash,
        }
    }

    async fn submit(&self, signed: &SignedTx) -> Result<TxHash> {
        match (self, signed) {
            (Self::Evm(a), SignedTx::Evm(s)) => a.submit(s).await,
            (Self::Tron(a), SignedTx::Tron(s)) => a.submit(s).await,
            _ => Err(family_mismatch()),
        }
    }

    async fn tx_status(&self, hash: &TxHash) -> Result<TxStatus> {
        match self {
            Self::Evm(a) => a.tx_status(hash).await,
            Self::Tron(a) => a.tx_status(hash).await,
        }
    }

    async fn call_view(&self, view: &ViewCall) -> Result<ViewResult> {
        match self {
            Self::Evm(a) => a.call_view(view).await,
            Self::Tron(a) => a.call_view(view).await,
        }
    }

    fn sender_lock(&self) -> Option<&Mutex<()>> {
        match self {
            Self::Evm(a) => a.sender_lock(),
            Self::Tron(a) => a.sender_lock(),
        }
    }

    fn polling(&self) -> Polling {
        match self {
            Self::Evm(a) => a.polling(),
            Self::Tron(a) => a.polling(),
        }
    }

    fn retry_policy(&self) -> RetryPolicy {
        match self {
            Self::Evm(a) => a.retry_policy(),
            Self::Tron(a) => a.retry_policy(),
        }
    }
}
