//! The capability set every chain adapter provides, and the shared
//! build → sign → submit → confirm pipeline built on top of it.

use std::time::Duration;

use alloy::primitives::Address;
use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::abi::{ContractCall, ViewCall, ViewResult};
use crate::chain::ChainFamily;
use crate::error::{Result, SweepError};
use crate::retry::RetryPolicy;
use crate::types::{ConfirmedTx, TxHash, TxStatus};

/// How an adapter waits for confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Polling {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for Polling {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            timeout: Duration::from_secs(180),
        }
    }
}

/// Chain-specific transport for contract calls.
///
/// Implementations classify every failure into a [`SweepError`] before
/// returning it.
#[async_trait]
pub trait ChainAdapter: Send + Sync {
    /// A transaction ready to be signed.
    type Unsigned: Send + Sync;
    /// A signed envelope that can be broadcast (and re-broadcast) as is.
    type Signed: Send + Sync;

    fn family(&self) -> ChainFamily;

    /// Address of the signing key, in 20-byte form.
    fn sender(&self) -> Address;

    /// Prepares a transaction for `call`. May query the node.
    async fn build_call(&self, call: &ContractCall) -> Result<Self::Unsigned>;

    /// Signs locally. The key never leaves the process.
    fn sign(&self, unsigned: Self::Unsigned) -> Result<Self::Signed>;

    fn tx_hash(&self, signed: &Self::Signed) -> TxHash;

    /// Broadcasts a signed envelope. A node that already knows the exact
    /// transaction counts as success.
    async fn submit(&self, signed: &Self::Signed) -> Result<TxHash>;

    /// Read-only status lookup.
    async fn tx_status(&self, hash: &TxHash) -> Result<TxStatus>;

    async fn call_view(&self, view: &ViewCall) -> Result<ViewResult>;

    /// Lock serializing build → sign → submit for the signing key, when the
    /// chain needs one for nonce ordering.
    fn sender_lock(&self) -> Option<&Mutex<()>>;

    fn polling(&self) -> Polling {
        Polling::default()
    }

    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::default()
    }

    /// Polls [`tx_status`](Self::tx_status) until the transaction is
    /// confirmed, reverts, or the polling timeout passes.
    async fn await_confirmation(&self, hash: &TxHash) -> Result<ConfirmedTx> {
        let polling = self.polling();
        let deadline = Instant::now() + polling.timeout;
        let mut last = TxStatus::NotFound;
        loop {
            match self.tx_status(hash).await {
                Ok(TxStatus::Confirmed { block }) => {
                    return Ok(ConfirmedTx {
                        tx_hash: *hash,
                        block,
                    })
                }
                Ok(TxStatus::Reverted { revert, .. }) => {
                    return Err(SweepError::Reverted {
                        tx_hash: Some(*hash),
                        revert,
                    })
                }
                Ok(status) => {
                    debug!(%hash, ?status, "waiting for confirmation");
                    last = status;
                }
                Err(e) if e.is_transient() => warn!(%hash, error = %e, "status poll failed"),
                Err(e) => return Err(e),
            }
            if Instant::now() >= deadline {
                let reason = match last {
                    TxStatus::NotFound => "dropped or never seen by the node".to_string(),
                    other => format!("last status {other:?} after {:?}", polling.timeout),
                };
                return Err(SweepError::NotIncluded {
                    tx_hash: *hash,
                    reason,
                });
            }
            tokio::time::sleep(polling.interval).await;
        }
    }
}

/// Runs one contract call to confirmation.
///
/// Build failures that are transient are retried with `retry`. A transient
/// submit failure never triggers a rebuild: the node is first asked whether
/// it already has the hash, and only if it does not is the same signed
/// envelope broadcast again.
pub async fn execute<A>(adapter: &A, call: &ContractCall, retry: &RetryPolicy) -> Result<ConfirmedTx>
where
    A: ChainAdapter + ?Sized,
{
    call.validate()?;
    let method = call.method();

    let hash = {
        let _guard = match adapter.sender_lock() {
            Some(lock) => Some(lock.lock().await),
            None => None,
        };
        let unsigned = retry.run(method, move || adapter.build_call(call)).await?;
        let signed = adapter.sign(unsigned)?;
        let hash = adapter.tx_hash(&signed);
        info!(family = %adapter.family(), method, target = %call.target(), %hash, "submitting");
        submit_signed(adapter, &signed, hash, retry).await?;
        hash
    };

    let confirmed = adapter.await_confirmation(&hash).await?;
    info!(method, %hash, block = confirmed.block, "confirmed");
    Ok(confirmed)
}

async fn submit_signed<A>(adapter: &A, signed: &A::Signed, hash: TxHash, retry: &RetryPolicy) -> Result<()>
where
    A: ChainAdapter + ?Sized,
{
    let max = retry.max_attempts.max(1);
    let mut attempt = 0;
    loop {
        attempt += 1;
        let msg = match adapter.submit(signed).await {
            Ok(_) => return Ok(()),
            Err(SweepError::TransientTransport(msg)) => msg,
            Err(e) => return Err(e),
        };

        match adapter.tx_status(&hash).await {
            Ok(status) if status.is_known() => {
                info!(%hash, ?status, "node already has transaction after failed submit");
                return Ok(());
            }
            Ok(_) => {}
            Err(e) => debug!(%hash, error = %e, "status check after failed submit"),
        }

        if attempt >= max {
            return Err(SweepError::TransportExhausted {
                attempts: attempt,
                last: msg,
                tx_hash: Some(hash),
            });
        }
        let delay = retry.delay_for_attempt(attempt);
        warn!(%hash, attempt, ?delay, error = %msg, "re-broadcasting signed transaction");
        tokio::time::sleep(delay).await;
    }
}
