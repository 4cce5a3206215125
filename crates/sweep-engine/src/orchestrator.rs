//! Chunked factory sweeps with a per-clone ledger.

use alloy::primitives::Address;
use sweep_core::config::SweepSettings;
use sweep_core::retry::RetryPolicy;
use sweep_core::{
    execute, BatchWithdrawalRequest, ChainAdapter, ItemOutcome, Result, SweepError, SweepOutcome,
    SweepReport,
};
use tracing::{info, warn};

/// Drives [`BatchWithdrawalRequest`]s through an adapter, one chunk per
/// on-chain call.
pub struct SweepOrchestrator<'a, A: ?Sized> {
    adapter: &'a A,
    max_chunk: usize,
    retry: RetryPolicy,
}

impl<'a, A> SweepOrchestrator<'a, A>
where
    A: ChainAdapter + ?Sized,
{
    pub fn new(adapter: &'a A, settings: &SweepSettings) -> Self {
        Self {
            adapter,
            max_chunk: settings.max_chunk.max(1),
            retry: settings.retry.clone(),
        }
    }

    pub fn with_max_chunk(mut self, max_chunk: usize) -> Self {
        self.max_chunk = max_chunk.max(1);
        self
    }

    pub fn max_chunk(&self) -> usize {
        self.max_chunk
    }

    /// Sweeps every clone in `request` through `factory`.
    ///
    /// A failed chunk does not stop later chunks and nothing is rolled back.
    /// Returns the ledger unless no clone at all was swept, in which case
    /// the ledger travels inside [`SweepError::BatchFailed`].
    pub async fn sweep(&self, factory: Address, request: &BatchWithdrawalRequest) -> Result<SweepReport> {
        request.validate()?;

        let mut report = SweepReport::new(
            request.asset.chain,
            request.asset.network.clone(),
            &request.asset.symbol,
            request.recipient,
        );
        let chunks = request.chunks(self.max_chunk);
        let total = chunks.len();
        info!(
            chain = %request.asset.chain,
            asset = %request.asset.symbol,
            clones = request.len(),
            chunks = total,
            "starting sweep"
        );

        for (index, chunk) in chunks.iter().enumerate() {
            let call = chunk.to_call(factory);
            report.calls_issued += 1;
            let outcome = match execute(self.adapter, &call, &self.retry).await {
                Ok(confirmed) => {
                    info!(chunk = index + 1, of = total, hash = %confirmed.tx_hash, "chunk swept");
                    ItemOutcome::from_confirmed(confirmed)
                }
                Err(e) => {
                    warn!(chunk = index + 1, of = total, taxonomy = e.taxonomy(), error = %e, "chunk failed");
                    ItemOutcome::from_error(&e)
                }
            };
            report.record_chunk(index, &chunk.clones, &chunk.amounts, outcome);
        }

        match report.outcome() {
            SweepOutcome::Failed => Err(SweepError::BatchFailed(Box::new(report))),
            outcome => {
                info!(?outcome, swept = report.swept_count(), failed = report.failed_count(), "sweep finished");
                Ok(report)
            }
        }
    }

    /// Runs one sweep per request, strictly in order. Each pass covers a
    /// single asset.
    pub async fn sweep_passes(
        &self,
        factory: Address,
        passes: &[BatchWithdrawalRequest],
    ) -> Vec<Result<SweepReport>> {
        let mut results = Vec::with_capacity(passes.len());
        for pass in passes {
            results.push(self.sweep(factory, pass).await);
        }
        results
    }
}
