use std::path::PathBuf;

use sweep_core::{BatchWithdrawalRequest, SweepError, SweepOutcome, SweepReport};
use sweep_engine::{ChainClient, RequestBuilder, SweepFile, SweepOrchestrator};
use tracing::warn;

use super::{load_registry, parse_chain, CmdResult};

fn print_report(report: &SweepReport) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

pub async fn run(config: Option<PathBuf>, file: PathBuf, max_chunk: Option<usize>) -> CmdResult {
    let batch = SweepFile::from_file(&file)?;
    parse_chain(&batch.chain)?;
    let registry = load_registry(config)?;
    let builder = RequestBuilder::new(&registry);

    // every pass is validated before anything is sent
    let passes = batch.prepare(&builder)?;
    let Some(factory) = passes.first().map(|p| p.factory) else {
        return Err(SweepError::invalid_input("batch file names no asset").into());
    };
    let requests: Vec<BatchWithdrawalRequest> = passes.into_iter().map(|p| p.request).collect();

    let endpoint = builder.endpoint(&batch.chain, &batch.network)?;
    let client = ChainClient::connect(endpoint, registry.settings()).await?;
    let mut orchestrator = SweepOrchestrator::new(&client, registry.settings());
    if let Some(n) = max_chunk {
        orchestrator = orchestrator.with_max_chunk(n);
    }

    let mut unswept = 0;
    let mut first_error = None;
    for result in orchestrator.sweep_passes(factory, &requests).await {
        match result {
            Ok(report) => {
                if report.outcome() == SweepOutcome::Partial {
                    warn!(asset = %report.asset, unswept = report.unswept().len(), "partial sweep");
                    unswept += report.unswept().len();
                }
                print_report(&report)?;
            }
            Err(SweepError::BatchFailed(report)) => {
                print_report(&report)?;
                unswept += report.entries.len();
                first_error.get_or_insert(SweepError::BatchFailed(report));
            }
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }

    if let Some(e) = first_error {
        return Err(e.into());
    }
    if unswept > 0 {
        return Err(format!("sweep incomplete: {unswept} clones may still hold funds").into());
    }
    Ok(())
}
