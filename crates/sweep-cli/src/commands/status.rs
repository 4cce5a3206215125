use std::path::PathBuf;

use sweep_core::{ChainAdapter, TxStatus};
use sweep_engine::{ChainClient, RequestBuilder};

use super::{load_registry, parse_chain, parse_hash, CmdResult};

pub async fn run(
    config: Option<PathBuf>,
    chain: String,
    network: String,
    hash: String,
    wait: bool,
) -> CmdResult {
    parse_chain(&chain)?;
    let hash = parse_hash(&hash)?;
    let registry = load_registry(config)?;
    let endpoint = RequestBuilder::new(&registry).endpoint(&chain, &network)?;
    let client = ChainClient::connect(endpoint, registry.settings()).await?;

    if wait {
        let confirmed = client.await_confirmation(&hash).await?;
        println!("{}", serde_json::to_string_pretty(&confirmed)?);
        return Ok(());
    }

    match client.tx_status(&hash).await? {
        TxStatus::NotFound => println!("{hash}: not found"),
        TxStatus::Pending => println!("{hash}: pending"),
        TxStatus::Included {
            block,
            confirmations,
        } => println!("{hash}: included in block {block} ({confirmations} confirmations)"),
        TxStatus::Confirmed { block } => println!("{hash}: confirmed in block {block}"),
        TxStatus::Reverted { block, revert } => {
            println!("{hash}: reverted in block {block}: {revert} [{}]", revert.taxonomy())
        }
    }
    Ok(())
}
