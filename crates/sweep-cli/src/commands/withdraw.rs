use std::path::PathBuf;

use sweep_core::ContractOps;
use sweep_engine::{AmountMode, ChainClient, RequestBuilder};
use tracing::info;

use super::{display_address, load_registry, parse_chain, CmdResult};

pub struct WithdrawArgs {
    pub chain: String,
    pub network: String,
    pub token: String,
    pub clone: String,
    pub amount: String,
    pub recipient: String,
    pub decimal: bool,
}

pub async fn run(config: Option<PathBuf>, args: WithdrawArgs) -> CmdResult {
    parse_chain(&args.chain)?;
    let registry = load_registry(config)?;
    let builder = RequestBuilder::new(&registry);

    let mode = if args.decimal {
        AmountMode::Decimal
    } else {
        AmountMode::Atomic
    };
    let prepared = builder.withdrawal(
        &args.chain,
        &args.network,
        &args.token,
        &args.clone,
        &args.amount,
        &args.recipient,
        mode,
    )?;
    let endpoint = builder.endpoint(&args.chain, &args.network)?;
    let client = ChainClient::connect(endpoint, registry.settings()).await?;

    let intent = &prepared.intent;
    info!(
        asset = %intent.asset.symbol,
        clone = %display_address(prepared.family, intent.clone),
        recipient = %display_address(prepared.family, intent.recipient),
        amount = %intent.amount,
        "withdrawing"
    );
    let confirmed = client.run(intent.to_call(prepared.clone_abi)).await?;
    println!("{}", serde_json::to_string_pretty(&confirmed)?);
    Ok(())
}
