use std::path::PathBuf;

use sweep_core::abi::salt_from_label;
use sweep_core::{ChainAdapter, ContractOps};
use sweep_engine::{ChainClient, RequestBuilder};
use tracing::info;

use super::{display_address, load_registry, parse_chain, CmdResult};

pub async fn predict(config: Option<PathBuf>, chain: String, network: String, salt: String) -> CmdResult {
    parse_chain(&chain)?;
    let salt = salt_from_label(&salt)?;
    let registry = load_registry(config)?;
    let builder = RequestBuilder::new(&registry);
    let endpoint = builder.endpoint(&chain, &network)?;
    let factory = builder.factory(endpoint)?;
    let client = ChainClient::connect(endpoint, registry.settings()).await?;

    let predicted = client.predict_address(factory, salt).await?;
    println!("{}", display_address(client.family(), predicted));
    Ok(())
}

pub async fn create(config: Option<PathBuf>, chain: String, network: String, salt: String) -> CmdResult {
    parse_chain(&chain)?;
    let salt = salt_from_label(&salt)?;
    let registry = load_registry(config)?;
    let builder = RequestBuilder::new(&registry);
    let endpoint = builder.endpoint(&chain, &network)?;
    let factory = builder.factory(endpoint)?;
    let client = ChainClient::connect(endpoint, registry.settings()).await?;

    let predicted = client.predict_address(factory, salt).await?;
    info!(clone = %display_address(client.family(), predicted), %salt, "creating clone");
    let confirmed = client.create_clone(factory, salt).await?;
    println!("clone: {}", display_address(client.family(), predicted));
    println!("{}", serde_json::to_string_pretty(&confirmed)?);
    Ok(())
}
