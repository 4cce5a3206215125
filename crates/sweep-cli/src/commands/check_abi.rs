use std::path::PathBuf;

use sweep_core::selectors::SelectorRegistry;
use sweep_engine::startup_checks;

use super::{load_registry, CmdResult};

pub fn run(config: Option<PathBuf>) -> CmdResult {
    let registry = load_registry(config)?;
    let settings = registry.settings();

    for endpoint in registry.endpoints() {
        startup_checks(settings, endpoint.clone_abi)?;
        println!("{}/{}: ok ({:?} clones)", endpoint.chain, endpoint.network, endpoint.clone_abi);
    }

    let selectors = SelectorRegistry::canonical();
    for entry in selectors.entries() {
        println!("{} {}", entry.selector, entry.signature);
    }
    println!("checksum: {}", selectors.checksum());
    Ok(())
}
