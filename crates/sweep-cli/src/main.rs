//! # clonesweep CLI
//!
//! Entry point for the `clonesweep` binary.
//!
//! Subcommands:
//! - `clonesweep withdraw`     — Withdraw one asset from one clone
//! - `clonesweep sweep`        — Sweep many clones through the factory from a batch file
//! - `clonesweep status`       — Look up a transaction
//! - `clonesweep check-abi`    — Verify the selector registry and deployed ABI
//! - `clonesweep predict`      — Predict a clone address
//! - `clonesweep create-clone` — Deploy a clone through the factory

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sweep_core::SweepError;
use tracing_subscriber::EnvFilter;

mod commands;

/// clonesweep — sweep funds out of clone wallets on EVM chains and Tron.
#[derive(Parser)]
#[command(name = "clonesweep", version, about)]
struct Cli {
    /// Path to sweep.yaml (default: ~/.clonesweep/sweep.yaml).
    #[arg(long, short, global = true, env = "CLONESWEEP_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Withdraw an asset from a single clone to a recipient.
    Withdraw {
        /// Chain identifier: ETH, BSC or TRX.
        chain: String,
        /// Network name as registered, e.g. SEPOLIA.
        network: String,
        /// Token symbol as registered for the network.
        token: String,
        /// Clone address in the chain's format.
        clone: String,
        /// Amount in atomic units (or whole units with --decimal).
        amount: String,
        /// Recipient address in the chain's format.
        recipient: String,
        /// Interpret the amount as a decimal in whole units.
        #[arg(long)]
        decimal: bool,
    },

    /// Sweep many clones through the factory, one asset per pass.
    Sweep {
        /// Batch file with chain, network, asset, recipient and items.
        #[arg(long, short)]
        file: PathBuf,
        /// Override settings.max_chunk for this run.
        #[arg(long)]
        max_chunk: Option<usize>,
    },

    /// Show the status of a transaction.
    Status {
        chain: String,
        network: String,
        /// Transaction hash (Tron txID).
        hash: String,
        /// Wait for the configured confirmation depth.
        #[arg(long)]
        wait: bool,
    },

    /// Verify the selector registry and, if configured, the deployed ABI.
    CheckAbi,

    /// Predict the address of a clone for a salt.
    Predict {
        chain: String,
        network: String,
        /// 0x-prefixed 32-byte salt, or a label of up to 32 bytes.
        salt: String,
    },

    /// Deploy a clone through the factory.
    CreateClone {
        chain: String,
        network: String,
        /// 0x-prefixed 32-byte salt, or a label of up to 32 bytes.
        salt: String,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    init_logging();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Withdraw {
            chain,
            network,
            token,
            clone,
            amount,
            recipient,
            decimal,
        } => {
            let args = commands::withdraw::WithdrawArgs {
                chain,
                network,
                token,
                clone,
                amount,
                recipient,
                decimal,
            };
            commands::withdraw::run(config, args).await
        }
        Commands::Sweep { file, max_chunk } => commands::sweep::run(config, file, max_chunk).await,
        Commands::Status {
            chain,
            network,
            hash,
            wait,
        } => commands::status::run(config, chain, network, hash, wait).await,
        Commands::CheckAbi => commands::check_abi::run(config),
        Commands::Predict {
            chain,
            network,
            salt,
        } => commands::clone::predict(config, chain, network, salt).await,
        Commands::CreateClone {
            chain,
            network,
            salt,
        } => commands::clone::create(config, chain, network, salt).await,
    };

    if let Err(e) = result {
        match e.downcast_ref::<SweepError>() {
            Some(err) => eprintln!("error[{}]: {err}", err.taxonomy()),
            None => eprintln!("error: {e}"),
        }
        std::process::exit(1);
    }
}
