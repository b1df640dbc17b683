//! asa-mint
//!
//! Creates one Algorand Standard Asset and waits for it to be confirmed.
//!
//! # Flow
//!
//! ```text
//!   config file + env ──▶ MintConfig
//!   ASA_MINT_API_TOKEN ─▶ AlgodClient ─────────────┐
//!   ASA_MINT_MNEMONIC ──▶ Wallet ──────────────────┤
//!                                                  ▼
//!        suggested params → build → sign → submit → wait for round
//! ```
//!
//! Progress goes to stdout, logs to stderr. Every step runs to completion
//! before the next starts; the first error ends the run.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use asa_mint::blockchain::{AlgodClient, Wallet};
use asa_mint::config;
use asa_mint::mint::{MintError, MintEvent, Minter};
use asa_mint::observability;

#[derive(Parser)]
#[command(name = "asa-mint")]
#[command(about = "Create an Algorand Standard Asset and wait for confirmation", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Build and sign, print the transaction id, but do not submit.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // No-op unless the run failed before logging was set up.
            observability::init_logging(observability::DEFAULT_LOG_LEVEL);
            tracing::error!(error = %e, "Mint failed");
            println!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), MintError> {
    let config = config::load(cli.config.as_deref())?;
    observability::init_logging(&config.observability.log_level);

    tracing::info!(
        node = %config.node.address,
        max_rounds = config.confirmation.max_rounds,
        timeout_secs = config.confirmation.timeout_secs,
        dry_run = cli.dry_run,
        "asa-mint v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    let client = AlgodClient::new(config.node.clone(), AlgodClient::token_from_env())?;
    println!("Algod client created");

    let wallet = Wallet::from_env()?;
    println!("Private key recovered from mnemonic");

    let minter = Minter::new(&client, &wallet, &config);
    let outcome = minter.mint(cli.dry_run, print_progress).await?;

    match &outcome.confirmation {
        Some(confirmation) => {
            println!(
                "Transaction {} confirmed in round {}",
                confirmation.tx_id, confirmation.confirmed_round
            );
            if let Some(index) = outcome.asset_index() {
                println!("Created asset ID: {}", index);
            }
        }
        None => println!("Dry run: transaction {} was not submitted", outcome.tx_id),
    }

    Ok(())
}

fn print_progress(event: MintEvent) {
    match event {
        MintEvent::ParamsFetched {
            first_valid,
            last_valid,
        } => println!("Suggested params fetched (valid rounds {}-{})", first_valid, last_valid),
        MintEvent::Signed { tx_id, fee } => {
            println!("Transaction {} signed (fee {} microAlgos)", tx_id, fee)
        }
        MintEvent::Submitted { tx_id } => println!("Transaction successful with ID: {}", tx_id),
        MintEvent::WaitingForConfirmation { round, .. } => {
            println!("Waiting for confirmation... (round {})", round)
        }
    }
}
