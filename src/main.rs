//! Provider failover orchestrator service

use anyhow::Context;
use clap::Parser;
use provider_failover::config::Config;
use provider_failover::server;
use provider_failover::utils::logging::init_tracing;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "orchestrator", version, about = "Multi-provider failover orchestrator")]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(
        short,
        long,
        env = "ORCHESTRATOR_CONFIG",
        default_value = "config/orchestrator.yaml"
    )]
    config: PathBuf,

    /// Print the effective configuration, credentials masked, and exit
    #[arg(long)]
    check: bool,
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::from_file(&cli.config)
        .await
        .with_context(|| format!("loading {}", cli.config.display()))?;
    init_tracing(&config.logging);

    if cli.check {
        let mut effective = config.clone();
        effective.providers = config.providers.iter().map(|p| p.redacted()).collect();
        println!("{}", effective.to_yaml()?);
        return Ok(());
    }

    info!(
        version = provider_failover::VERSION,
        config = %cli.config.display(),
        "Starting provider failover orchestrator"
    );
    server::run_server(config).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Alternate form prints the whole context chain
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
