mod config;
mod logging;
mod server;
mod signals;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use edge_api::EdgeApiModule;
use mimalloc::MiMalloc;
use tokio_util::sync::CancellationToken;

use crate::config::{AppConfig, CliOverrides};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Edge Server - arithmetic and current-value HTTP API
#[derive(Parser)]
#[command(name = "edge-server")]
#[command(about = "Edge Server - arithmetic and current-value HTTP API")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port override for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print effective configuration (YAML) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Keep state in process memory instead of the remote store
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Validate configuration and exit
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(ref path) = cli.config
        && !Path::new(path).is_file()
    {
        anyhow::bail!("config file does not exist: {}", path.display());
    }

    // Layered config:
    // 1) defaults -> 2) YAML (if provided) -> 3) env (APP__*) -> 4) CLI overrides
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_cli_overrides(&CliOverrides {
        port: cli.port,
        verbose: cli.verbose,
        mock: cli.mock,
    })?;

    logging::init_logging(&config.logging)?;

    if cli.print_config {
        println!("Effective configuration:\n{}", config.to_yaml()?);
        return Ok(());
    }

    // Dispatch subcommands (default: run)
    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(config),
    }
}

fn check_config(config: AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    let yaml = config.to_yaml()?;

    config.server.socket_addr()?;
    let module =
        EdgeApiModule::from_config(config.edge_api).context("edge_api configuration is invalid")?;
    tracing::debug!(backend = module.backend(), "state store constructed");

    println!("Configuration is valid");
    println!("{yaml}");
    Ok(())
}

async fn run_server(config: AppConfig) -> Result<()> {
    tracing::info!("Edge Server starting");

    let module = EdgeApiModule::from_config(config.edge_api)
        .context("failed to initialize edge_api module")?;
    let router = server::build_router(&module, &config.server);

    let cancel = CancellationToken::new();
    tokio::spawn(signals::cancel_on_shutdown(cancel.clone()));

    server::serve(router, &config.server, cancel).await?;

    tracing::info!("Edge Server stopped");
    Ok(())
}
