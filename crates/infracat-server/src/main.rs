use std::env;

use anyhow::Result;
use clap::{Parser, Subcommand};
use infracat_server::config::loader::load_config;
use infracat_server::observability::{apply_logging_level, init_tracing};
use infracat_server::output::{print_error, print_refresh_summary, print_success};
use infracat_server::{AppConfig, Runtime, build_runtime};
use tokio::sync::watch;

#[derive(Parser)]
#[command(name = "infracat")]
#[command(about = "Keeps a metadata catalog in step with live infrastructure")]
#[command(version)]
struct Cli {
    /// Configuration file (overrides INFRACAT_CONFIG, default infracat.toml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile on the configured interval until Ctrl-C
    Run,
    /// Reconcile every monitored parent once and print the outcome
    Refresh,
    /// Load and validate the configuration, then print it
    CheckConfig,
}

/// How the configuration path was determined.
#[derive(Debug, Clone, Copy)]
enum ConfigSource {
    CliArgument,
    EnvironmentVariable,
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CliArgument => write!(f, "CLI argument (--config)"),
            Self::EnvironmentVariable => write!(f, "environment variable (INFRACAT_CONFIG)"),
            Self::Default => write!(f, "default"),
        }
    }
}

#[tokio::main]
async fn main() {
    // Load .env file if present (before anything else)
    if let Err(e) = dotenvy::dotenv() {
        if !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound) {
            eprintln!("Warning: Failed to load .env file: {e}");
        }
    }

    init_tracing();

    let cli = Cli::parse();
    let (config_path, source) = resolve_config_path(cli.config);

    let cfg = match load_config(Some(&config_path)) {
        Ok(c) => c,
        Err(e) => {
            print_error(&format!("Configuration error: {e}"));
            std::process::exit(2);
        }
    };

    tracing::info!(
        path = %config_path,
        source = %source,
        "Configuration loaded"
    );
    apply_logging_level(&cfg.logging.level);

    if let Err(e) = run(cli.command, cfg).await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run(command: Commands, cfg: AppConfig) -> Result<()> {
    match command {
        Commands::CheckConfig => {
            println!("{}", toml::to_string_pretty(&cfg)?);
            print_success("Configuration is valid");
        }
        Commands::Refresh => {
            let runtime = build_runtime(&cfg).await?;
            start(&runtime).await;
            let summary = runtime.controller.refresh().await;
            print_refresh_summary(&summary);
            runtime.controller.disconnect().await;
        }
        Commands::Run => {
            let runtime = build_runtime(&cfg).await?;
            start(&runtime).await;

            let (shutdown_tx, shutdown_rx) = watch::channel(false);
            tokio::spawn(async move {
                match tokio::signal::ctrl_c().await {
                    Ok(()) => {
                        tracing::info!("Shutdown signal received");
                        let _ = shutdown_tx.send(true);
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Unable to listen for Ctrl-C");
                        // Keep the sender alive so the loop is not stopped.
                        std::future::pending::<()>().await;
                    }
                }
            });

            runtime.controller.run(runtime.schedule, shutdown_rx).await;
            runtime.controller.disconnect().await;
        }
    }
    Ok(())
}

/// A failed startup sweep leaves the controller running with the parents
/// that events deliver later.
async fn start(runtime: &Runtime) {
    match runtime.controller.start().await {
        Ok(added) => tracing::info!(parents = added, "Startup sweep complete"),
        Err(e) => tracing::warn!(error = %e, "Controller started with errors"),
    }
}

/// Resolve the configuration file path.
///
/// Priority order:
/// 1. CLI argument: --config <path>
/// 2. Environment variable: INFRACAT_CONFIG
/// 3. Default: infracat.toml
fn resolve_config_path(cli_path: Option<String>) -> (String, ConfigSource) {
    if let Some(path) = cli_path {
        return (path, ConfigSource::CliArgument);
    }
    if let Ok(path) = env::var("INFRACAT_CONFIG")
        && !path.is_empty()
    {
        return (path, ConfigSource::EnvironmentVariable);
    }
    ("infracat.toml".to_string(), ConfigSource::Default)
}
