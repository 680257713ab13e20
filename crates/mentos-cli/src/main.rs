//! Mentos server
//!
//! Loads `mentos.json`, applies command line overrides and serves the
//! mentoring API until Ctrl+C.

use std::future::Future;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use mentos_api::{create_router, AppState, Config};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// Mentos - mentoring request service
///
/// Serves the mentoring lifecycle and complaint endpoints behind an
/// authenticating gateway that forwards the caller's member id.
#[derive(Parser, Debug)]
#[command(name = "mentos")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (default: mentos.json in current directory)
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Address to bind to, overriding the config file
    #[arg(long, value_name = "HOST")]
    host: Option<String>,

    /// Port to listen on, overriding the config file
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if args.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Mentos starting");
    tracing::debug!(config = ?args.config, "Config file");

    match run_server(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

/// Runs the HTTP server until shutdown is requested.
async fn run_server(args: Args) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;

    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    // Re-validate after overrides
    config.validate()?;

    print_config(&config);

    let addr = config.bind_address();
    let state = AppState::new(config)?;
    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await.map_err(|e| {
        anyhow::anyhow!(
            "Failed to bind to {addr}: {e}\n\nSuggestion: Try a different port with --port"
        )
    })?;

    println!("Mentos API running on http://{addr}");
    println!("Press Ctrl+C to stop");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Mentos stopped");
    Ok(())
}

/// Loads configuration from the specified path or `mentos.json` in the
/// current directory.
fn load_config(config_path: Option<&str>) -> anyhow::Result<Config> {
    match config_path {
        Some(path_str) => {
            let path = Path::new(path_str);
            if !path.exists() {
                anyhow::bail!(
                    "Config file not found: '{}'\n\nSuggestion: Check the path or remove the --config flag to use defaults",
                    path.display()
                );
            }
            Config::load_from_file(path).map_err(|e| anyhow::anyhow!("{e}"))
        }
        None => Config::load_from_dir(Path::new(".")).map_err(|e| anyhow::anyhow!("{e}")),
    }
}

/// Resolves when Ctrl+C is received.
async fn shutdown_signal() {
    wait_for_signal(tokio::signal::ctrl_c()).await;
}

/// Resolves when `signal` fires. If the listener cannot be installed the
/// server keeps running and this never resolves.
async fn wait_for_signal(signal: impl Future<Output = std::io::Result<()>>) {
    if let Err(e) = signal.await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal; stop the process externally");
        std::future::pending::<()>().await;
    }
    println!();
    tracing::info!("Shutdown requested");
}

/// Prints the loaded configuration.
fn print_config(config: &Config) {
    println!("Configuration loaded:");
    println!("  Bind address: {}", config.bind_address());
    println!("  Identity header: {}", config.identity_header);
    println!("  Complaint recipient: {}", config.complaint_recipient);
    println!("  Seeded members: {}", config.members.len());
}
