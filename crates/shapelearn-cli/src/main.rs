//! ShapeLearn CLI
//!
//! Main entry point for serving the ShapeLearn math API.

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use shapelearn_api::{create_router, AppState, ServerConfig, ServerError, SERVICE_NAME};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// ShapeLearn - 3D number shape math API
///
/// Serves number shape descriptors, addition/subtraction transformation
/// scripts and practice problems to the ShapeLearn frontend.
#[derive(Parser, Debug)]
#[command(name = "shapelearn")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (default: shapelearn.json in current directory)
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Interface to bind (overrides the config file)
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (overrides the config file)
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
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::debug!(config = ?args.config, "Config file");

    match run_server(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

/// Loads configuration, binds the listener and serves until Ctrl+C.
async fn run_server(args: Args) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;

    if let Some(ref host) = args.host {
        config.host.clone_from(host);
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    // Re-validate after overrides
    config.validate()?;

    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .map_err(|e| ServerError::bind(&config.host, config.port, e))?;
    let addr = listener.local_addr().map_err(ServerError::Io)?;

    print_banner(&config, addr.port());
    tracing::info!(
        %addr,
        origins = ?config.allowed_origins(),
        seeded = config.practice_seed.is_some(),
        "Starting {SERVICE_NAME}"
    );

    let router = create_router(AppState::new(config));
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Io)?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Loads configuration from the given path or the current directory.
fn load_config(path: Option<&str>) -> anyhow::Result<ServerConfig> {
    let config = match path {
        Some(p) => ServerConfig::load_from_file(Path::new(p))?,
        None => ServerConfig::load()?,
    };
    Ok(config)
}

fn print_banner(config: &ServerConfig, port: u16) {
    println!("Starting {SERVICE_NAME} on port {port}");
    println!("Health check: http://localhost:{port}/health");
    println!("API endpoints: http://localhost:{port}/api/");
    println!("Allowed origins: {}", config.allowed_origins().join(", "));
    println!("Press Ctrl+C to stop");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
