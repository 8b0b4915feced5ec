//! HealthSync CLI and chat proxy entry point.
//!
//! Binary name: `healthsync`
//!
//! Parses CLI arguments, sets up tracing, loads `config.toml`, then
//! dispatches to the proxy server, the terminal chat or a facility search.

mod cli;
mod http;
mod state;

use clap::Parser;

use cli::{Cli, Commands};
use healthsync_infra::config::{load_global_config, resolve_data_dir};
use healthsync_observe::tracing_setup::{TracingOptions, filter_for_verbosity, init_tracing, shutdown_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(&TracingOptions {
        default_filter: filter_for_verbosity(cli.verbose, cli.quiet).to_string(),
        json: cli.json,
        enable_otel: cli.otel,
    })
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let data_dir = resolve_data_dir();
    let config = load_global_config(&data_dir).await;
    tracing::debug!(data_dir = %data_dir.display(), "configuration loaded");

    let result = match cli.command {
        Commands::Serve(args) => cli::serve::run(args, &config.server).await,
        Commands::Chat(args) => cli::chat::loop_runner::run_chat_loop(args, &config, &data_dir).await,
        Commands::Facilities(args) => {
            cli::facilities::run(args, &config.places, config.chat.facility_radius_m, cli.json).await
        }
    };

    shutdown_tracing();
    result
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
