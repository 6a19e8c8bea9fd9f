//! Hold'em table server using the async actor model.
//!
//! Each room started through the API runs in its own table actor, managed
//! by a shared `TableManager`.

use std::net::SocketAddr;

use anyhow::Error;
use he_server::{
    api::{self, AppState},
    config::ServerConfig,
    logging,
};
use holdem_engine::{Environment, TableManager};
use pico_args::Arguments;
use tracing::info;

const HELP: &str = "\
Run a hold'em table server

USAGE:
  he_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:6969]
  --env        ENV         Engine pacing, dev or prod  [default: env ENGINE_ENV or dev]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND              Server bind address (e.g., 0.0.0.0:8080)
  ENGINE_ENV               dev or prod
  TABLE_MAX_PLAYERS        Seats per table, 2 to 9
  TIMEBANK_TOTAL           Starting time bank in seconds
  RUST_LOG                 Log filter (e.g., info,holdem_engine=debug)
";

struct Args {
    bind: Option<SocketAddr>,
    environment: Option<Environment>,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        bind: pargs.opt_value_from_str("--bind")?,
        environment: pargs.opt_value_from_str("--env")?,
    };

    logging::init();

    let config = ServerConfig::from_env(args.bind, args.environment)?;
    info!(
        "Starting table server at {} ({} pacing)",
        config.bind, config.environment
    );

    let table_manager = TableManager::new(config.engine_timing());
    let state = AppState::new(table_manager.clone(), config.table_defaults);
    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", config.bind, e))?;

    info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    info!("Shutting down server...");
    for table in table_manager.list_tables().await {
        if let Err(e) = table_manager.close_table(&table.room_name).await {
            tracing::warn!("Failed to close table '{}': {}", table.room_name, e);
        }
    }

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install CTRL+C signal handler: {}", e);
        std::future::pending::<()>().await;
    }
}
