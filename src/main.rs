//! Game Results - score tracking server
//!
//! Saves submitted game results and serves per-difficulty rankings.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use game_results::{
    AppState, InMemoryResultStore, ServerConfig, SqliteResultStore, cors_layer, router,
};
use tracing::{error, info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = ServerConfig::from_env()?;

    match cli.command {
        Command::Serve {
            port,
            host,
            database_url,
            front_origin,
            in_memory,
        } => {
            let mut config = config;
            if let Some(port) = port {
                config = config.with_port(port);
            }
            if let Some(host) = host {
                config = config.with_host(host);
            }
            if let Some(url) = database_url {
                config = config.with_database_url(url);
            }
            if let Some(origin) = front_origin {
                config = config.with_front_origin(origin);
            }
            run_server(config, in_memory).await
        }
        Command::Migrate { database_url } => {
            let config = match database_url {
                Some(url) => config.with_database_url(url),
                None => config,
            };
            run_migrate(config)
        }
    }
}

/// Run the HTTP server
#[instrument(skip(config), fields(bind = %config.bind_addr()))]
async fn run_server(config: ServerConfig, in_memory: bool) -> Result<()> {
    let origin = config.cors_origin()?;

    let state = if in_memory {
        warn!("Using in-memory store; results are lost on shutdown");
        AppState::new(InMemoryResultStore::new())
    } else {
        let store = SqliteResultStore::new(config.database_url().clone());
        // The server keeps listening when the store is down; the schema is
        // prepared on the first request that reaches it.
        match store.run_migrations() {
            Ok(_) => info!(database_url = %config.database_url(), "Connected to store"),
            Err(e) => error!(error = %e, "Failed to connect to store"),
        }
        AppState::new(store)
    };

    let app = router(state).layer(cors_layer(origin));

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!("Server running at http://{}", config.bind_addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Apply pending migrations and exit
#[instrument(skip(config), fields(database_url = %config.database_url()))]
fn run_migrate(config: ServerConfig) -> Result<()> {
    let store = SqliteResultStore::new(config.database_url().clone());
    let applied = store.run_migrations()?;
    info!(applied, "Database is up to date");
    Ok(())
}

/// Resolves when the process receives Ctrl-C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
