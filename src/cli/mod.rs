use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use crate::config;
use crate::database::DatabaseManager;
use crate::middleware::IpRateLimiter;
use crate::server;
use crate::state::AppState;

#[derive(Parser)]
#[command(name = "jobbee-api")]
#[command(about = "Jobbee job board API server")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Port to listen on (overrides PORT)")]
        port: Option<u16>,
        #[arg(long, help = "Address to bind (overrides HOST)")]
        host: Option<String>,
    },

    #[command(about = "Apply database migrations and exit")]
    Migrate,
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command.unwrap_or(Commands::Serve { port: None, host: None }) {
        Commands::Serve { port, host } => serve(host, port).await,
        Commands::Migrate => migrate().await,
    }
}

async fn migrate() -> anyhow::Result<()> {
    let db = DatabaseManager::connect_lazy(&config::config().database).context("cannot open database pool")?;
    db.migrate().await.context("migration failed")?;
    db.close().await;
    Ok(())
}

async fn serve(host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let config = config::config();
    info!("Starting Jobbee API in {:?} mode", config.environment);

    let state = AppState::from_config(config).context("cannot open database pool")?;
    if config.database.run_migrations {
        if let Err(e) = state.db.migrate().await {
            warn!("Migrations not applied at boot: {}", e);
        }
    }

    let limiter = config.api.enable_rate_limiting.then(|| {
        let limiter = IpRateLimiter::from_config(&config.api);
        let cleanup = limiter.clone();
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(Duration::from_secs(60));
            loop {
                tick.tick().await;
                cleanup.retain_recent();
            }
        });
        limiter
    });

    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);
    let bind_addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    info!("Jobbee API listening on http://{}", bind_addr);

    let db = state.db.clone();
    let app = server::app(state, limiter);
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    db.close().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Cannot listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Cannot listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
