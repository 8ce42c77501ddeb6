//! Daemon mode: scheduled ingestion plus the REST API.

use super::build_ingestor;
use anyhow::Result;
use playwatch_collector::{CycleRunner, IngestionScheduler};
use playwatch_core::ConfigLoader;
use playwatch_growth::StatsQueries;
use playwatch_web_api::{ApiServer, AppState};
use std::sync::Arc;
use tokio::signal::unix::{signal, SignalKind};

/// Runs until SIGINT or SIGTERM.
///
/// # Errors
/// Returns an error if configuration, the client, the scheduler or the
/// signal handlers cannot be set up.
pub async fn run_daemon(config_path: &str) -> Result<()> {
    tracing::info!(config = config_path, "Starting play-count monitor daemon");

    let config = ConfigLoader::load_from(config_path)?;
    let runner: Arc<dyn CycleRunner> = build_ingestor(&config)?;

    let mut scheduler = IngestionScheduler::new(config.ingestion.clone(), runner.clone());
    scheduler.start().await?;

    let queries = Arc::new(StatsQueries::from_config(&config.storage));
    let server = ApiServer::new(AppState::new(queries, runner));
    let addr = config.server.bind_addr();

    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let server_handle = tokio::spawn(async move {
        let shutdown = async {
            let _ = stop_rx.await;
        };
        if let Err(e) = server.serve_with_shutdown(&addr, shutdown).await {
            tracing::error!("Server error: {}", e);
        }
    });

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    tokio::select! {
        _ = sigterm.recv() => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
        _ = sigint.recv() => {
            tracing::info!("Received SIGINT (Ctrl+C), initiating graceful shutdown");
        }
    }

    if let Err(e) = scheduler.stop().await {
        tracing::error!("Error stopping scheduler: {}", e);
    }
    let _ = stop_tx.send(());
    if let Err(e) = server_handle.await {
        tracing::error!("Server task failed: {}", e);
    }

    tracing::info!("Play-count monitor daemon stopped");
    Ok(())
}
