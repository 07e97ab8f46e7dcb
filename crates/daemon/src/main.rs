//! Deployq Daemon - Main Entry Point
//! JSON-RPC server + idle reminder relay over a single in-memory queue

mod config;

use anyhow::Result;
use config::{DaemonConfig, LogFormat};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use deployq_api_rpc::RpcServer;
use deployq_core::application::{shared_queue, DeployDesk, TurnNotifier};
use deployq_core::port::time_provider::SystemTimeProvider;
use deployq_infra_memory::{InMemoryDirectory, InMemoryMailbox};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration
    let config = DaemonConfig::from_env()?;

    // 2. Initialize logging
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("deployq=info"))?;

    match config.log_format {
        LogFormat::Json => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        LogFormat::Pretty => {
            // Development: Pretty formatting with colors
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }

    info!("Deployq daemon v{} starting...", VERSION);
    info!(
        idle_timeout_secs = config.desk.idle_timeout.as_secs(),
        command_prefix = %config.desk.command_prefix,
        "Desk configured"
    );

    // 3. Setup dependencies (DI wiring)
    let queue = shared_queue();
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let notifier = Arc::new(TurnNotifier::new(
        queue.clone(),
        events_tx,
        Arc::new(SystemTimeProvider),
    ));
    let directory = Arc::new(InMemoryDirectory::new());
    let mailbox = Arc::new(InMemoryMailbox::default());

    let desk = Arc::new(DeployDesk::new(
        queue,
        notifier,
        directory.clone(),
        mailbox.clone(),
        config.desk.clone(),
    ));

    // 4. Start reminder relay (notifier events -> direct messages)
    let relay_desk = desk.clone();
    let relay_handle = tokio::spawn(async move {
        relay_desk.relay(events_rx).await;
    });

    // 5. Start JSON-RPC server
    info!("Starting JSON-RPC server...");
    let rpc_server = RpcServer::new(config.rpc.clone(), desk, directory, mailbox);
    let rpc_handle = rpc_server
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("RPC server start failed: {}", e))?;

    info!("System ready. Waiting for deploy commands...");
    info!("Press Ctrl+C to shutdown");

    // 6. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    // 7. Graceful shutdown (queue is not persisted)
    rpc_handle
        .stop()
        .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;
    rpc_handle.stopped().await;
    relay_handle.abort();

    info!("Shutdown complete.");

    Ok(())
}
