//! homebeat - Single-host liveness monitor
//!
//! Persists a periodic heartbeat timestamp, reports outage recoveries to a
//! Discord channel after restarts, and answers `!status` queries with live
//! host metrics.

use anyhow::Result;
use clap::Parser;
use homebeat::{
    cli::Cli,
    config::Config,
    core::{Clock, HeartbeatStore, MetricsProvider, Notifier, SystemClock},
    detector::OutageDetector,
    dispatcher::CommandDispatcher,
    gateway::DiscordGatewayClient,
    notification::discord::DiscordNotifier,
    recorder::HeartbeatRecorder,
    store::FileHeartbeatStore,
    system::SystemProbe,
};
use log::{error, info};
use std::{sync::Arc, time::Duration};
use tokio::sync::{mpsc, watch};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration by layering sources: defaults, file, environment, and CLI args.
    let config = Config::load(&cli).unwrap_or_else(|err| {
        // Manually initialize logger for this specific error
        env_logger::init();
        error!("Failed to load configuration: {}", err);
        // Exit if configuration fails, as it's a critical step.
        std::process::exit(1);
    });

    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("homebeat starting up...");

    // Log the loaded configuration settings for visibility
    info!("-------------------- Configuration --------------------");
    info!("Log Level: {}", config.log_level);
    info!("Heartbeat File: {}", config.heartbeat.file.display());
    info!("Heartbeat Interval: {}s", config.heartbeat.interval_seconds);
    info!(
        "Outage Threshold: {}s",
        config.heartbeat.outage_threshold_seconds
    );
    info!("Discord Channel: {}", config.discord.channel_id);
    info!("-------------------------------------------------------");

    // =========================================================================
    // Create Shutdown Channel
    // =========================================================================
    let (shutdown_tx, shutdown_rx) = watch::channel(());

    // =========================================================================
    // 1. Instantiate Services
    // =========================================================================
    let store: Arc<dyn HeartbeatStore> =
        Arc::new(FileHeartbeatStore::new(config.heartbeat.file.clone()));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let notifier: Arc<dyn Notifier> = Arc::new(DiscordNotifier::new(
        config.discord.bot_token.clone(),
        config.discord.channel_id.clone(),
    )?);
    let provider: Arc<dyn MetricsProvider> = Arc::new(SystemProbe::new());

    // =========================================================================
    // 2. Startup Outage Check
    // =========================================================================
    // The detector's single pass, including its re-arm write, must complete
    // before the recorder's first tick is scheduled, so a tick can never
    // overwrite the record before classification reads it.
    let detector = OutageDetector::new(
        store.clone(),
        clock.clone(),
        notifier.clone(),
        chrono::Duration::seconds(config.heartbeat.outage_threshold_seconds as i64),
    );
    detector.run_startup_pass().await;

    // =========================================================================
    // 3. Start the Heartbeat Recorder
    // =========================================================================
    let recorder = HeartbeatRecorder::new(
        store.clone(),
        clock.clone(),
        Duration::from_secs(config.heartbeat.interval_seconds),
    );
    let recorder_task = tokio::spawn(recorder.run(shutdown_rx.clone()));

    // =========================================================================
    // 4. Start the Gateway Client and Command Dispatcher
    // =========================================================================
    let (inbound_tx, inbound_rx) = mpsc::channel(64);

    let gateway = DiscordGatewayClient::new(config.discord.bot_token.clone(), inbound_tx);
    let gateway_task = {
        let shutdown_rx = shutdown_rx.clone();
        tokio::spawn(async move {
            if let Err(e) = gateway.run(shutdown_rx).await {
                error!("Gateway client failed: {}", e);
            }
        })
    };

    let dispatcher = CommandDispatcher::new(
        config.discord.channel_id.clone(),
        inbound_rx,
        provider,
        notifier,
    );
    let dispatcher_task = tokio::spawn(dispatcher.run(shutdown_rx.clone()));

    info!("homebeat initialized successfully. Monitoring host liveness...");

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received. Shutting down gracefully...");

    // Send shutdown signal to all tasks
    shutdown_tx.send(())?;

    // Wait for all tasks to complete
    if let Err(e) = recorder_task.await {
        error!("Recorder task panicked: {:?}", e);
    }
    if let Err(e) = gateway_task.await {
        error!("Gateway task panicked: {:?}", e);
    }
    if let Err(e) = dispatcher_task.await {
        error!("Dispatcher task panicked: {:?}", e);
    }

    info!("All tasks shut down. Exiting.");

    Ok(())
}
