//! Docket server binary.

use anyhow::{Context, Result};
use clap::Parser;
use docket_core::config::AppConfig;
use docket_events::{AmqpEventSource, Reconciler, spawn_consumers, spawn_sweeper};
use docket_metadata::{FileCache, FileRepository};
use docket_server::{AppState, create_router};
use docket_staging::StagingArea;
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Docket - document file lifecycle service
#[derive(Parser, Debug)]
#[command(name = "docketd")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(
        short,
        long,
        env = "DOCKET_CONFIG",
        default_value = "config/docket.toml"
    )]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Docket v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration (file is optional, env vars can provide/override everything)
    let config_path = std::path::Path::new(&args.config);
    let mut figment = Figment::new();
    let has_config_file = config_path.exists();

    if has_config_file {
        tracing::info!(config_path = %args.config, "Loading configuration from file");
        figment = figment.merge(Toml::file(&args.config));
    } else {
        tracing::debug!("No config file found at {}", args.config);
    }

    let has_env_config =
        std::env::vars().any(|(key, _)| key.starts_with("DOCKET_") && key != "DOCKET_CONFIG");

    if !has_config_file && !has_env_config {
        anyhow::bail!(
            "No configuration provided.\n\n\
             Provide configuration via one of:\n  \
             1. Config file: docketd --config /path/to/docket.toml\n  \
             2. Environment variables: DOCKET_METADATA__PATH=data/docket.db \
             DOCKET_ENCRYPTION__SECRET=... docketd\n\n\
             See config/docket.example.toml for example configuration."
        );
    }

    let config: AppConfig = figment
        .merge(Env::prefixed("DOCKET_").split("__"))
        .extract()
        .context("failed to load configuration")?;

    // Initialize metadata store (runs migrations)
    let store = docket_metadata::from_config(&config.metadata)
        .await
        .context("failed to initialize metadata store")?;
    store
        .health_check()
        .await
        .context("metadata store health check failed")?;
    tracing::info!("Metadata store initialized");

    // Initialize staging area
    let staging = Arc::new(
        StagingArea::new(&config.staging.path)
            .await
            .context("failed to initialize staging area")?,
    );
    tracing::info!(path = %config.staging.path.display(), "Staging area initialized");

    // Compose cache + repository
    let cache = Arc::new(FileCache::new());
    let repo = Arc::new(FileRepository::new(
        store.clone(),
        cache,
        config.metadata.op_timeout(),
    ));

    // Reconciliation pipeline: two consumers + retention sweep
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let reconciler = Arc::new(Reconciler::new(
        repo.clone(),
        staging.clone(),
        config.encryption.secret.clone(),
    ));
    let source = Arc::new(AmqpEventSource::new(
        config.events.url.clone(),
        "docket",
    ));
    let mut tasks = spawn_consumers(source, reconciler.clone(), &config.events, shutdown_rx.clone());
    tracing::info!(
        approved_queue = %config.events.approved_queue,
        delete_queue = %config.events.delete_queue,
        "Event consumers spawned"
    );

    tasks.push(spawn_sweeper(
        reconciler,
        config.retention.clone(),
        shutdown_rx,
    ));
    tracing::info!(
        max_age_hours = config.retention.max_age_hours,
        interval_secs = config.retention.sweep_interval_secs,
        "Retention sweep scheduled"
    );

    // Create router and serve
    let state = AppState::new(config.clone(), repo, staging, store);
    let app = create_router(state);

    let addr: SocketAddr = config.server.bind.parse().context("invalid bind address")?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
        })
        .await?;

    // Stop the pipeline; backoff sleeps and idle consumers are interruptible.
    let _ = shutdown_tx.send(true);
    for task in tasks {
        let _ = task.await;
    }
    tracing::info!("Shutdown complete");

    Ok(())
}
