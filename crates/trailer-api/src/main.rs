//! Axum API server binary.

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use trailer_api::{create_router, metrics, ApiConfig, AppState};
use trailer_worker::WorkerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Install rustls crypto provider (required for rustls 0.23+)
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install rustls crypto provider"))?;

    let config = ApiConfig::from_env();
    init_tracing(config.is_production())?;
    info!("Starting trailer-api ({})", config.environment);

    let worker_config = WorkerConfig::from_env();
    let shutdown_timeout = worker_config.shutdown_timeout;
    info!("API config: host={}, port={}", config.host, config.port);
    info!("Worker config: {:?}", worker_config);

    let metrics_handle = if config.metrics_enabled {
        info!("Prometheus metrics enabled at /metrics");
        Some(metrics::init_metrics().context("failed to install metrics recorder")?)
    } else {
        None
    };

    let state = AppState::from_env(config.clone(), worker_config)
        .await
        .context("failed to create application state")?;
    let executor = state.executor.clone();

    let app = create_router(state, metrics_handle);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if !executor.drain(shutdown_timeout).await {
        warn!("Shutting down with {} trailer jobs unfinished", executor.in_flight());
    }

    info!("Server shutdown complete");
    Ok(())
}

fn init_tracing(production: bool) -> anyhow::Result<()> {
    // JSON in production unless LOG_FORMAT says otherwise
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(production);

    let env_filter = EnvFilter::from_default_env().add_directive("trailer=info".parse()?);

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}
