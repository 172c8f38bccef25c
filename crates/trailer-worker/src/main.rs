//! Runs one trailer job in the foreground.
//!
//! Usage: `trailer-worker s3://bucket/movie.mp4 [max_clips]`

use anyhow::{bail, Context};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use trailer_storage::StoreLocator;
use trailer_worker::{JobOutcome, JobRunner, TrailerJob, WorkerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Install rustls crypto provider (required for TLS/HTTPS)
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install rustls crypto provider"))?;

    dotenvy::dotenv().ok();
    init_tracing()?;

    let mut args = std::env::args().skip(1);
    let Some(source) = args.next() else {
        bail!("usage: trailer-worker <s3://bucket/key> [max_clips]");
    };
    let source = StoreLocator::parse(&source).context("invalid source locator")?;
    let max_clips = args
        .next()
        .map(|s| s.parse::<i64>())
        .transpose()
        .context("max_clips must be an integer")?;

    let config = WorkerConfig::from_env();
    info!("Worker config: {:?}", config);

    let job = TrailerJob::new(source, config.output_dir.clone()).with_max_clips(max_clips);
    let runner = JobRunner::from_env(config).await?;

    let report = runner.run(&job).await;
    match report.outcome {
        JobOutcome::Published { locator } => {
            println!("{}", locator);
            Ok(())
        }
        JobOutcome::Failed { stage, reason } => bail!("job {} failed at {}: {}", report.job_id, stage, reason),
    }
}

fn init_tracing() -> anyhow::Result<()> {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env().add_directive("trailer=info".parse()?);

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(true).with_target(true))
            .with(env_filter)
            .init();
    }
    Ok(())
}
