//! Supervisor binary: runs several demo characters against sandbox worlds.
mod config;
mod scenario;
mod supervisor;

use std::sync::Arc;

use anyhow::{Context, Result};
use config::CliConfig;
use runtime::{EngineConfig, MonsterStateTracker, Session};
use supervisor::Supervisor;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = CliConfig::from_env();
    let _guard = setup_logging(&config)?;

    let engine = match &config.engine_config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading engine config from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let tracker = Arc::new(MonsterStateTracker::from_config(&engine.combat));

    let mut supervisor = Supervisor::new();
    for index in 0..config.sessions {
        let session = Session::builder()
            .name(format!("char-{index}"))
            .world(scenario::build_world(index))
            .routine(scenario::DemoRoutine)
            .tracker(tracker.clone())
            .config(engine.clone())
            .build()?;
        supervisor.spawn(session, scenario::run);
    }

    let reports = supervisor.wait().await?;
    let failed = reports
        .iter()
        .filter(|report| report.outcome.as_ref().is_err_and(|err| !err.is_terminal()))
        .count();
    tracing::info!(
        "{} sessions done, {} failed, {} monster states tracked",
        reports.len(),
        failed,
        tracker.len()
    );

    Ok(())
}

/// Setup logging to both stderr and a file under the configured log directory.
fn setup_logging(config: &CliConfig) -> Result<WorkerGuard> {
    std::fs::create_dir_all(&config.log_dir)
        .with_context(|| format!("creating log directory {}", config.log_dir.display()))?;

    let file_appender = tracing_appender::rolling::daily(&config.log_dir, "warden.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    tracing::info!("Log file: {}/warden.log", config.log_dir.display());
    Ok(guard)
}
