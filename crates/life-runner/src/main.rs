//! Command-line driver for the Game of Life engine.
//!
//! Configuration comes from `LIFE_*` environment variables; an optional first
//! argument names a saved game to resume.

mod checkpoint;
mod driver;
mod telemetry;

use anyhow::Result;
use life_core::RunnerConfig;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let mut config = RunnerConfig::from_env()?;
    if let Some(path) = std::env::args().nth(1) {
        config.state_path = Some(path);
    }

    // Initialize telemetry
    telemetry::init_telemetry(config.log_format)?;

    info!(
        rule = %config.simulation.rule,
        pattern = %config.pattern,
        max_generations = config.simulation.max_generations,
        "Starting Game of Life runner"
    );

    let mut driver = driver::Driver::new(config)?;
    let seed = driver.seed().await?;
    info!(?seed, "Simulation seeded");

    let summary = driver.run(shutdown_signal()).await?;
    driver.save().await?;

    let bounds = driver.simulation().snapshot().bounds;
    info!(width = bounds.width, height = bounds.height, "Final extent");

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
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
