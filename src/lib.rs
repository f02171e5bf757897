pub mod config;
pub mod domain;
pub mod usecases;

use anyhow::Result;

/// Installs the global tracing subscriber for binaries embedding the engine.
pub fn init_tracing() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to init tracing subscriber: {}", error))?;

    Ok(())
}
