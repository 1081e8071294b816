//! Campaign delivery service binary.

use anyhow::Context;
use delivery_server::settings::{LogFormat, LogSettings};
use delivery_server::{Settings, build_state, metrics::init_metrics, run_server_with_state};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load configuration")?;

    init_tracing(&settings.log);

    tracing::info!(
        service = %settings.server.name,
        version = env!("CARGO_PKG_VERSION"),
        "Starting delivery service"
    );

    let addr = settings.server.socket_addr()?;
    let prometheus_handle = init_metrics().context("failed to initialize metrics")?;
    let state = build_state(&settings).await?;

    run_server_with_state(addr, state, prometheus_handle).await?;

    Ok(())
}

/// `RUST_LOG` wins over the configured level.
fn init_tracing(log: &LogSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let registry = tracing_subscriber::registry().with(filter);

    match log.format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}
