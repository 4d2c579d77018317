//! Linear relay binary.
//!
//! Standalone HTTP service relaying Linear webhooks and digests to Discord.

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use linear_relay::{config::Config, server};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("linear_relay=info".parse()?))
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;

    if config.linear_api_key.is_some() {
        info!("Linear API key configured - report endpoints enabled");
    }

    let addr = format!("0.0.0.0:{}", config.port);
    let state = server::AppState::new(config).context("Failed to create Linear client")?;

    server::run_server(state, &addr).await
}
