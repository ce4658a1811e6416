//! Sizer Daemon
//!
//! Serves the position size calculator over HTTP.
//!
//! # Usage
//!
//! ```bash
//! # Start with default configuration
//! cargo run -p sizerd
//!
//! # Start with the stub price feed on another port
//! SIZER_ENV=test SIZER_API_PORT=8081 cargo run -p sizerd
//! ```
//!
//! # Environment Variables
//!
//! - `SIZER_ENV`: Environment (test, development, production)
//! - `SIZER_API_HOST`: API host (default: 0.0.0.0)
//! - `SIZER_API_PORT`: API port (default: 8080)
//! - `SIZER_DEFAULT_ACCOUNT_BALANCE`: Starting balance (default: 1000)
//! - `SIZER_DEFAULT_RISK_PERCENT`: Starting risk percent (default: 1)
//! - `SIZER_PRICE_FEED_URL`: Price feed root (default: CoinGecko v3)
//! - `SIZER_VS_CURRENCY`: Quote currency (default: usd)
//! - `SIZER_FEED_TIMEOUT_SECS`: Price feed timeout (default: 10)

use sizerd::{Config, Daemon, Environment};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("sizerd=info".parse()?))
        .init();

    // Load configuration
    let config = Config::from_env()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        api_host = %config.api.host,
        api_port = config.api.port,
        feed = %config.feed.base_url,
        "Sizer Daemon"
    );

    match config.environment {
        Environment::Test => Daemon::new_stub(config).run().await?,
        Environment::Development | Environment::Production => Daemon::new_live(config).run().await?,
    }

    Ok(())
}
