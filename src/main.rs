use anyhow::Result;
use idp_registry::{config::Config, server, telemetry};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    // Initialize tracing and metrics
    let prometheus_handle = telemetry::init(&config.telemetry);

    info!("Starting IdP Registry Service");
    info!("HTTP server listening on {}", config.http_addr());

    // Run the server
    server::run(config, prometheus_handle).await
}
