//! Aegis Console - Main Entry Point

use aegis_console::backend::{BackendClient, BackendConfig};
use aegis_console::console::Console;
use aegis_console::constants;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting {} v{}...", constants::APP_NAME, constants::APP_VERSION);

    let config = BackendConfig::from_env();
    log::info!("Detection backend: {}", config.base_url);

    let console = Console::new(BackendClient::new(config));
    console.run().await
}
