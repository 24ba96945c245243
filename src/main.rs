use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

mod constants;
mod feed;
mod html_template;
mod image_processing;
mod map_layout;
mod markers;
mod server;
mod settings;
mod utils;

use server::{start_server, AppState};
use settings::Settings;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("quakemap=info,tower_http=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    tracing::info!("🗺️  QuakeMap v{} starting...", env!("CARGO_PKG_VERSION"));

    let settings = Settings::load().context("Failed to load settings")?;
    tracing::info!(
        "🎛️  Grayscale weights {}/{}/{} (divider {})",
        settings.quotas.red,
        settings.quotas.green,
        settings.quotas.blue,
        settings.quotas.divider()
    );

    if !Settings::config_path().exists() {
        if let Err(e) = settings.save() {
            tracing::warn!("Could not write default config: {:#}", e);
        } else {
            tracing::info!("📝 Wrote default config to {}", Settings::config_path().display());
        }
    }

    let state = AppState::new(&settings)?;
    tracing::info!("📡 Feed: {}", state.feed.feed_url());
    if let Some(base) = state.layout.visible_base_layer() {
        tracing::info!("🗺️  Initial base layer: {}", base.name);
    }
    start_server(state, settings.port, settings.auto_open_browser).await
}
