use anyhow::{Context, Result};
use axum::{routing::get, Router};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

pub mod handlers;
pub mod state;

pub use self::state::AppState;
use handlers::{
    get_earthquakes, get_grayscale_tile, get_legend, get_map_layout, index_html, script_js,
    style_css,
};

// Create the main application router
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_html))
        .route("/style.css", get(style_css))
        .route("/script.js", get(script_js))
        .route("/api/map", get(get_map_layout))
        .route("/api/legend", get(get_legend))
        .route("/api/earthquakes", get(get_earthquakes))
        .route("/tiles/grayscale/:z/:x/:y", get(get_grayscale_tile))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(state: AppState, port: u16, open_browser: bool) -> Result<()> {
    let app = create_app(state);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    let url = crate::utils::map_url(addr);
    tracing::info!("🌐 Earthquake map available at {}", url);
    tracing::info!("   GET /api/map          - map layout");
    tracing::info!("   GET /api/earthquakes  - live overlay (one feed fetch per call)");
    tracing::info!("   GET /tiles/grayscale/{{z}}/{{x}}/{{y}} - grayscale street tiles");

    if open_browser {
        if let Err(e) = crate::utils::open_browser(&url) {
            tracing::warn!("Could not open browser: {:#}", e);
        }
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("🛑 Shutting down");
}
