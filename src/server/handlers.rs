use axum::{
    extract::{Path as AxumPath, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Response},
};
use chrono::{DateTime, Utc};
use rust_embed::RustEmbed;
use serde::Serialize;

use crate::constants::MAX_ZOOM;
use crate::html_template::legend_html;
use crate::image_processing::grayscale_png;
use crate::map_layout::MapLayout;
use crate::markers::{build_overlay, Marker};

use super::state::AppState;

#[derive(RustEmbed)]
#[folder = "frontend/"]
struct Asset;

fn embedded(path: &str, content_type: &'static str) -> Response {
    match Asset::get(path) {
        Some(file) => (
            [(header::CONTENT_TYPE, content_type)],
            file.data.into_owned(),
        )
            .into_response(),
        None => {
            tracing::error!("Embedded asset {} is missing", path);
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

pub async fn index_html() -> Response {
    embedded("index.html", "text/html; charset=utf-8")
}

pub async fn style_css() -> Response {
    embedded("style.css", "text/css")
}

pub async fn script_js() -> Response {
    embedded("script.js", "application/javascript")
}

pub async fn get_map_layout(State(state): State<AppState>) -> Json<MapLayout> {
    Json((*state.layout).clone())
}

pub async fn get_legend() -> Html<String> {
    Html(legend_html())
}

#[derive(Debug, Serialize)]
pub struct EarthquakeOverlay {
    pub title: Option<String>,
    pub generated_at: Option<DateTime<Utc>>,
    pub count: usize,
    pub skipped: usize,
    pub markers: Vec<Marker>,
}

fn upstream_error(message: String) -> Response {
    let body = serde_json::json!({
        "status": "error",
        "message": message,
    });
    (StatusCode::BAD_GATEWAY, Json(body)).into_response()
}

/// One feed fetch per call; the page calls this once on load.
pub async fn get_earthquakes(State(state): State<AppState>) -> Response {
    let snapshot = match state.feed.fetch().await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::error!("Feed fetch failed: {:#}", e);
            return upstream_error(format!("Could not load earthquake feed: {:#}", e));
        }
    };

    let markers = build_overlay(&snapshot.records);
    Json(EarthquakeOverlay {
        title: snapshot.title,
        generated_at: snapshot.generated_at,
        count: markers.len(),
        skipped: snapshot.skipped,
        markers,
    })
    .into_response()
}

/// Slippy-map tile address check: `x` and `y` must be below `2^z`.
pub fn tile_in_range(z: u8, x: u32, y: u32) -> bool {
    if z > MAX_ZOOM {
        return false;
    }
    let side = 1u32 << z;
    x < side && y < side
}

/// Street-map tile passed through the grayscale filter.
pub async fn get_grayscale_tile(
    State(state): State<AppState>,
    AxumPath((z, x, y)): AxumPath<(u8, u32, u32)>,
) -> Result<Response, StatusCode> {
    if !tile_in_range(z, x, y) {
        return Err(StatusCode::BAD_REQUEST);
    }

    let url = state
        .tile_source
        .replace("{z}", &z.to_string())
        .replace("{x}", &x.to_string())
        .replace("{y}", &y.to_string());

    let response = state.feed.http().get(&url).send().await.map_err(|e| {
        tracing::error!("Tile request {} failed: {}", url, e);
        StatusCode::BAD_GATEWAY
    })?;
    if !response.status().is_success() {
        tracing::warn!("Tile source returned {} for {}", response.status(), url);
        return Err(StatusCode::BAD_GATEWAY);
    }
    let bytes = response.bytes().await.map_err(|e| {
        tracing::error!("Failed to read tile {}: {}", url, e);
        StatusCode::BAD_GATEWAY
    })?;

    let quotas = state.quotas;
    let png = tokio::task::spawn_blocking(move || grayscale_png(&bytes, &quotas))
        .await
        .map_err(|e| {
            tracing::error!("Task join error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .map_err(|e| {
            tracing::error!("Failed to filter tile {}: {:#}", url, e);
            StatusCode::BAD_GATEWAY
        })?;

    Ok(([(header::CONTENT_TYPE, "image/png")], png).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_range_follows_zoom() {
        assert!(tile_in_range(0, 0, 0));
        assert!(!tile_in_range(0, 1, 0));
        assert!(tile_in_range(5, 31, 31));
        assert!(!tile_in_range(5, 32, 0));
        assert!(!tile_in_range(5, 0, 32));
        assert!(tile_in_range(19, (1 << 19) - 1, 0));
        assert!(!tile_in_range(20, 0, 0));
    }
}
