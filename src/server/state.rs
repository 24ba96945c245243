use anyhow::Result;
use std::sync::Arc;

use crate::feed::FeedClient;
use crate::image_processing::GrayscaleQuotas;
use crate::map_layout::MapLayout;
use crate::settings::Settings;

// Read-only after startup; every request sees the same configuration.
#[derive(Clone)]
pub struct AppState {
    pub feed: FeedClient,
    pub layout: Arc<MapLayout>,
    pub quotas: GrayscaleQuotas,
    pub tile_source: Arc<str>,
}

impl AppState {
    pub fn new(settings: &Settings) -> Result<Self> {
        Ok(AppState {
            feed: FeedClient::new(settings)?,
            layout: Arc::new(MapLayout::from_settings(settings)),
            quotas: settings.quotas,
            tile_source: Arc::from(crate::constants::OSM_TILE_URL),
        })
    }
}
