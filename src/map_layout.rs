use serde::Serialize;

use crate::constants::*;
use crate::feed::LatLon;
use crate::html_template::legend_html;
use crate::markers::{DepthColorBand, DEPTH_BANDS};
use crate::settings::Settings;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaseLayer {
    pub name: &'static str,
    pub url_template: String,
    pub attribution: &'static str,
    /// Tiles are desaturated server-side before reaching the browser.
    pub grayscale: bool,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overlay {
    pub name: &'static str,
    pub source: &'static str,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerControl {
    pub collapsed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub position: &'static str,
    pub html: String,
    pub bands: &'static [DepthColorBand],
}

/// Everything the browser needs to assemble the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapLayout {
    pub container_id: &'static str,
    pub center: LatLon,
    pub zoom: u8,
    pub base_layers: Vec<BaseLayer>,
    pub overlays: Vec<Overlay>,
    pub layer_control: LayerControl,
    pub legend: Legend,
}

impl MapLayout {
    pub fn from_settings(settings: &Settings) -> Self {
        let topo = BaseLayer {
            name: TOPO_LAYER_NAME,
            url_template: TOPO_TILE_URL.to_string(),
            attribution: TOPO_ATTRIBUTION,
            grayscale: false,
            visible: false,
        };
        let grayscale = BaseLayer {
            name: GRAYSCALE_LAYER_NAME,
            url_template: GRAYSCALE_TILE_ROUTE.to_string(),
            attribution: OSM_ATTRIBUTION,
            grayscale: true,
            visible: true,
        };

        MapLayout {
            container_id: MAP_CONTAINER_ID,
            center: LatLon {
                lat: settings.center_lat,
                lon: settings.center_lon,
            },
            zoom: settings.zoom,
            base_layers: vec![topo, grayscale],
            overlays: vec![Overlay {
                name: OVERLAY_NAME,
                source: "/api/earthquakes",
                visible: true,
            }],
            layer_control: LayerControl { collapsed: false },
            legend: Legend {
                position: LEGEND_POSITION,
                html: legend_html(),
                bands: &DEPTH_BANDS,
            },
        }
    }

    pub fn visible_base_layer(&self) -> Option<&BaseLayer> {
        self.base_layers.iter().find(|layer| layer.visible)
    }
}
