use serde::Serialize;

use crate::constants::*;
use crate::feed::{EarthquakeRecord, LatLon};
use crate::html_template::popup_html;

/// One row of the depth colour table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DepthColorBand {
    /// Inclusive upper bound in km; `None` for the last, open-ended band.
    pub upper_bound_km: Option<f64>,
    pub color: &'static str,
    pub label: &'static str,
}

// Ordered shallow to deep. Shared by marker colouring and the legend.
pub static DEPTH_BANDS: [DepthColorBand; 6] = [
    DepthColorBand { upper_bound_km: Some(10.0), color: "#a3f600", label: "< 10" },
    DepthColorBand { upper_bound_km: Some(30.0), color: "#dcf400", label: "10 - 30" },
    DepthColorBand { upper_bound_km: Some(50.0), color: "#f7db11", label: "30 - 50" },
    DepthColorBand { upper_bound_km: Some(70.0), color: "#fdb72a", label: "50 - 70" },
    DepthColorBand { upper_bound_km: Some(90.0), color: "#fca35d", label: "70 - 90" },
    DepthColorBand { upper_bound_km: None, color: "#ff5f65", label: "90+" },
];

/// First band whose upper bound is at least `depth_km`.
/// NaN never compares true, so it lands in the open-ended band.
pub fn depth_band(depth_km: f64) -> &'static DepthColorBand {
    DEPTH_BANDS
        .iter()
        .find(|band| band.upper_bound_km.map_or(true, |upper| depth_km <= upper))
        .unwrap_or(&DEPTH_BANDS[DEPTH_BANDS.len() - 1])
}

pub fn marker_color(depth_km: f64) -> &'static str {
    depth_band(depth_km).color
}

/// Circle radius in pixels. Zero and negative magnitudes pass straight through.
pub fn marker_radius(magnitude: f64) -> f64 {
    magnitude * MARKER_RADIUS_SCALE
}

/// Circle marker as handed to the map widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub position: LatLon,
    pub radius: f64,
    pub fill_color: &'static str,
    pub color: &'static str,
    pub weight: u32,
    pub fill_opacity: f64,
    pub popup_html: String,
}

pub fn build_marker(record: &EarthquakeRecord) -> Marker {
    Marker {
        position: record.position,
        radius: marker_radius(record.magnitude),
        fill_color: marker_color(record.depth_km),
        color: MARKER_STROKE_COLOR,
        weight: MARKER_STROKE_WEIGHT,
        fill_opacity: MARKER_FILL_OPACITY,
        popup_html: popup_html(record),
    }
}

/// Builds the earthquake overlay: one marker per record, in feed order.
pub fn build_overlay(records: &[EarthquakeRecord]) -> Vec<Marker> {
    records.iter().map(build_marker).collect()
}
