// Server
pub const DEFAULT_PORT: u16 = 3001;
pub const REQUEST_TIMEOUT_SECS: u64 = 30;
pub const USER_AGENT: &str = concat!("quakemap/", env!("CARGO_PKG_VERSION"));

// Feed
pub const FEED_URL: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_week.geojson";
pub const UNKNOWN_PLACE: &str = "Unknown location";

// Initial view (roughly the geographic centre of the contiguous US)
pub const MAP_CENTER_LAT: f64 = 38.784182275648625;
pub const MAP_CENTER_LON: f64 = -98.89379612121208;
pub const MAP_ZOOM: u8 = 5;
pub const MAX_ZOOM: u8 = 19;
pub const MAP_CONTAINER_ID: &str = "map";

// Markers
pub const MARKER_RADIUS_SCALE: f64 = 4.0;
pub const MARKER_STROKE_COLOR: &str = "black";
pub const MARKER_STROKE_WEIGHT: u32 = 1;
pub const MARKER_FILL_OPACITY: f64 = 1.0;

// Base layers
pub const TOPO_LAYER_NAME: &str = "Topographic Map";
pub const TOPO_TILE_URL: &str = "https://{s}.tile.opentopomap.org/{z}/{x}/{y}.png";
pub const TOPO_ATTRIBUTION: &str = r#"Map data: &copy; <a href="https://www.openstreetmap.org/copyright">OpenStreetMap</a> contributors, <a href="http://viewfinderpanoramas.org">SRTM</a> | Map style: &copy; <a href="https://opentopomap.org">OpenTopoMap</a> (<a href="https://creativecommons.org/licenses/by-sa/3.0/">CC-BY-SA</a>)"#;

pub const GRAYSCALE_LAYER_NAME: &str = "Grayscale Streetmap";
pub const GRAYSCALE_TILE_ROUTE: &str = "/tiles/grayscale/{z}/{x}/{y}";
pub const OSM_TILE_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const OSM_ATTRIBUTION: &str =
    r#"&copy; <a href="https://www.openstreetmap.org/copyright">OpenStreetMap</a> contributors"#;

pub const OVERLAY_NAME: &str = "Earthquakes";
pub const LEGEND_POSITION: &str = "bottomright";

// Grayscale luma weights
pub const QUOTA_RED: i32 = 21;
pub const QUOTA_GREEN: i32 = 71;
pub const QUOTA_BLUE: i32 = 8;
pub const QUOTA_DIVIDER_TUNE: i32 = 0;
