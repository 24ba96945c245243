use anyhow::{bail, Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::*;
use crate::settings::Settings;

// GeoJSON as published by the USGS summary feeds. Every per-feature field is
// optional (missing or null) so a single bad feature cannot fail the whole payload.
#[derive(Debug, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub metadata: Option<FeedMetadata>,
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
pub struct FeedMetadata {
    pub generated: Option<i64>,
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Feature {
    pub id: Option<String>,
    pub properties: Option<Properties>,
    pub geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
pub struct Properties {
    pub mag: Option<f64>,
    pub place: Option<String>,
    pub time: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    pub coordinates: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EarthquakeRecord {
    pub occurred_at: DateTime<Utc>,
    pub place: String,
    pub magnitude: f64,
    pub depth_km: f64,
    pub position: LatLon,
}

impl TryFrom<&Feature> for EarthquakeRecord {
    type Error = anyhow::Error;

    fn try_from(feature: &Feature) -> Result<Self> {
        let props = feature
            .properties
            .as_ref()
            .context("missing properties")?;
        let time = props.time.context("missing properties.time")?;
        let occurred_at = Utc
            .timestamp_millis_opt(time)
            .single()
            .with_context(|| format!("properties.time {} is out of range", time))?;
        let magnitude = props.mag.context("missing properties.mag")?;

        let coords = feature
            .geometry
            .as_ref()
            .and_then(|g| g.coordinates.as_deref())
            .unwrap_or_default();
        let (lon, lat, depth_km) = match coords {
            [Some(lon), Some(lat), Some(depth), ..] => (*lon, *lat, *depth),
            _ => bail!("geometry.coordinates must hold [lon, lat, depth]"),
        };

        Ok(EarthquakeRecord {
            occurred_at,
            place: props
                .place
                .clone()
                .unwrap_or_else(|| UNKNOWN_PLACE.to_string()),
            magnitude,
            depth_km,
            position: LatLon { lat, lon },
        })
    }
}

/// One decoded feed payload.
#[derive(Debug, Clone)]
pub struct FeedSnapshot {
    pub records: Vec<EarthquakeRecord>,
    /// Features that could not be turned into records.
    pub skipped: usize,
    pub title: Option<String>,
    pub generated_at: Option<DateTime<Utc>>,
}

pub fn parse_feed(bytes: &[u8]) -> Result<FeedSnapshot> {
    let collection: FeatureCollection =
        serde_json::from_slice(bytes).context("Feed payload is not a GeoJSON feature collection")?;

    let mut records = Vec::with_capacity(collection.features.len());
    let mut skipped = 0;
    for feature in &collection.features {
        match EarthquakeRecord::try_from(feature) {
            Ok(record) => records.push(record),
            Err(e) => {
                skipped += 1;
                tracing::warn!(
                    "Skipping feature {}: {}",
                    feature.id.as_deref().unwrap_or("<no id>"),
                    e
                );
            }
        }
    }

    let (title, generated_at) = match collection.metadata {
        Some(meta) => (
            meta.title,
            meta.generated
                .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        ),
        None => (None, None),
    };

    Ok(FeedSnapshot {
        records,
        skipped,
        title,
        generated_at,
    })
}

/// HTTP access to the earthquake feed. Cheap to clone; the inner client is
/// also used for tile requests.
#[derive(Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    feed_url: String,
}

impl FeedClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            feed_url: settings.feed_url.clone(),
        })
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn feed_url(&self) -> &str {
        &self.feed_url
    }

    /// Single GET of the feed. No retries.
    pub async fn fetch(&self) -> Result<FeedSnapshot> {
        let start = std::time::Instant::now();
        let response = self
            .http
            .get(&self.feed_url)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", self.feed_url))?;

        let status = response.status();
        if !status.is_success() {
            bail!("Feed {} returned {}", self.feed_url, status);
        }

        let body = response
            .bytes()
            .await
            .context("Failed to read feed body")?;
        let snapshot = parse_feed(&body)?;

        tracing::info!(
            "📡 Fetched {} earthquakes ({} skipped) in {:?}",
            snapshot.records.len(),
            snapshot.skipped,
            start.elapsed()
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    pub(crate) const SAMPLE_FEED: &str = r#"{
        "type": "FeatureCollection",
        "metadata": {
            "generated": 1760445296000,
            "title": "USGS All Earthquakes, Past Week",
            "count": 4
        },
        "features": [
            {
                "type": "Feature",
                "id": "ak0001",
                "properties": { "mag": 1.8, "place": "12 km NW of Anchor Point, Alaska", "time": 1760440000000 },
                "geometry": { "type": "Point", "coordinates": [-151.9, 59.8, 42.3] }
            },
            {
                "type": "Feature",
                "id": "ci0002",
                "properties": { "mag": -0.4, "place": "5 km S of Idyllwild, CA", "time": 1760430000000 },
                "geometry": { "type": "Point", "coordinates": [-116.7, 33.7, 9.1] }
            },
            {
                "type": "Feature",
                "id": "us0003",
                "properties": { "mag": 6.1, "place": null, "time": 1760420000000 },
                "geometry": { "type": "Point", "coordinates": [142.3, 38.1, 95.0] }
            },
            {
                "type": "Feature",
                "id": "nc0004",
                "properties": { "mag": 0.0, "place": "The Geysers, CA", "time": 1760410000000 },
                "geometry": { "type": "Point", "coordinates": [-122.8, 38.8, 10.0] }
            }
        ]
    }"#;

    #[test]
    fn parses_sample_feed() {
        let snapshot = parse_feed(SAMPLE_FEED.as_bytes()).unwrap();
        assert_eq!(snapshot.records.len(), 4);
        assert_eq!(snapshot.skipped, 0);
        assert_eq!(
            snapshot.title.as_deref(),
            Some("USGS All Earthquakes, Past Week")
        );
        assert_eq!(
            snapshot.generated_at,
            Utc.timestamp_millis_opt(1760445296000).single()
        );

        let first = &snapshot.records[0];
        assert_eq!(first.magnitude, 1.8);
        assert_eq!(first.depth_km, 42.3);
        assert_eq!(first.position, LatLon { lat: 59.8, lon: -151.9 });
        assert_eq!(first.place, "12 km NW of Anchor Point, Alaska");
        assert_eq!(first.occurred_at.timestamp_millis(), 1760440000000);
    }

    #[test]
    fn keeps_feed_order_and_odd_magnitudes() {
        let snapshot = parse_feed(SAMPLE_FEED.as_bytes()).unwrap();
        let mags: Vec<f64> = snapshot.records.iter().map(|r| r.magnitude).collect();
        assert_eq!(mags, vec![1.8, -0.4, 6.1, 0.0]);
    }

    #[test]
    fn missing_place_gets_placeholder() {
        let snapshot = parse_feed(SAMPLE_FEED.as_bytes()).unwrap();
        assert_eq!(snapshot.records[2].place, UNKNOWN_PLACE);
    }

    #[test]
    fn skips_incomplete_features() {
        let payload = r#"{
            "features": [
                { "properties": { "mag": null, "place": "a", "time": 1 },
                  "geometry": { "coordinates": [1.0, 2.0, 3.0] } },
                { "properties": { "mag": 2.0, "place": "b", "time": 1 },
                  "geometry": { "coordinates": [1.0, 2.0] } },
                { "properties": { "mag": 2.0, "place": "c" },
                  "geometry": { "coordinates": [1.0, 2.0, 3.0] } },
                { "properties": { "mag": 2.0, "place": "d", "time": 1 },
                  "geometry": null },
                { "properties": null,
                  "geometry": { "coordinates": [1.0, 2.0, 3.0] } },
                { "properties": { "mag": 2.0, "place": "f", "time": 1 },
                  "geometry": { "coordinates": null } },
                { "id": null,
                  "properties": { "mag": 2.0, "place": "g", "time": 1 },
                  "geometry": { "coordinates": [1.0, null, 3.0] } },
                { "properties": { "mag": 2.0, "place": "e", "time": 1 },
                  "geometry": { "coordinates": [1.0, 2.0, 3.0] } }
            ]
        }"#;
        let snapshot = parse_feed(payload.as_bytes()).unwrap();
        assert_eq!(snapshot.skipped, 7);
        assert_eq!(snapshot.records.len(), 1);
        assert_eq!(snapshot.records[0].place, "e");
        assert!(snapshot.title.is_none());
    }

    #[test]
    fn empty_collection_is_fine() {
        let snapshot = parse_feed(br#"{"type":"FeatureCollection","features":[]}"#).unwrap();
        assert!(snapshot.records.is_empty());
        assert_eq!(snapshot.skipped, 0);
    }

    #[test]
    fn malformed_payload_is_an_error() {
        assert!(parse_feed(b"<html>502 Bad Gateway</html>").is_err());
        assert!(parse_feed(br#"{"features": 5}"#).is_err());
    }

    /// Serves `router` on an ephemeral local port and returns its base URL.
    pub(crate) async fn serve_locally(router: axum::Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    /// `/all_week.geojson` answers with `SAMPLE_FEED`, `/broken` with a 500.
    pub(crate) fn fake_usgs() -> axum::Router {
        use axum::http::{header, StatusCode};
        use axum::routing::get;

        axum::Router::new()
            .route(
                "/all_week.geojson",
                get(|| async { ([(header::CONTENT_TYPE, "application/geo+json")], SAMPLE_FEED) }),
            )
            .route(
                "/broken",
                get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded") }),
            )
    }

    fn client_for(url: String) -> FeedClient {
        let mut settings = Settings::default();
        settings.feed_url = url;
        settings.request_timeout_secs = 5;
        FeedClient::new(&settings).unwrap()
    }

    #[tokio::test]
    async fn fetch_decodes_a_served_feed() {
        let base = serve_locally(fake_usgs()).await;
        let snapshot = client_for(format!("{}/all_week.geojson", base))
            .fetch()
            .await
            .unwrap();
        assert_eq!(snapshot.records.len(), 4);
        assert_eq!(snapshot.skipped, 0);
        assert_eq!(snapshot.records[0].place, "12 km NW of Anchor Point, Alaska");
    }

    #[tokio::test]
    async fn fetch_rejects_error_status() {
        let base = serve_locally(fake_usgs()).await;
        let err = client_for(format!("{}/broken", base))
            .fetch()
            .await
            .unwrap_err();
        assert!(err.to_string().contains("500"), "unexpected error: {}", err);
    }

    #[test]
    fn client_keeps_configured_url() {
        let mut settings = Settings::default();
        settings.feed_url = "http://localhost:9/feed.geojson".to_string();
        let client = FeedClient::new(&settings).unwrap();
        assert_eq!(client.feed_url(), "http://localhost:9/feed.geojson");
    }
}
