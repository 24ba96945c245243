use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;

use crate::constants::*;
use crate::image_processing::GrayscaleQuotas;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub feed_url: String,
    pub port: u16,
    pub auto_open_browser: bool,
    pub request_timeout_secs: u64,
    pub center_lat: f64,
    pub center_lon: f64,
    pub zoom: u8,
    pub quotas: GrayscaleQuotas,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            feed_url: FEED_URL.to_string(),
            port: DEFAULT_PORT,
            auto_open_browser: false,
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
            center_lat: MAP_CENTER_LAT,
            center_lon: MAP_CENTER_LON,
            zoom: MAP_ZOOM,
            quotas: GrayscaleQuotas::default(),
        }
    }
}

/// Overwrites `target` when `key` is present and parses; bad values keep the default.
fn read_key<T: FromStr>(config_map: &HashMap<String, String>, key: &str, target: &mut T) {
    if let Some(raw) = config_map.get(key) {
        match raw.trim_matches('"').parse::<T>() {
            Ok(value) => *target = value,
            Err(_) => tracing::warn!("Ignoring invalid value for '{}': {}", key, raw),
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();
        if !config_path.exists() {
            tracing::info!("No config at {}, using defaults", config_path.display());
            return Ok(Settings::default());
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file {}", config_path.display()))?;
        let settings = Self::parse(&content);
        settings.validate()?;
        Ok(settings)
    }

    /// Parses `key = value` lines; `#` starts a comment line.
    pub fn parse(content: &str) -> Self {
        let mut config_map = HashMap::new();
        for line in content.lines() {
            if line.starts_with('#') || line.trim().is_empty() {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                config_map.insert(key.trim().to_string(), value.trim().to_string());
            }
        }

        let mut settings = Settings::default();
        read_key(&config_map, "feed_url", &mut settings.feed_url);
        read_key(&config_map, "port", &mut settings.port);
        read_key(&config_map, "auto_open_browser", &mut settings.auto_open_browser);
        read_key(&config_map, "request_timeout_secs", &mut settings.request_timeout_secs);
        read_key(&config_map, "center_lat", &mut settings.center_lat);
        read_key(&config_map, "center_lon", &mut settings.center_lon);
        read_key(&config_map, "zoom", &mut settings.zoom);
        read_key(&config_map, "quota_red", &mut settings.quotas.red);
        read_key(&config_map, "quota_green", &mut settings.quotas.green);
        read_key(&config_map, "quota_blue", &mut settings.quotas.blue);
        read_key(&config_map, "quota_divider_tune", &mut settings.quotas.divider_tune);
        settings
    }

    pub fn validate(&self) -> Result<()> {
        if self.quotas.divider() <= 0 {
            bail!(
                "Grayscale divider must be positive, got {} (check quota_* keys)",
                self.quotas.divider()
            );
        }
        if self.zoom > MAX_ZOOM {
            bail!("zoom must be between 0 and {}, got {}", MAX_ZOOM, self.zoom);
        }
        if !(-90.0..=90.0).contains(&self.center_lat) || !(-180.0..=180.0).contains(&self.center_lon) {
            bail!("Map center ({}, {}) is out of range", self.center_lat, self.center_lon);
        }
        Ok(())
    }

    pub fn to_ini_string(&self) -> String {
        let mut content = String::new();
        content.push_str("# QuakeMap Configuration File\n");
        content.push_str(&format!("feed_url = \"{}\"\n", self.feed_url));
        content.push_str(&format!("port = {}\n", self.port));
        content.push_str(&format!("auto_open_browser = {}\n", self.auto_open_browser));
        content.push_str(&format!("request_timeout_secs = {}\n", self.request_timeout_secs));
        content.push_str(&format!("center_lat = {}\n", self.center_lat));
        content.push_str(&format!("center_lon = {}\n", self.center_lon));
        content.push_str(&format!("zoom = {}\n", self.zoom));
        content.push_str(&format!("quota_red = {}\n", self.quotas.red));
        content.push_str(&format!("quota_green = {}\n", self.quotas.green));
        content.push_str(&format!("quota_blue = {}\n", self.quotas.blue));
        content.push_str(&format!("quota_divider_tune = {}\n", self.quotas.divider_tune));
        content
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Creating config directory")?;
        }
        std::fs::write(&config_path, self.to_ini_string())
            .context("Failed to write to config file")?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        let mut path = std::env::current_exe()
            .unwrap_or_default()
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .to_path_buf();

        if path.ends_with("target/debug") || path.ends_with("target/release") {
            path.pop();
            path.pop();
        }
        path.push("quakemap.ini");
        path
    }
}
