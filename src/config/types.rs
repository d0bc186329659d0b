use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::listing::Coordinates;

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub data: DataConfig,
}

/// Settings handed to the map surface provider.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MapConfig {
    #[serde(default = "default_container")]
    pub container: String,
    #[serde(default = "default_tile_url")]
    pub tile_url: String,
    #[serde(default = "default_attribution")]
    pub attribution: String,
    #[serde(default = "default_center")]
    pub initial_center: Coordinates,
    #[serde(default = "default_initial_zoom")]
    pub initial_zoom: u8,
    #[serde(default = "default_fit_padding")]
    pub fit_padding: u32,
    #[serde(default = "default_property_zoom")]
    pub property_zoom: u8,
    #[serde(default = "default_complex_zoom")]
    pub complex_zoom: u8,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            container: default_container(),
            tile_url: default_tile_url(),
            attribution: default_attribution(),
            initial_center: default_center(),
            initial_zoom: default_initial_zoom(),
            fit_padding: default_fit_padding(),
            property_zoom: default_property_zoom(),
            complex_zoom: default_complex_zoom(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct DataConfig {
    /// JSON or YAML listing file. Built-in fixtures are used when unset.
    #[serde(default)]
    pub fixtures_path: Option<PathBuf>,
}

fn default_container() -> String {
    "map".into()
}

fn default_tile_url() -> String {
    "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".into()
}

fn default_attribution() -> String {
    "© OpenStreetMap contributors".into()
}

fn default_center() -> Coordinates {
    // Cyprus
    Coordinates { lat: 34.9, lng: 33.0 }
}

fn default_initial_zoom() -> u8 {
    9
}

fn default_fit_padding() -> u32 {
    20
}

fn default_property_zoom() -> u8 {
    15
}

fn default_complex_zoom() -> u8 {
    13
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_config_defaults() {
        let config = MapConfig::default();
        assert_eq!(config.container, "map");
        assert!(config.tile_url.contains("openstreetmap"));
        assert_eq!(config.initial_zoom, 9);
        assert_eq!(config.fit_padding, 20);
        assert_eq!(config.property_zoom, 15);
        assert_eq!(config.complex_zoom, 13);
        assert!((config.initial_center.lat - 34.9).abs() < f64::EPSILON);
    }

    #[test]
    fn property_zoom_is_tighter_than_complex_zoom() {
        let config = MapConfig::default();
        assert!(config.property_zoom > config.complex_zoom);
    }

    #[test]
    fn config_serde_roundtrip() {
        let original = Config::default();
        let yaml = serde_yml::to_string(&original).unwrap();
        let restored: Config = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(restored.map.fit_padding, original.map.fit_padding);
        assert_eq!(restored.map.tile_url, original.map.tile_url);
        assert!(restored.data.fixtures_path.is_none());
    }

    #[test]
    fn config_deserialize_with_overrides() {
        let yaml = "map:\n  property_zoom: 17";
        let config: Config = serde_yml::from_str(yaml).unwrap();
        assert_eq!(config.map.property_zoom, 17);
        // Other fields get defaults
        assert_eq!(config.map.complex_zoom, 13);
        assert_eq!(config.map.fit_padding, 20);
    }
}
