use crate::place::LatLng;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid map config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("zoom {zoom} outside 0..=22")]
    Zoom { zoom: u8 },
}

/// Static map settings. Every field is optional in JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub center: LatLng,
    pub zoom: u8,
    /// Lower bound on zoom when centering on the selected place.
    pub selected_min_zoom: u8,
    /// Lower bound on zoom when centering on the user's location.
    pub user_location_min_zoom: u8,
    pub tile_url: String,
    pub attribution: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: LatLng::new(12.9716, 77.5946),
            zoom: 13,
            selected_min_zoom: 17,
            user_location_min_zoom: 15,
            tile_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".into(),
            attribution: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors".into(),
        }
    }
}

impl MapConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: MapConfig = serde_json::from_str(raw)?;
        for zoom in [config.zoom, config.selected_min_zoom, config.user_location_min_zoom] {
            if zoom > 22 {
                return Err(ConfigError::Zoom { zoom });
            }
        }
        Ok(config)
    }

    /// Like [`MapConfig::from_json`] but logs and falls back to defaults.
    pub fn from_json_or_default(raw: Option<&str>) -> Self {
        match raw.map(Self::from_json) {
            Some(Ok(config)) => config,
            Some(Err(err)) => {
                tracing::warn!(error = %err, "ignoring map config");
                Self::default()
            }
            None => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config = MapConfig::from_json(r#"{"zoom": 11}"#).expect("config");
        assert_eq!(config.zoom, 11);
        assert_eq!(config.selected_min_zoom, 17);
        assert_eq!(config.center, LatLng::new(12.9716, 77.5946));
    }

    #[test]
    fn rejects_out_of_range_zoom() {
        assert!(matches!(
            MapConfig::from_json(r#"{"selected_min_zoom": 30}"#),
            Err(ConfigError::Zoom { zoom: 30 })
        ));
    }

    #[test]
    fn bad_json_falls_back() {
        assert_eq!(MapConfig::from_json_or_default(Some("{nope")), MapConfig::default());
        assert_eq!(MapConfig::from_json_or_default(None), MapConfig::default());
    }
}
