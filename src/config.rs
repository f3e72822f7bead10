//! Shell configuration, read from `GW_*` environment variables.

use std::path::Path;
use std::time::Duration;

use url::Url;

use crate::api::ApiConfig;
use crate::application::map_context::DEFAULT_MAP_READY_DELAY;
use crate::domain::{AppError, MapResource};

pub const BASE_URL_VAR: &str = "GW_BASE_URL";
pub const PAGE_URL_VAR: &str = "GW_PAGE_URL";
pub const MAP_READY_DELAY_VAR: &str = "GW_MAP_READY_DELAY_MS";
pub const REQUEST_TIMEOUT_VAR: &str = "GW_REQUEST_TIMEOUT_SECS";
pub const MAP_RESOURCE_VAR: &str = "GW_MAP_RESOURCE";

#[derive(Debug, Clone)]
pub struct PluginConfig {
    pub api: ApiConfig,
    /// URL of the page the map is shown on; gates the map initializer.
    pub page_url: String,
    pub map_ready_delay: Duration,
    pub map_resource: MapResource,
}

impl Default for PluginConfig {
    fn default() -> Self {
        let api = ApiConfig::default();
        let page_url = format!("{}view/groundwater-well", api.base_url);
        Self {
            api,
            page_url,
            map_ready_delay: DEFAULT_MAP_READY_DELAY,
            map_resource: MapResource::default(),
        }
    }
}

impl PluginConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from `lookup`, falling back to defaults for unset keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(BASE_URL_VAR) {
            let mut base_url = Url::parse(&raw)
                .map_err(|e| AppError::Config(format!("{}: {}", BASE_URL_VAR, e)))?;
            // Keep relative joins under the configured path.
            if !base_url.path().ends_with('/') {
                let path = format!("{}/", base_url.path());
                base_url.set_path(&path);
            }
            config.page_url = format!("{}view/groundwater-well", base_url);
            config.api.base_url = base_url;
        }

        if let Some(page_url) = lookup(PAGE_URL_VAR) {
            config.page_url = page_url;
        }

        if let Some(raw) = lookup(MAP_READY_DELAY_VAR) {
            config.map_ready_delay = Duration::from_millis(parse_number(MAP_READY_DELAY_VAR, &raw)?);
        }

        if let Some(raw) = lookup(REQUEST_TIMEOUT_VAR) {
            config.api.timeout = Duration::from_secs(parse_number(REQUEST_TIMEOUT_VAR, &raw)?);
        }

        if let Some(path) = lookup(MAP_RESOURCE_VAR) {
            config.map_resource = load_map_resource(Path::new(&path))?;
        }

        Ok(config)
    }

    /// Identifier of the shown map, for display.
    pub fn resource_id(&self) -> Option<String> {
        self.map_resource.id.as_ref().map(ToString::to_string)
    }
}

fn parse_number(key: &str, raw: &str) -> Result<u64, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::Config(format!("{} must be a whole number, got '{}'", key, raw)))
}

pub fn parse_map_resource(json: &str) -> Result<MapResource, AppError> {
    serde_json::from_str(json).map_err(|e| AppError::Config(format!("map resource: {}", e)))
}

pub fn load_map_resource(path: &Path) -> Result<MapResource, AppError> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| AppError::Io(format!("{}: {}", path.display(), e)))?;
    parse_map_resource(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = PluginConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.api.base_url.as_str(), "http://localhost:8000/");
        assert_eq!(config.page_url, "http://localhost:8000/view/groundwater-well");
        assert_eq!(config.map_ready_delay, Duration::from_millis(3000));
        assert_eq!(config.api.timeout, Duration::from_secs(30));
        assert!(config.map_resource.layers.is_empty());
        assert_eq!(config.resource_id(), None);
    }

    #[test]
    fn test_overrides() {
        let config = PluginConfig::from_lookup(lookup(&[
            (BASE_URL_VAR, "https://ggis.un-igrac.org/geonode"),
            (MAP_READY_DELAY_VAR, "250"),
            (REQUEST_TIMEOUT_VAR, " 5 "),
        ]))
        .unwrap();
        assert_eq!(config.api.base_url.as_str(), "https://ggis.un-igrac.org/geonode/");
        assert_eq!(
            config.page_url,
            "https://ggis.un-igrac.org/geonode/view/groundwater-well"
        );
        assert_eq!(config.map_ready_delay, Duration::from_millis(250));
        assert_eq!(config.api.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_page_url_override_wins() {
        let config = PluginConfig::from_lookup(lookup(&[
            (BASE_URL_VAR, "https://x.org/"),
            (PAGE_URL_VAR, "https://x.org/view/ggmn"),
        ]))
        .unwrap();
        assert_eq!(config.page_url, "https://x.org/view/ggmn");
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            PluginConfig::from_lookup(lookup(&[(BASE_URL_VAR, "not a url")])),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            PluginConfig::from_lookup(lookup(&[(MAP_READY_DELAY_VAR, "soon")])),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            PluginConfig::from_lookup(lookup(&[(MAP_RESOURCE_VAR, "/nonexistent/map.json")])),
            Err(AppError::Io(_))
        ));
    }

    #[test]
    fn test_parse_map_resource() {
        let resource = parse_map_resource(
            r#"{"id": 12, "layers": [
                {"id": "groundwater_well__1", "name": "groundwater:Groundwater_Well"},
                {"name": "osm"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(resource.layers.len(), 2);
        assert_eq!(resource.layers[1].id, None);
        assert!(parse_map_resource("[]").is_err());
    }
}
