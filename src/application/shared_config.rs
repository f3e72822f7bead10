//! Key/value configuration shared with the map rendering layer.
//!
//! The handle is cheap to clone; every clone sees the same store. Writers
//! replace whole values, so readers may observe a partially filled
//! `layerattributes` map while fetches are still outstanding.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock};

use serde_json::Value;

use crate::api::AttributeSchema;

pub const VIEW_PARAMS_KEY: &str = "viewparams";
pub const LAYER_ATTRIBUTES_KEY: &str = "layerattributes";

/// Layer name to attribute schema
pub type LayerAttributeCache = BTreeMap<String, AttributeSchema>;

#[derive(Debug, Clone, Default)]
pub struct SharedConfig {
    props: Arc<RwLock<HashMap<String, Value>>>,
}

impl SharedConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_prop(&self, key: &str, value: Value) {
        let mut props = self.props.write().unwrap_or_else(PoisonError::into_inner);
        props.insert(key.to_string(), value);
    }

    pub fn get_prop(&self, key: &str) -> Option<Value> {
        let props = self.props.read().unwrap_or_else(PoisonError::into_inner);
        props.get(key).cloned()
    }

    pub fn set_view_params(&self, view_params: &str) {
        self.set_prop(VIEW_PARAMS_KEY, Value::String(view_params.to_string()));
    }

    pub fn view_params(&self) -> Option<String> {
        self.get_prop(VIEW_PARAMS_KEY)
            .and_then(|v| v.as_str().map(str::to_string))
    }

    /// Store a snapshot of the attribute cache
    pub fn set_layer_attributes(&self, cache: &LayerAttributeCache) {
        let map = cache
            .iter()
            .map(|(name, schema)| (name.clone(), schema.clone()))
            .collect();
        self.set_prop(LAYER_ATTRIBUTES_KEY, Value::Object(map));
    }

    pub fn layer_attributes(&self) -> Option<LayerAttributeCache> {
        match self.get_prop(LAYER_ATTRIBUTES_KEY)? {
            Value::Object(map) => Some(map.into_iter().collect()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clones_share_state() {
        let config = SharedConfig::new();
        let reader = config.clone();
        assert_eq!(reader.view_params(), None);

        config.set_view_params("uuid:abc");
        assert_eq!(reader.view_params().as_deref(), Some("uuid:abc"));
    }

    #[test]
    fn test_layer_attributes_snapshot() {
        let config = SharedConfig::new();
        assert_eq!(config.layer_attributes(), None);

        let mut cache = LayerAttributeCache::new();
        config.set_layer_attributes(&cache);
        assert_eq!(config.layer_attributes(), Some(LayerAttributeCache::new()));

        cache.insert("gw:wells".to_string(), json!({"fields": []}));
        config.set_layer_attributes(&cache);
        assert_eq!(
            config.get_prop(LAYER_ATTRIBUTES_KEY),
            Some(json!({"gw:wells": {"fields": []}}))
        );
    }
}
