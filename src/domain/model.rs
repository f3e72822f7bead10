use std::fmt;

use serde::{Deserialize, Serialize};

/// Coordinate reference system the user extent is expressed in.
pub const EXTENT_CRS: &str = "EPSG:4326";

/// State of the single download session held by the host.
///
/// `enabled` tracks modal visibility and is set together with `data`; closing
/// the modal clears both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadSession {
    pub enabled: bool,
    pub is_downloading: bool,
    /// HTML fragment shown in the modal, empty when idle.
    pub data: String,
    pub error: Option<bool>,
}

impl DownloadSession {
    pub fn is_idle(&self) -> bool {
        !self.enabled && !self.is_downloading && self.data.is_empty()
    }

    pub fn has_error(&self) -> bool {
        self.error.unwrap_or(false)
    }
}

/// Bounding box in [`EXTENT_CRS`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub minx: f64,
    pub miny: f64,
    pub maxx: f64,
    pub maxy: f64,
}

impl Extent {
    /// Builds an extent from `[minx, miny, maxx, maxy]`.
    pub fn from_corners(corners: [f64; 4]) -> Self {
        Self {
            minx: corners[0],
            miny: corners[1],
            maxx: corners[2],
            maxy: corners[3],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Padding {
    pub top: u32,
    pub bottom: u32,
    pub right: u32,
    pub left: u32,
}

/// Commands understood by the host map runtime.
///
/// Serializes to the action shape the host expects, e.g.
/// `{"type":"ZOOM_TO_EXTENT","extent":{..},"crs":"EPSG:4326","padding":{..}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MapCommand {
    #[serde(rename = "ZOOM_TO_EXTENT")]
    ZoomToExtent {
        extent: Extent,
        crs: String,
        padding: Padding,
    },
    #[serde(rename = "LAYERS:SELECT_NODE", rename_all = "camelCase")]
    SelectLayerNode {
        id: String,
        node_type: String,
        ctrl_key: bool,
    },
}

impl MapCommand {
    pub fn zoom_to(extent: Extent) -> Self {
        MapCommand::ZoomToExtent {
            extent,
            crs: EXTENT_CRS.to_string(),
            padding: Padding::default(),
        }
    }

    pub fn select_layer(id: impl Into<String>) -> Self {
        MapCommand::SelectLayerNode {
            id: id.into(),
            node_type: "layer".to_string(),
            ctrl_key: false,
        }
    }
}

/// A layer entry of the host's map resource configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerConfig {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
}

/// Identifier of the map resource; the host uses either numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceId::Number(n) => write!(f, "{}", n),
            ResourceId::Text(s) => f.write_str(s),
        }
    }
}

/// The map resource the page is showing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapResource {
    #[serde(default)]
    pub id: Option<ResourceId>,
    #[serde(default)]
    pub layers: Vec<LayerConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_zoom_command_wire_shape() {
        let cmd = MapCommand::zoom_to(Extent::from_corners([10.0, 20.0, 30.0, 40.0]));
        let value = serde_json::to_value(&cmd).unwrap();
        assert_eq!(value["type"], "ZOOM_TO_EXTENT");
        assert_eq!(value["crs"], "EPSG:4326");
        assert_eq!(value["extent"]["maxy"], 40.0);
        assert_eq!(value["padding"]["left"], 0);
    }

    #[test]
    fn test_select_command_wire_shape() {
        let value = serde_json::to_value(MapCommand::select_layer("gw_1")).unwrap();
        assert_eq!(
            value,
            json!({"type": "LAYERS:SELECT_NODE", "id": "gw_1", "nodeType": "layer", "ctrlKey": false})
        );
    }

    #[test]
    fn test_map_resource_accepts_numeric_and_text_ids() {
        let numeric: MapResource =
            serde_json::from_value(json!({"id": 42, "layers": [{"id": "a", "name": "ws:a"}]}))
                .unwrap();
        assert_eq!(numeric.id, Some(ResourceId::Number(42)));
        assert_eq!(numeric.layers.len(), 1);

        let text: MapResource = serde_json::from_value(json!({"id": "map-7"})).unwrap();
        assert_eq!(text.id.map(|id| id.to_string()), Some("map-7".to_string()));
        assert!(text.layers.is_empty());
    }

    #[test]
    fn test_layer_without_id() {
        let layer: LayerConfig = serde_json::from_value(json!({"name": "basemap"})).unwrap();
        assert_eq!(layer.id, None);
    }
}
