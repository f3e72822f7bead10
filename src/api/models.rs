use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::domain::Extent;

/// Raw response from `/groundwater/user/uuid/`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserUuidResponse {
    pub uuid: String,
    #[serde(default)]
    pub extent: Option<Value>,
}

/// Validated identity of the current user
#[derive(Debug, Clone, PartialEq)]
pub struct UserContext {
    pub uuid: String,
    pub extent: Option<Extent>,
}

impl UserContext {
    /// Value for the `viewparams` config key scoping map requests to this user
    pub fn view_params(&self) -> String {
        format!("uuid:{}", self.uuid)
    }
}

/// `[minx, miny, maxx, maxy]`, four finite numbers. `minx > maxx` is allowed
/// for boxes crossing the antimeridian.
fn parse_extent(value: &Value) -> Result<Extent, String> {
    let values = value
        .as_array()
        .ok_or_else(|| format!("extent is not an array: {}", value))?;
    let numbers = values
        .iter()
        .map(|v| v.as_f64().filter(|n| n.is_finite()))
        .collect::<Option<Vec<f64>>>()
        .ok_or_else(|| format!("extent holds non-numeric values: {}", value))?;
    let corners: [f64; 4] = numbers
        .as_slice()
        .try_into()
        .map_err(|_| format!("extent must have 4 values, got {}", numbers.len()))?;
    Ok(Extent::from_corners(corners))
}

impl TryFrom<UserUuidResponse> for UserContext {
    type Error = String;

    /// Fails only on a blank uuid. A bad extent is logged and dropped, since
    /// it only affects zooming.
    fn try_from(raw: UserUuidResponse) -> Result<Self, Self::Error> {
        if raw.uuid.trim().is_empty() {
            return Err("uuid is empty".to_string());
        }

        let extent = match raw.extent.as_ref().map(parse_extent) {
            None => None,
            Some(Ok(extent)) => Some(extent),
            Some(Err(reason)) => {
                tracing::warn!(%reason, "ignoring user extent");
                None
            }
        };

        Ok(Self {
            uuid: raw.uuid,
            extent,
        })
    }
}

/// Attribute schema of one layer. The payload is kept as-is.
pub type AttributeSchema = Value;

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: Url,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse("http://localhost:8000/").expect("static URL is valid"),
            timeout: Duration::from_secs(30),
        }
    }
}
