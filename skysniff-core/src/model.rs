use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Latitude/longitude as the geocoder reported them.
///
/// Kept as text so the value is hashable and compared exactly; `1.50` and
/// `1.5` are distinct keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: String,
    pub longitude: String,
}

impl Coordinate {
    pub fn new(latitude: impl Into<String>, longitude: impl Into<String>) -> Self {
        Self { latitude: latitude.into(), longitude: longitude.into() }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// A geocoded candidate: a building, postcode, city, county, country, etc.
/// See <https://wiki.openstreetmap.org/wiki/Key:place>.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    #[serde(deserialize_with = "string_or_number")]
    pub lat: String,
    #[serde(deserialize_with = "string_or_number")]
    pub lon: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default, rename = "type")]
    pub place_type: Option<String>,
    #[serde(default)]
    pub addresstype: Option<String>,
}

impl Place {
    pub fn coords(&self) -> Coordinate {
        Coordinate::new(self.lat.clone(), self.lon.clone())
    }
}

/// Forecast office grid cell on api.weather.gov, plus the server it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridpointRef {
    pub grid_id: String,
    pub grid_x: i64,
    pub grid_y: i64,
    pub server: String,
}

impl GridpointRef {
    /// `{server}/gridpoints/{gridId}/{gridX},{gridY}`
    pub fn base_url(&self) -> String {
        format!("{}/gridpoints/{}/{},{}", self.server, self.grid_id, self.grid_x, self.grid_y)
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number, got {other}"
        ))),
    }
}
