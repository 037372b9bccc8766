//! Client for the National Weather Service's api.weather.gov.

use std::collections::HashMap;

use serde::Deserialize;
use tokio::sync::Mutex;

use crate::{
    config::Config,
    error::{Error, Result},
    forecast::{DailyForecast, Forecast, ForecastDocument, ForecastPeriod, HourlyForecast},
    geocode::{Geocoder, Nominatim},
    http::HttpClient,
    model::{Coordinate, GridpointRef},
};

pub const NWS_SERVER: &str = "https://api.weather.gov";

#[derive(Debug, Deserialize)]
struct PointsResponse {
    #[serde(default)]
    properties: Option<PointsProperties>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PointsProperties {
    #[serde(default)]
    grid_id: Option<String>,
    #[serde(default)]
    grid_x: Option<i64>,
    #[serde(default)]
    grid_y: Option<i64>,
}

#[derive(Debug)]
pub struct NwsApi {
    server: String,
    http: HttpClient,
    geocoder: Box<dyn Geocoder>,
    gridpoints: Mutex<HashMap<Coordinate, GridpointRef>>,
}

impl Default for NwsApi {
    fn default() -> Self {
        let http = HttpClient::new();
        Self::new(NWS_SERVER, http.clone(), Box::new(Nominatim::new(http)))
    }
}

impl NwsApi {
    pub fn new(server: impl Into<String>, http: HttpClient, geocoder: Box<dyn Geocoder>) -> Self {
        let server = server.into().trim_end_matches('/').to_string();
        Self { server, http, geocoder, gridpoints: Mutex::new(HashMap::new()) }
    }

    /// Uses the endpoint overrides from `config`, falling back to the public services.
    pub fn from_config(config: &Config) -> Self {
        let http = HttpClient::new();
        let geocoder = Nominatim::with_endpoint(config.geocoder_endpoint(), http.clone());
        Self::new(config.weather_server(), http, Box::new(geocoder))
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    /// Grid cell covering `coords`. Memoized on the exact coordinate text.
    pub async fn coords_to_gridpoint(&self, coords: &Coordinate) -> Result<GridpointRef> {
        let mut cache = self.gridpoints.lock().await;
        if let Some(grid) = cache.get(coords) {
            tracing::trace!(%coords, "gridpoint cache hit");
            return Ok(grid.clone());
        }

        let url = format!("{}/points/{coords}", self.server);
        let points: PointsResponse = self.http.get_json(&url).await?;

        let missing = |field: &str| Error::MalformedResponse {
            url: url.clone(),
            field: format!("properties.{field}"),
        };
        let props = points.properties.ok_or_else(|| Error::MalformedResponse {
            url: url.clone(),
            field: "properties".to_string(),
        })?;

        let grid = GridpointRef {
            grid_id: props.grid_id.ok_or_else(|| missing("gridId"))?,
            grid_x: props.grid_x.ok_or_else(|| missing("gridX"))?,
            grid_y: props.grid_y.ok_or_else(|| missing("gridY"))?,
            server: self.server.clone(),
        };

        tracing::trace!(%coords, grid_id = %grid.grid_id, "gridpoint cache miss");
        cache.insert(coords.clone(), grid.clone());
        Ok(grid)
    }

    pub async fn coords_to_gridpoint_url(&self, coords: &Coordinate) -> Result<String> {
        Ok(self.coords_to_gridpoint(coords).await?.base_url())
    }

    pub async fn address_to_gridpoint_url(&self, address: &str) -> Result<String> {
        let coords = self.geocoder.address_to_coords(address).await?;
        self.coords_to_gridpoint_url(&coords).await
    }

    /// The un-suffixed gridpoint resource: raw numerical forecast data.
    pub async fn raw_forecast(&self, address: &str) -> Result<serde_json::Value> {
        let url = self.address_to_gridpoint_url(address).await?;
        tracing::debug!("weather({address}) = {url}");
        self.http.get_json(&url).await
    }

    pub async fn daily(&self, address: &str) -> Result<DailyForecast> {
        let document = self.fetch_document(address, ForecastPeriod::Daily).await?;
        Ok(DailyForecast::new(document))
    }

    pub async fn hourly(&self, address: &str) -> Result<HourlyForecast> {
        let document = self.fetch_document(address, ForecastPeriod::Hourly).await?;
        Ok(HourlyForecast::new(document))
    }

    pub async fn forecast(&self, address: &str, period: ForecastPeriod) -> Result<Forecast> {
        Ok(match period {
            ForecastPeriod::Daily => Forecast::Daily(self.daily(address).await?),
            ForecastPeriod::Hourly => Forecast::Hourly(self.hourly(address).await?),
        })
    }

    async fn fetch_document(&self, address: &str, period: ForecastPeriod) -> Result<ForecastDocument> {
        let url = self.address_to_gridpoint_url(address).await? + period.endpoint_suffix();
        tracing::debug!("{period}({address}) = {url}");
        let raw = self.http.get_json(&url).await?;
        ForecastDocument::from_value(&url, raw)
    }
}
