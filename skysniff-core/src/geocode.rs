//! Forward geocoding through OpenStreetMap's Nominatim search API.

use std::{collections::HashMap, fmt::Debug};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    error::{Error, Result},
    http::HttpClient,
    model::{Coordinate, Place},
};

pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";

/// Anything that can turn a free-text address into coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    async fn address_to_coords(&self, address: &str) -> Result<Coordinate>;
}

#[derive(Debug)]
pub struct Nominatim {
    endpoint: String,
    http: HttpClient,
    places: Mutex<HashMap<String, Vec<Place>>>,
}

impl Default for Nominatim {
    fn default() -> Self {
        Self::new(HttpClient::new())
    }
}

impl Nominatim {
    pub fn new(http: HttpClient) -> Self {
        Self::with_endpoint(NOMINATIM_URL, http)
    }

    pub fn with_endpoint(endpoint: impl Into<String>, http: HttpClient) -> Self {
        Self { endpoint: endpoint.into(), http, places: Mutex::new(HashMap::new()) }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn search_url(&self, address: &str) -> Result<String> {
        let url = reqwest::Url::parse_with_params(
            &self.endpoint,
            &[("q", address), ("format", "json")],
        )
        .map_err(|e| Error::InvalidUrl { url: self.endpoint.clone(), reason: e.to_string() })?;
        Ok(url.into())
    }

    /// Candidate places for `address`, in the order Nominatim ranked them.
    ///
    /// Memoized on the exact address string for the lifetime of `self`.
    pub async fn address_to_places(&self, address: &str) -> Result<Vec<Place>> {
        let mut cache = self.places.lock().await;
        if let Some(places) = cache.get(address) {
            tracing::trace!(address, "geocode cache hit");
            return Ok(places.clone());
        }

        let url = self.search_url(address)?;
        let body = self.http.get(&url).await?;
        let places: Vec<Place> = serde_json::from_str(&body)
            .map_err(|source| Error::Parse { url: url.clone(), source })?;

        tracing::trace!(address, count = places.len(), "geocode cache miss");
        cache.insert(address.to_string(), places.clone());
        Ok(places)
    }
}

#[async_trait]
impl Geocoder for Nominatim {
    /// Picks the first candidate. No disambiguation: quality is whatever
    /// Nominatim's ranking gives us.
    async fn address_to_coords(&self, address: &str) -> Result<Coordinate> {
        let places = self.address_to_places(address).await?;
        places
            .first()
            .map(Place::coords)
            .ok_or_else(|| Error::NoResults { address: address.to_string() })
    }
}
