//! Core library for the `skysniff` CLI.
//!
//! This crate defines:
//! - Address geocoding via Nominatim, memoized per address
//! - Gridpoint resolution and forecast retrieval from api.weather.gov
//! - Daily and hourly text renderings of a forecast
//! - Configuration handling (stored default address, endpoint overrides)
//!
//! It is used by `skysniff-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod forecast;
pub mod geocode;
pub mod http;
pub mod model;
pub mod nws;

pub use config::Config;
pub use error::{Error, Result};
pub use forecast::{DailyForecast, Forecast, ForecastDocument, ForecastPeriod, HourlyForecast};
pub use geocode::{Geocoder, Nominatim};
pub use http::HttpClient;
pub use model::{Coordinate, GridpointRef, Place};
pub use nws::NwsApi;
