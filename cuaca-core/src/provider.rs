use crate::{
    config::Config,
    error::WeatherError,
    model::Place,
    provider::openweather::{OpenWeatherProvider, OwOneCall},
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Upstream operations the lookup pipeline depends on.
///
/// One live implementation talks to OpenWeatherMap; tests substitute
/// scripted fakes.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Resolve a free-text city name to its best-match place.
    async fn resolve_by_name(&self, city: &str) -> Result<Place, WeatherError>;

    /// Resolve coordinates to the nearest named place.
    async fn resolve_by_coords(&self, lat: f64, lon: f64) -> Result<Place, WeatherError>;

    /// Fetch current/hourly/daily conditions in the provider's native schema.
    /// Normalization is a separate step; see [`crate::normalize`].
    async fn fetch_conditions(&self, lat: f64, lon: f64) -> Result<OwOneCall, WeatherError>;
}

/// Construct the live provider from config.
///
/// A missing API key fails here, before any network call is issued.
pub fn provider_from_config(config: &Config) -> Result<Box<dyn WeatherProvider>, WeatherError> {
    Ok(Box::new(OpenWeatherProvider::from_config(config)?))
}
