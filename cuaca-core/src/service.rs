//! The lookup pipeline: resolve, fetch, normalize, cache.

use tracing::debug;

use crate::cache::CacheStore;
use crate::error::WeatherError;
use crate::model::WeatherSnapshot;
use crate::normalize;
use crate::provider::WeatherProvider;

/// Wires the provider, the normalizer and the cache behind the two lookup
/// entry points.
pub struct WeatherService {
    provider: Box<dyn WeatherProvider>,
    cache: CacheStore,
}

impl WeatherService {
    pub fn new(provider: Box<dyn WeatherProvider>, cache: CacheStore) -> Self {
        Self { provider, cache }
    }

    /// Weather for a free-text city name.
    ///
    /// With `use_cache`, a fresh cached snapshot for the same city short-
    /// circuits the network path entirely; a cache hit does not touch the
    /// last-city pointer. The snapshot is cached under the queried name.
    pub async fn by_name(
        &self,
        city: &str,
        use_cache: bool,
    ) -> Result<WeatherSnapshot, WeatherError> {
        if use_cache {
            if let Some(snapshot) = self.cache.read_if_valid(city) {
                debug!(city, "serving cached snapshot");
                return Ok(snapshot);
            }
        }

        let place = self.provider.resolve_by_name(city).await?;
        let raw = self.provider.fetch_conditions(place.lat, place.lon).await?;
        let snapshot = normalize::snapshot(&raw, &place);

        self.cache.write(city, &snapshot);
        self.cache.set_last_city(city);

        Ok(snapshot)
    }

    /// Weather for explicit coordinates. Never consults the cache; the
    /// conditions request uses the input coordinates as given, and the
    /// resolved place name keys the entry written afterwards.
    pub async fn by_coords(&self, lat: f64, lon: f64) -> Result<WeatherSnapshot, WeatherError> {
        let place = self.provider.resolve_by_coords(lat, lon).await?;
        let raw = self.provider.fetch_conditions(lat, lon).await?;
        let snapshot = normalize::snapshot(&raw, &place);

        self.cache.write(&snapshot.current.city, &snapshot);
        self.cache.set_last_city(&snapshot.current.city);

        Ok(snapshot)
    }

    /// The city auto-loaded on startup, if any fetch has succeeded before.
    pub fn last_city(&self) -> Option<String> {
        self.cache.last_city()
    }
}
