//! Time-bounded snapshot cache plus the small persisted UI preferences.
//!
//! One slot: each successful fetch overwrites the previous entry regardless
//! of city. Every operation is best-effort. Corrupt or expired entries report
//! as absent and persistence failures never interrupt the lookup path.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

use crate::model::WeatherSnapshot;
use crate::storage::StoragePort;

const WEATHER_KEY: &str = "weather_cache";
const LAST_CITY_KEY: &str = "last_searched_city";
const DARK_MODE_KEY: &str = "dark_mode";

/// Cache validity window in milliseconds.
pub const CACHE_TTL_MILLIS: i64 = 30 * 60 * 1000;

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    city: String,
    data: WeatherSnapshot,
    cached_at: i64,
}

/// Persisted lookup state: the snapshot slot, the last-city pointer, and the
/// dark-mode flag.
pub struct CacheStore {
    storage: Box<dyn StoragePort>,
    system_dark: bool,
}

impl CacheStore {
    /// `system_dark` is the host's dark-color-scheme signal, consulted only
    /// when no explicit preference has been stored.
    pub fn new(storage: Box<dyn StoragePort>, system_dark: bool) -> Self {
        Self { storage, system_dark }
    }

    /// The cached snapshot, if it was written for the same city
    /// (case-insensitive) within the TTL window.
    pub fn read_if_valid(&self, city: &str) -> Option<WeatherSnapshot> {
        self.read_if_valid_at(city, now_millis())
    }

    fn read_if_valid_at(&self, city: &str, now: i64) -> Option<WeatherSnapshot> {
        let raw = self.storage.get(WEATHER_KEY).ok().flatten()?;
        let entry: CacheEntry = serde_json::from_str(&raw).ok()?;

        if entry.city.to_lowercase() != city.to_lowercase() {
            return None;
        }
        if now - entry.cached_at > CACHE_TTL_MILLIS {
            return None;
        }

        Some(entry.data)
    }

    /// Overwrite the slot with this city and snapshot.
    pub fn write(&self, city: &str, snapshot: &WeatherSnapshot) {
        self.write_at(city, snapshot, now_millis());
    }

    fn write_at(&self, city: &str, snapshot: &WeatherSnapshot, now: i64) {
        let entry = CacheEntry {
            city: city.to_string(),
            data: snapshot.clone(),
            cached_at: now,
        };

        match serde_json::to_string(&entry) {
            Ok(json) => {
                if let Err(err) = self.storage.set(WEATHER_KEY, &json) {
                    debug!(error = %err, "ignoring cache write failure");
                }
            }
            Err(err) => debug!(error = %err, "ignoring cache serialization failure"),
        }
    }

    /// Drop the snapshot slot.
    pub fn clear(&self) {
        if let Err(err) = self.storage.remove(WEATHER_KEY) {
            debug!(error = %err, "ignoring cache clear failure");
        }
    }

    pub fn last_city(&self) -> Option<String> {
        self.storage.get(LAST_CITY_KEY).ok().flatten().filter(|city| !city.is_empty())
    }

    pub fn set_last_city(&self, city: &str) {
        if let Err(err) = self.storage.set(LAST_CITY_KEY, city) {
            debug!(error = %err, "ignoring last-city write failure");
        }
    }

    /// Stored preference wins; with nothing stored the host's system signal
    /// applies; a corrupt value or unreadable storage reads as light.
    pub fn dark_mode(&self) -> bool {
        match self.storage.get(DARK_MODE_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or(false),
            Ok(None) => self.system_dark,
            Err(_) => false,
        }
    }

    pub fn set_dark_mode(&self, dark: bool) {
        if let Err(err) = self.storage.set(DARK_MODE_KEY, &dark.to_string()) {
            debug!(error = %err, "ignoring dark-mode write failure");
        }
    }
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}
