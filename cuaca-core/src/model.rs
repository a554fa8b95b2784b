use serde::{Deserialize, Serialize};

/// Resolved geographic identity for a query. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub country: String,
    pub state: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

/// Current conditions for a resolved place, in display units: whole degrees
/// Celsius, wind in km/h, epoch seconds for the timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub city: String,
    pub country: String,
    pub state: Option<String>,
    pub temperature: i32,
    pub feels_like: i32,
    pub humidity: u8,
    pub wind_speed_kmh: u32,
    pub description: String,
    pub icon: String,
    pub condition: String,
    pub sunrise: i64,
    pub sunset: i64,
    pub observed_at: i64,
}

/// One hour of forecast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyEntry {
    pub time: i64,
    pub temperature: i32,
    pub icon: String,
    pub description: String,
}

/// One day of forecast. `day_name` is the localized weekday for the entry's
/// date, precomputed so renderers never redo timezone math.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyEntry {
    pub date: i64,
    pub day_name: String,
    pub temp_high: i32,
    pub temp_low: i32,
    pub icon: String,
    pub description: String,
}

/// The normalized current/hourly/daily bundle: the unit of data handed to
/// renderers and the unit stored in the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub current: CurrentConditions,
    pub hourly: Vec<HourlyEntry>,
    pub daily: Vec<DailyEntry>,
}
