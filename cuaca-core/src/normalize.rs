//! Pure conversion from the provider's native schema to the display model.

use chrono::{DateTime, Datelike};

use crate::model::{CurrentConditions, DailyEntry, HourlyEntry, Place, WeatherSnapshot};
use crate::provider::openweather::{OwOneCall, OwWeather};

/// Hourly entries kept from the provider series.
pub const HOURLY_CAP: usize = 24;
/// Daily entries kept from the provider series.
pub const DAILY_CAP: usize = 7;

/// Indonesian weekday names, Sunday first to line up with day-of-week 0.
const DAY_NAMES: [&str; 7] = ["Minggu", "Senin", "Selasa", "Rabu", "Kamis", "Jumat", "Sabtu"];

const UNKNOWN: &str = "Unknown";
const DEFAULT_ICON: &str = "01d";

/// Build the display snapshot from a raw One Call payload and its resolved
/// place. Pure: no I/O, no failure modes. Provider order is preserved, the
/// hourly/daily series are truncated to their caps, and missing weather tags
/// fall back to `"Unknown"` / icon `"01d"`.
pub fn snapshot(raw: &OwOneCall, place: &Place) -> WeatherSnapshot {
    let current = CurrentConditions {
        city: place.name.clone(),
        country: place.country.clone(),
        state: place.state.clone(),
        temperature: round(raw.current.temp),
        feels_like: round(raw.current.feels_like),
        humidity: raw.current.humidity,
        wind_speed_kmh: wind_kmh(raw.current.wind_speed),
        description: description_of(&raw.current.weather),
        icon: icon_of(&raw.current.weather),
        condition: condition_of(&raw.current.weather),
        sunrise: raw.current.sunrise,
        sunset: raw.current.sunset,
        observed_at: raw.current.dt,
    };

    let hourly = raw
        .hourly
        .iter()
        .take(HOURLY_CAP)
        .map(|hour| HourlyEntry {
            time: hour.dt,
            temperature: round(hour.temp),
            icon: icon_of(&hour.weather),
            description: description_of(&hour.weather),
        })
        .collect();

    let daily = raw
        .daily
        .iter()
        .take(DAILY_CAP)
        .map(|day| DailyEntry {
            date: day.dt,
            day_name: day_name(day.dt, raw.timezone_offset).to_string(),
            temp_high: round(day.temp.max),
            temp_low: round(day.temp.min),
            icon: icon_of(&day.weather),
            description: description_of(&day.weather),
        })
        .collect();

    WeatherSnapshot { current, hourly, daily }
}

/// Kelvin to rounded Celsius. The One Call request asks for metric units so
/// the pipeline never converts; exported for callers holding absolute-scale
/// values.
pub fn kelvin_to_celsius(kelvin: f64) -> i32 {
    round(kelvin - 273.15)
}

/// Weekday name for an epoch timestamp, evaluated at the given UTC offset
/// (seconds east) rather than in the host timezone.
pub fn day_name(epoch: i64, offset_seconds: i64) -> &'static str {
    let local = DateTime::from_timestamp(epoch.saturating_add(offset_seconds), 0)
        .unwrap_or(DateTime::UNIX_EPOCH);

    DAY_NAMES[local.weekday().num_days_from_sunday() as usize]
}

// f64::round is round-half-away-from-zero, which is the rounding the display
// model specifies.
fn round(value: f64) -> i32 {
    value.round() as i32
}

fn wind_kmh(meters_per_second: f64) -> u32 {
    (meters_per_second * 3.6).round() as u32
}

fn description_of(tags: &[OwWeather]) -> String {
    tags.first().map(|w| w.description.clone()).unwrap_or_else(|| UNKNOWN.to_string())
}

fn icon_of(tags: &[OwWeather]) -> String {
    tags.first().map(|w| w.icon.clone()).unwrap_or_else(|| DEFAULT_ICON.to_string())
}

fn condition_of(tags: &[OwWeather]) -> String {
    tags.first().map(|w| w.main.clone()).unwrap_or_else(|| UNKNOWN.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::openweather::{OwCurrent, OwDaily, OwDailyTemp, OwHourly};

    fn tagged(main: &str, description: &str, icon: &str) -> Vec<OwWeather> {
        vec![OwWeather {
            main: main.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
        }]
    }

    fn sample_place() -> Place {
        Place {
            name: "London".to_string(),
            country: "GB".to_string(),
            state: None,
            lat: 51.5074,
            lon: -0.1278,
        }
    }

    fn sample_payload(hours: usize, days: usize) -> OwOneCall {
        OwOneCall {
            timezone_offset: 0,
            current: OwCurrent {
                dt: 1_700_000_000,
                sunrise: 1_699_980_000,
                sunset: 1_700_023_200,
                temp: 20.0,
                feels_like: 19.4,
                humidity: 65,
                wind_speed: 5.0,
                weather: tagged("Clouds", "awan mendung", "04d"),
            },
            hourly: (0..hours)
                .map(|i| OwHourly {
                    dt: 1_700_000_000 + (i as i64) * 3600,
                    temp: 19.0,
                    weather: tagged("Clouds", "awan mendung", "04d"),
                })
                .collect(),
            daily: (0..days)
                .map(|i| OwDaily {
                    dt: 1_700_000_000 + (i as i64) * 86_400,
                    temp: OwDailyTemp { min: 17.2, max: 23.8 },
                    weather: tagged("Clouds", "awan mendung", "04d"),
                })
                .collect(),
        }
    }

    #[test]
    fn kelvin_freezing_point_is_zero_celsius() {
        assert_eq!(kelvin_to_celsius(273.15), 0);
        assert_eq!(kelvin_to_celsius(293.15), 20);
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        let mut raw = sample_payload(1, 1);
        raw.current.temp = -2.5;
        raw.current.feels_like = 2.5;

        let snap = snapshot(&raw, &sample_place());

        assert_eq!(snap.current.temperature, -3);
        assert_eq!(snap.current.feels_like, 3);
    }

    #[test]
    fn wind_speed_converts_to_rounded_kmh() {
        let snap = snapshot(&sample_payload(1, 1), &sample_place());
        // 5.0 m/s * 3.6 = 18 km/h
        assert_eq!(snap.current.wind_speed_kmh, 18);
    }

    #[test]
    fn series_truncate_to_their_caps_from_the_head() {
        let snap = snapshot(&sample_payload(48, 10), &sample_place());

        assert_eq!(snap.hourly.len(), HOURLY_CAP);
        assert_eq!(snap.daily.len(), DAILY_CAP);
        assert_eq!(snap.hourly[0].time, 1_700_000_000);
        assert_eq!(snap.daily[0].date, 1_700_000_000);
    }

    #[test]
    fn short_series_pass_through_untouched() {
        let snap = snapshot(&sample_payload(6, 3), &sample_place());

        assert_eq!(snap.hourly.len(), 6);
        assert_eq!(snap.daily.len(), 3);
    }

    #[test]
    fn missing_weather_tags_fall_back_to_defaults() {
        let mut raw = sample_payload(1, 1);
        raw.current.weather.clear();
        raw.hourly[0].weather.clear();

        let snap = snapshot(&raw, &sample_place());

        assert_eq!(snap.current.description, "Unknown");
        assert_eq!(snap.current.condition, "Unknown");
        assert_eq!(snap.current.icon, "01d");
        assert_eq!(snap.hourly[0].icon, "01d");
    }

    #[test]
    fn place_identity_is_embedded() {
        let snap = snapshot(&sample_payload(1, 1), &sample_place());

        assert_eq!(snap.current.city, "London");
        assert_eq!(snap.current.country, "GB");
        assert_eq!(snap.current.state, None);
        assert_eq!(snap.current.sunrise, 1_699_980_000);
        assert_eq!(snap.current.observed_at, 1_700_000_000);
    }

    #[test]
    fn day_names_use_the_payload_offset() {
        // 2020-09-13T23:00:00Z was a Sunday; two hours east it is already Monday.
        let sunday_late_utc = 1_600_038_000;

        assert_eq!(day_name(sunday_late_utc, 0), "Minggu");
        assert_eq!(day_name(sunday_late_utc, 7200), "Senin");
        // The Unix epoch began on a Thursday.
        assert_eq!(day_name(0, 0), "Kamis");
    }

    #[test]
    fn normalizing_twice_yields_identical_snapshots() {
        let raw = sample_payload(24, 7);
        let place = sample_place();

        assert_eq!(snapshot(&raw, &place), snapshot(&raw, &place));
    }
}
