use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::{config::Config, error::WeatherError, model::Place};

use super::WeatherProvider;

/// OpenWeatherMap client: direct/reverse geocoding plus the One Call
/// aggregate endpoint.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    geo_base: String,
    data_base: String,
    lang: String,
    http: Client,
}

impl OpenWeatherProvider {
    /// Build the client from config.
    ///
    /// A missing or empty API key fails immediately, so the credential check
    /// always happens before a request is issued.
    pub fn from_config(config: &Config) -> Result<Self, WeatherError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| WeatherError::api("Kunci API tidak dikonfigurasi"))?;

        Ok(Self {
            api_key,
            geo_base: config.geo_base_url.clone(),
            data_base: config.data_base_url.clone(),
            lang: config.lang.clone(),
            http: Client::new(),
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn resolve_by_name(&self, city: &str) -> Result<Place, WeatherError> {
        let url = format!("{}/direct", self.geo_base);

        let res = self
            .http
            .get(&url)
            .query(&[("q", city), ("limit", "1"), ("appid", self.api_key.as_str())])
            .send()
            .await?;

        if !res.status().is_success() {
            debug!(status = %res.status(), city, "geocoding request rejected");
            return Err(WeatherError::api("Gagal mencari koordinat kota"));
        }

        let hits: Vec<OwPlace> = res.json().await?;

        hits.into_iter()
            .next()
            .map(Place::from)
            .ok_or_else(|| WeatherError::not_found(format!("Kota \"{city}\" tidak ditemukan")))
    }

    async fn resolve_by_coords(&self, lat: f64, lon: f64) -> Result<Place, WeatherError> {
        let url = format!("{}/reverse", self.geo_base);
        let lat = lat.to_string();
        let lon = lon.to_string();

        let res = self
            .http
            .get(&url)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("limit", "1"),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !res.status().is_success() {
            debug!(status = %res.status(), lat, lon, "reverse geocoding request rejected");
            return Err(WeatherError::api("Gagal mengidentifikasi lokasi"));
        }

        let hits: Vec<OwPlace> = res.json().await?;

        hits.into_iter()
            .next()
            .map(Place::from)
            .ok_or_else(|| WeatherError::not_found("Nama lokasi tidak ditemukan"))
    }

    async fn fetch_conditions(&self, lat: f64, lon: f64) -> Result<OwOneCall, WeatherError> {
        let url = format!("{}/onecall", self.data_base);
        let lat = lat.to_string();
        let lon = lon.to_string();

        let res = self
            .http
            .get(&url)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("exclude", "minutely,alerts"),
                ("units", "metric"),
                ("lang", self.lang.as_str()),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await?;

        match res.status() {
            status if status.is_success() => Ok(res.json().await?),
            StatusCode::UNAUTHORIZED => {
                Err(WeatherError::api("Kunci API tidak valid atau langganan tidak aktif"))
            }
            status => {
                debug!(%status, lat, lon, "one call request rejected");
                Err(WeatherError::api("Gagal mengambil data cuaca"))
            }
        }
    }
}

/// Geocoding hit as returned by `/direct` and `/reverse`.
#[derive(Debug, Clone, Deserialize)]
pub struct OwPlace {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub country: String,
    #[serde(default)]
    pub state: Option<String>,
}

impl From<OwPlace> for Place {
    fn from(hit: OwPlace) -> Self {
        Place {
            name: hit.name,
            country: hit.country,
            state: hit.state,
            lat: hit.lat,
            lon: hit.lon,
        }
    }
}

/// One Call aggregate payload. Only the fields the pipeline reads are
/// declared; serde skips the rest.
#[derive(Debug, Clone, Deserialize)]
pub struct OwOneCall {
    /// Seconds east of UTC for the queried place.
    #[serde(default)]
    pub timezone_offset: i64,
    pub current: OwCurrent,
    pub hourly: Vec<OwHourly>,
    pub daily: Vec<OwDaily>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwCurrent {
    pub dt: i64,
    #[serde(default)]
    pub sunrise: i64,
    #[serde(default)]
    pub sunset: i64,
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub wind_speed: f64,
    #[serde(default)]
    pub weather: Vec<OwWeather>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwHourly {
    pub dt: i64,
    pub temp: f64,
    #[serde(default)]
    pub weather: Vec<OwWeather>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwDaily {
    pub dt: i64,
    pub temp: OwDailyTemp,
    #[serde(default)]
    pub weather: Vec<OwWeather>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwDailyTemp {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwWeather {
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server_uri: &str) -> Config {
        Config {
            api_key: Some("test-key".to_string()),
            geo_base_url: server_uri.to_string(),
            data_base_url: server_uri.to_string(),
            lang: "id".to_string(),
        }
    }

    fn provider_for(server: &MockServer) -> OpenWeatherProvider {
        OpenWeatherProvider::from_config(&config_for(&server.uri())).expect("provider")
    }

    fn onecall_json(hours: usize, days: usize) -> serde_json::Value {
        let weather = json!([{ "main": "Clouds", "description": "awan mendung", "icon": "04d" }]);

        json!({
            "timezone_offset": 25200,
            "current": {
                "dt": 1_700_000_000i64,
                "sunrise": 1_699_980_000i64,
                "sunset": 1_700_023_200i64,
                "temp": 20.0,
                "feels_like": 19.4,
                "humidity": 65,
                "wind_speed": 5.0,
                "weather": weather.clone(),
            },
            "hourly": (0..hours).map(|i| json!({
                "dt": 1_700_000_000i64 + (i as i64) * 3600,
                "temp": 19.0,
                "weather": weather.clone(),
            })).collect::<Vec<_>>(),
            "daily": (0..days).map(|i| json!({
                "dt": 1_700_000_000i64 + (i as i64) * 86_400,
                "temp": { "min": 17.2, "max": 23.8 },
                "weather": weather.clone(),
            })).collect::<Vec<_>>(),
        })
    }

    #[tokio::test]
    async fn resolve_by_name_returns_best_match() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/direct"))
            .and(query_param("q", "London"))
            .and(query_param("limit", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "name": "London",
                "lat": 51.5074,
                "lon": -0.1278,
                "country": "GB",
            }])))
            .mount(&server)
            .await;

        let place = provider_for(&server).resolve_by_name("London").await.unwrap();

        assert_eq!(place.name, "London");
        assert_eq!(place.country, "GB");
        assert_eq!(place.state, None);
        assert!((place.lat - 51.5074).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn resolve_by_name_empty_result_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/direct"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let err = provider_for(&server).resolve_by_name("NonExistentCity").await.unwrap_err();

        assert!(matches!(err, WeatherError::NotFound(_)));
        assert_eq!(err.message(), "Kota \"NonExistentCity\" tidak ditemukan");
    }

    #[tokio::test]
    async fn resolve_by_name_server_error_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/direct"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = provider_for(&server).resolve_by_name("London").await.unwrap_err();

        assert_eq!(err, WeatherError::api("Gagal mencari koordinat kota"));
    }

    #[tokio::test]
    async fn resolve_by_coords_empty_result_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let err = provider_for(&server).resolve_by_coords(0.0, 0.0).await.unwrap_err();

        assert_eq!(err, WeatherError::not_found("Nama lokasi tidak ditemukan"));
    }

    #[tokio::test]
    async fn fetch_conditions_decodes_native_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/onecall"))
            .and(query_param("exclude", "minutely,alerts"))
            .and(query_param("units", "metric"))
            .and(query_param("lang", "id"))
            .respond_with(ResponseTemplate::new(200).set_body_json(onecall_json(24, 7)))
            .mount(&server)
            .await;

        let raw = provider_for(&server).fetch_conditions(51.5074, -0.1278).await.unwrap();

        assert_eq!(raw.timezone_offset, 25200);
        assert_eq!(raw.hourly.len(), 24);
        assert_eq!(raw.daily.len(), 7);
        assert_eq!(raw.current.humidity, 65);
        assert_eq!(raw.current.weather[0].main, "Clouds");
    }

    #[tokio::test]
    async fn fetch_conditions_maps_unauthorized_to_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/onecall"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = provider_for(&server).fetch_conditions(0.0, 0.0).await.unwrap_err();

        assert_eq!(err, WeatherError::api("Kunci API tidak valid atau langganan tidak aktif"));
    }

    #[tokio::test]
    async fn fetch_conditions_other_failure_is_generic_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/onecall"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = provider_for(&server).fetch_conditions(0.0, 0.0).await.unwrap_err();

        assert_eq!(err, WeatherError::api("Gagal mengambil data cuaca"));
    }

    #[tokio::test]
    async fn malformed_body_is_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/onecall"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = provider_for(&server).fetch_conditions(0.0, 0.0).await.unwrap_err();

        assert!(matches!(err, WeatherError::Network(_)));
        assert_eq!(err.message(), "Masalah jaringan. Silakan periksa koneksi Anda.");
    }
}
