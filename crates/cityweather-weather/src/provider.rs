//! Current-weather lookups by city name (OpenWeatherMap).

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use cityweather_core::WeatherConfig;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use url::Url;

use crate::types::{Coordinates, UnitSystem, WeatherError, WeatherReport, WeatherSnapshot};

const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize)]
struct OwmResponse {
    coord: Option<OwmCoord>,
    #[serde(default)]
    weather: Vec<OwmCondition>,
    main: Option<OwmMain>,
    wind: Option<OwmWind>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwmCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwmCondition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    humidity: f64,
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct OwmWind {
    speed: f64,
}

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    base_url: Url,
    api_key: String,
}

impl WeatherProvider {
    pub fn new(api_url: &str, api_key: impl Into<String>) -> Result<Self, WeatherError> {
        Self::with_timeout(api_url, api_key, Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    pub fn with_timeout(
        api_url: &str,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client: Arc::new(client),
            base_url: Url::parse(api_url)?,
            api_key: api_key.into(),
        })
    }

    pub fn from_config(config: &WeatherConfig) -> Result<Self, WeatherError> {
        Self::with_timeout(
            &config.api_url,
            config.api_key.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Fetch current weather for `city` in the given unit system.
    pub async fn fetch(&self, city: &str, units: UnitSystem) -> Result<WeatherReport, WeatherError> {
        tracing::debug!("Fetching weather for {} ({})", city, units.as_query());

        let response = self
            .client
            .get(self.base_url.clone())
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", units.as_query()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::NOT_FOUND => WeatherError::CityNotFound(city.to_string()),
                StatusCode::UNAUTHORIZED => WeatherError::InvalidApiKey,
                _ => WeatherError::Api {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        let body: OwmResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::Parse(e.to_string()))?;

        let report = into_report(city, units, body)?;
        tracing::info!(
            "Weather for {}: {} ({})",
            city,
            report.snapshot.temperature_display(units),
            report.snapshot.description
        );
        Ok(report)
    }
}

fn into_report(city: &str, units: UnitSystem, body: OwmResponse) -> Result<WeatherReport, WeatherError> {
    let main = body
        .main
        .ok_or_else(|| WeatherError::MissingData("main".to_string()))?;
    let condition = body
        .weather
        .into_iter()
        .next()
        .ok_or_else(|| WeatherError::MissingData("weather[0]".to_string()))?;
    let wind = body
        .wind
        .ok_or_else(|| WeatherError::MissingData("wind".to_string()))?;
    let coord = body
        .coord
        .ok_or_else(|| WeatherError::MissingData("coord".to_string()))?;

    Ok(WeatherReport {
        city: city.to_string(),
        resolved_name: body.name.unwrap_or_else(|| city.to_string()),
        coordinates: Coordinates {
            latitude: coord.lat,
            longitude: coord.lon,
        },
        units,
        snapshot: WeatherSnapshot {
            temperature: main.temp,
            description: condition.description,
            humidity: main.humidity,
            wind_speed: wind.speed,
            pressure: main.pressure,
        },
        fetched_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: serde_json::Value) -> OwmResponse {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_into_report_maps_fields() {
        let body = parse(serde_json::json!({
            "coord": { "lon": 13.41, "lat": 52.52 },
            "weather": [{ "id": 800, "main": "Clear", "description": "clear sky", "icon": "01d" }],
            "main": { "temp": 15, "humidity": 60, "pressure": 1012, "feels_like": 14.2 },
            "wind": { "speed": 3, "deg": 270 },
            "name": "Berlin"
        }));

        let report = into_report("berlin", UnitSystem::Metric, body).unwrap();
        assert_eq!(report.city, "berlin");
        assert_eq!(report.resolved_name, "Berlin");
        assert_eq!(report.snapshot.temperature, 15.0);
        assert_eq!(report.snapshot.description, "clear sky");
        assert_eq!(report.snapshot.humidity, 60.0);
        assert_eq!(report.snapshot.wind_speed, 3.0);
        assert_eq!(report.snapshot.pressure, 1012.0);
        assert_eq!(report.coordinates.latitude, 52.52);
    }

    #[test]
    fn test_missing_weather_entry_is_missing_data() {
        let body = parse(serde_json::json!({
            "coord": { "lon": 0.0, "lat": 0.0 },
            "weather": [],
            "main": { "temp": 1, "humidity": 2, "pressure": 3 },
            "wind": { "speed": 4 }
        }));

        let result = into_report("x", UnitSystem::Metric, body);
        assert!(matches!(result, Err(WeatherError::MissingData(_))));
    }

    #[test]
    fn test_missing_name_falls_back_to_request() {
        let body = parse(serde_json::json!({
            "coord": { "lon": 0.0, "lat": 0.0 },
            "weather": [{ "description": "mist" }],
            "main": { "temp": 1, "humidity": 2, "pressure": 3 },
            "wind": { "speed": 4 }
        }));

        let report = into_report("Foggy Bottom", UnitSystem::Imperial, body).unwrap();
        assert_eq!(report.resolved_name, "Foggy Bottom");
        assert_eq!(report.units, UnitSystem::Imperial);
    }

    #[test]
    fn test_rejects_invalid_endpoint() {
        assert!(matches!(
            WeatherProvider::new("::nope::", "key"),
            Err(WeatherError::Url(_))
        ));
    }
}
