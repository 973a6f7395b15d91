//! Integration tests for WeatherProvider using wiremock.

use cityweather_weather::{
    DetailState, DetailStatus, UnitSystem, WeatherError, WeatherIcon, WeatherProvider,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to create a current-weather body
fn test_weather(name: &str, temp: f64, description: &str) -> serde_json::Value {
    serde_json::json!({
        "coord": { "lon": 13.41, "lat": 52.52 },
        "weather": [{ "id": 800, "main": "Clear", "description": description, "icon": "01d" }],
        "base": "stations",
        "main": { "temp": temp, "feels_like": temp - 1.0, "pressure": 1012, "humidity": 60 },
        "wind": { "speed": 3, "deg": 250 },
        "name": name,
        "cod": 200
    })
}

fn provider_for(server: &MockServer) -> WeatherProvider {
    WeatherProvider::new(&format!("{}/data/2.5/weather", server.uri()), "test-key").unwrap()
}

#[tokio::test]
async fn test_fetch_metric_berlin() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "Berlin"))
        .and(query_param("appid", "test-key"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(test_weather("Berlin", 15.0, "clear sky")))
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let report = provider.fetch("Berlin", UnitSystem::Metric).await.unwrap();

    assert_eq!(report.city, "Berlin");
    assert_eq!(report.units, UnitSystem::Metric);
    assert!(report.snapshot.temperature_display(report.units).ends_with('C'));
    assert_eq!(report.snapshot.icon(), Some(WeatherIcon::Sun));
    assert_eq!(report.snapshot.humidity, 60.0);
    assert_eq!(report.snapshot.wind_speed, 3.0);
    assert_eq!(report.snapshot.pressure, 1012.0);
}

#[tokio::test]
async fn test_fetch_imperial_passes_units() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("units", "imperial"))
        .respond_with(ResponseTemplate::new(200).set_body_json(test_weather("Paris", 59.0, "few clouds")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let report = provider.fetch("Paris", UnitSystem::Imperial).await.unwrap();

    assert_eq!(report.snapshot.temperature_display(UnitSystem::Imperial), "59°F");
    assert_eq!(report.snapshot.wind_speed_display(UnitSystem::Imperial), "3 mph");
}

#[tokio::test]
async fn test_city_names_with_spaces_are_encoded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("q", "San José"))
        .respond_with(ResponseTemplate::new(200).set_body_json(test_weather("San José", 24.0, "rain")))
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let report = provider.fetch("San José", UnitSystem::Metric).await.unwrap();
    assert_eq!(report.snapshot.icon(), Some(WeatherIcon::CloudShowersHeavy));
}

#[tokio::test]
async fn test_unknown_description_has_no_icon() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(test_weather("Catania", 18.0, "volcanic ash")))
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let report = provider.fetch("Catania", UnitSystem::Metric).await.unwrap();
    assert_eq!(report.snapshot.description, "volcanic ash");
    assert_eq!(report.snapshot.icon(), None);
}

#[tokio::test]
async fn test_city_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "cod": "404",
            "message": "city not found"
        })))
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let result = provider.fetch("Atlantis", UnitSystem::Metric).await;
    assert!(matches!(result, Err(WeatherError::CityNotFound(ref c)) if c == "Atlantis"));
}

#[tokio::test]
async fn test_invalid_api_key() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "cod": 401,
            "message": "Invalid API key"
        })))
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let result = provider.fetch("Berlin", UnitSystem::Metric).await;
    assert!(matches!(result, Err(WeatherError::InvalidApiKey)));
}

#[tokio::test]
async fn test_server_error_mentions_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let err = provider
        .fetch("Berlin", UnitSystem::Metric)
        .await
        .unwrap_err()
        .to_string();
    assert!(err.contains("500"), "Error should mention 500 status: {}", err);
}

#[tokio::test]
async fn test_missing_fields_fail_detail_state() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "coord": { "lon": 1.0, "lat": 2.0 },
            "weather": [],
            "name": "Emptyville"
        })))
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let mut state = DetailState::new(Some("Emptyville".into()), UnitSystem::Metric);
    let key = state.begin_fetch().unwrap();

    let result = provider.fetch(&key.city, key.units).await;
    assert!(matches!(result, Err(WeatherError::MissingData(_))));

    state.apply_result(&key, result);
    assert!(matches!(state.status(), DetailStatus::Failed(_)));
}
