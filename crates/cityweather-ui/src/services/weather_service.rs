//! Weather backend: async weather fetching.
//! All network work runs off the UI thread; results sent via mpsc.

use std::sync::Arc;

use cityweather_weather::{RequestKey, WeatherProvider, WeatherReport};

/// Error type for weather operations
#[derive(Debug, Clone)]
pub enum WeatherError {
    Network(String),
    CityNotFound(String),
    InvalidApiKey,
    Api { status: u16, message: String },
    MissingData(String),
}

impl std::fmt::Display for WeatherError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeatherError::Network(s) => write!(f, "Weather error: {}", s),
            WeatherError::CityNotFound(c) => write!(f, "City not found: {}", c),
            WeatherError::InvalidApiKey => write!(f, "Invalid weather API key"),
            WeatherError::Api { status, message } => {
                write!(f, "Weather API error ({}): {}", status, message)
            }
            WeatherError::MissingData(s) => write!(f, "Weather data incomplete: {}", s),
        }
    }
}

impl std::error::Error for WeatherError {}

impl From<cityweather_weather::WeatherError> for WeatherError {
    fn from(e: cityweather_weather::WeatherError) -> Self {
        use cityweather_weather::WeatherError as E;
        match e {
            E::Network(e) => WeatherError::Network(e.to_string()),
            E::CityNotFound(c) => WeatherError::CityNotFound(c),
            E::InvalidApiKey => WeatherError::InvalidApiKey,
            E::Api { status, message } => WeatherError::Api { status, message },
            E::MissingData(s) | E::Parse(s) => WeatherError::MissingData(s),
            E::Url(e) => WeatherError::Network(e.to_string()),
        }
    }
}

/// Messages sent from async operations back to the UI thread
#[derive(Debug)]
pub enum WeatherServiceMessage {
    /// Result of fetching weather for `key`
    FetchDone {
        key: RequestKey,
        result: Result<WeatherReport, WeatherError>,
    },
}

/// Request to fetch weather for `key` asynchronously.
/// Sends `FetchDone` on the channel when complete.
pub fn request_fetch(
    tx: &std::sync::mpsc::Sender<WeatherServiceMessage>,
    runtime: &tokio::runtime::Handle,
    provider: Arc<WeatherProvider>,
    key: RequestKey,
) {
    let tx = tx.clone();

    runtime.spawn(async move {
        let result = provider
            .fetch(&key.city, key.units)
            .await
            .map_err(WeatherError::from);
        if let Err(e) = &result {
            tracing::error!("Failed to fetch weather for {}: {}", key.city, e);
        }
        let _ = tx.send(WeatherServiceMessage::FetchDone { key, result });
    });
}
