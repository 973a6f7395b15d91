use crate::services::weather_service::WeatherError as UiWeatherError;
use cityweather_core::{AppError, WeatherError};

impl From<UiWeatherError> for AppError {
    fn from(e: UiWeatherError) -> Self {
        match e {
            UiWeatherError::Network(s) => AppError::Weather(WeatherError::ApiError(s)),
            UiWeatherError::Api { status, message } => {
                AppError::Weather(WeatherError::ApiError(format!("{}: {}", status, message)))
            }
            UiWeatherError::CityNotFound(c) => AppError::Weather(WeatherError::CityNotFound(c)),
            UiWeatherError::InvalidApiKey => AppError::Weather(WeatherError::InvalidApiKey),
            UiWeatherError::MissingData(s) => AppError::Weather(WeatherError::MissingData(s)),
        }
    }
}
