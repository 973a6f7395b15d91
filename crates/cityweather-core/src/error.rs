//! Centralized error types for the cityweather application.
//!
//! This module provides a typed error hierarchy that:
//! - Enables precise error handling throughout the codebase
//! - Provides user-friendly messages suitable for display on screen
//! - Preserves full error context for debugging/logging

use thiserror::Error;

/// Top-level application error type.
///
/// All errors in the application should be convertible to this type.
/// Use `user_message()` to get a screen-appropriate message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("City data error: {0}")]
    CityData(#[from] CityDataError),

    #[error("Weather service error: {0}")]
    Weather(#[from] WeatherError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Route error: {0}")]
    Route(#[from] RouteError),
}

impl AppError {
    /// Returns a user-friendly message suitable for display on screen.
    ///
    /// These messages are designed to be actionable and non-technical.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Network(e) => e.user_message(),
            AppError::CityData(e) => e.user_message(),
            AppError::Weather(e) => e.user_message(),
            AppError::Storage(e) => e.user_message(),
            AppError::Route(e) => e.user_message(),
        }
    }
}

/// Network-related errors (HTTP, connectivity).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => {
                "Unable to connect. Check your internet connection."
            }
            NetworkError::Timeout => "The request timed out. Please try again.",
        }
    }
}

/// Configuration errors.
///
/// Raised through `anyhow` by config loading; callers can downcast for
/// `user_message()`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
        }
    }
}

/// City data source errors (paginated city listing).
#[derive(Debug, Error)]
pub enum CityDataError {
    #[error("City API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Unexpected city data: {0}")]
    InvalidData(String),
}

impl CityDataError {
    pub fn user_message(&self) -> &'static str {
        match self {
            CityDataError::ApiError { status, .. } if *status >= 500 => {
                "The city directory is having issues. Scroll again to retry."
            }
            CityDataError::ApiError { .. } => "Could not load more cities. Scroll again to retry.",
            CityDataError::InvalidData(_) => {
                "Received unexpected city data. Scroll again to retry."
            }
        }
    }
}

/// Weather service errors.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("City not found: {0}")]
    CityNotFound(String),

    #[error("Weather API error: {0}")]
    ApiError(String),

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Weather data incomplete: {0}")]
    MissingData(String),
}

impl WeatherError {
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::InvalidApiKey => "Weather API key is invalid. Check settings.",
            WeatherError::CityNotFound(_)
            | WeatherError::ApiError(_)
            | WeatherError::MissingData(_) => {
                "Error fetching weather data. Please try again later."
            }
        }
    }
}

/// Local key-value storage errors (favorites persistence).
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to read local storage: {0}")]
    ReadFailed(String),

    #[error("Failed to write local storage: {0}")]
    WriteFailed(String),

    #[error("Stored data is corrupted: {0}")]
    Corrupt(String),
}

impl StorageError {
    pub fn user_message(&self) -> &'static str {
        match self {
            StorageError::ReadFailed(_) => "Could not read saved favorites.",
            StorageError::WriteFailed(_) => "Could not save favorites. Please try again.",
            StorageError::Corrupt(_) => "Saved favorites were unreadable and have been reset.",
        }
    }
}

/// Route resolution errors.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("City name is missing from the route")]
    MissingCityName,
}

impl RouteError {
    pub fn user_message(&self) -> &'static str {
        match self {
            // Displayed exactly like a failed weather fetch.
            RouteError::MissingCityName => "Error fetching weather data. Please try again later.",
        }
    }
}
