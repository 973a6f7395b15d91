use chrono::{DateTime, Utc};
use cityweather_core::UnitPreference;
use serde::{Deserialize, Serialize};

/// Pressure is reported in hectopascals regardless of unit system.
pub const PRESSURE_UNIT: &str = "hPa";

/// Unit system for weather requests and labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    /// Value of the `units` query parameter
    pub fn as_query(&self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
        }
    }

    /// Temperature scale letter (C/F)
    pub fn temperature_unit(&self) -> &'static str {
        match self {
            Self::Metric => "C",
            Self::Imperial => "F",
        }
    }

    pub fn wind_speed_unit(&self) -> &'static str {
        match self {
            Self::Metric => "m/s",
            Self::Imperial => "mph",
        }
    }

    /// Label of the button selecting this system
    pub fn button_label(&self) -> &'static str {
        match self {
            Self::Metric => "Celsius",
            Self::Imperial => "Fahrenheit",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "metric" | "celsius" | "c" => Some(Self::Metric),
            "imperial" | "fahrenheit" | "f" => Some(Self::Imperial),
            _ => None,
        }
    }
}

impl From<UnitPreference> for UnitSystem {
    fn from(pref: UnitPreference) -> Self {
        match pref {
            UnitPreference::Metric => Self::Metric,
            UnitPreference::Imperial => Self::Imperial,
        }
    }
}

/// Icon categories for known weather descriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherIcon {
    Sun,
    CloudSun,
    Cloud,
    CloudShowersHeavy,
    Bolt,
    Snowflake,
    Smog,
}

impl WeatherIcon {
    /// Look up the icon for a free-text description.
    /// Unknown descriptions have no icon.
    pub fn from_description(description: &str) -> Option<Self> {
        match description.trim().to_lowercase().as_str() {
            "clear sky" => Some(Self::Sun),
            "few clouds" => Some(Self::CloudSun),
            "scattered clouds" | "broken clouds" => Some(Self::Cloud),
            "shower rain" | "rain" => Some(Self::CloudShowersHeavy),
            "thunderstorm" => Some(Self::Bolt),
            "snow" => Some(Self::Snowflake),
            "mist" => Some(Self::Smog),
            _ => None,
        }
    }

    pub fn icon_name(&self) -> &'static str {
        match self {
            Self::Sun => "sun",
            Self::CloudSun => "cloud_sun",
            Self::Cloud => "cloud",
            Self::CloudShowersHeavy => "cloud_showers_heavy",
            Self::Bolt => "bolt",
            Self::Snowflake => "snowflake",
            Self::Smog => "smog",
        }
    }

    /// Terminal glyph
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Sun => "☀",
            Self::CloudSun => "⛅",
            Self::Cloud => "☁",
            Self::CloudShowersHeavy => "☔",
            Self::Bolt => "⚡",
            Self::Snowflake => "❄",
            Self::Smog => "🌫",
        }
    }
}

/// Current conditions for one city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temperature: f64,
    pub description: String,
    pub humidity: f64,
    pub wind_speed: f64,
    pub pressure: f64,
}

impl WeatherSnapshot {
    pub fn icon(&self) -> Option<WeatherIcon> {
        WeatherIcon::from_description(&self.description)
    }

    /// e.g. "15°C"
    pub fn temperature_display(&self, units: UnitSystem) -> String {
        format!("{}°{}", self.temperature, units.temperature_unit())
    }

    pub fn wind_speed_display(&self, units: UnitSystem) -> String {
        format!("{} {}", self.wind_speed, units.wind_speed_unit())
    }

    pub fn humidity_display(&self) -> String {
        format!("{}%", self.humidity)
    }

    pub fn pressure_display(&self) -> String {
        format!("{} {}", self.pressure, PRESSURE_UNIT)
    }
}

/// Geographic coordinates resolved by the weather API
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// A snapshot together with the request it answers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    /// City name as requested (the route parameter)
    pub city: String,
    /// City name as resolved by the API
    pub resolved_name: String,
    pub coordinates: Coordinates,
    pub units: UnitSystem,
    pub snapshot: WeatherSnapshot,
    pub fetched_at: DateTime<Utc>,
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("City not found: {0}")]
    CityNotFound(String),
    #[error("Invalid API key")]
    InvalidApiKey,
    #[error("Weather API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("Missing data: {0}")]
    MissingData(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid endpoint: {0}")]
    Url(#[from] url::ParseError),
}
