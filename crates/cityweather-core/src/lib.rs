pub mod config;
pub mod error;
pub mod load_state;

pub use config::{CitiesConfig, Config, UiConfig, UnitPreference, WeatherConfig};
pub use error::{
    AppError, CityDataError, ConfigError, NetworkError, RouteError, StorageError, WeatherError,
};
pub use load_state::LoadState;

use anyhow::Result;

/// Initialize the core application
pub fn init() -> Result<()> {
    // Initialize tracing/logging. Stdout belongs to the screen, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))?;

    tracing::info!("cityweather core initialized");
    Ok(())
}
