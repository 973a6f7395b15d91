//! Application services shared by every screen.
//!
//! `AppServices` owns the tokio runtime, the HTTP clients, the favorites
//! repository and the mpsc channels that carry async results back to the
//! UI thread. Models hold an `Arc<AppServices>` and poll their channel.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;

use anyhow::{Context, Result};
use parking_lot::Mutex;

use cityweather_cities::CityClient;
use cityweather_core::Config;
use cityweather_weather::{
    FavoritesRepository, FileKeyValueStore, LocalFavoritesRepository, WeatherProvider,
};

/// Message types for the city service channel
pub use crate::services::CityServiceMessage;

/// Message types for the weather service channel
pub use crate::services::WeatherServiceMessage;

pub struct AppServices {
    /// Tokio runtime for async operations
    runtime: tokio::runtime::Runtime,

    config: Arc<Config>,

    city_client: Arc<CityClient>,

    weather_provider: Arc<WeatherProvider>,

    /// Favorites persistence (local key-value storage)
    favorites: Arc<dyn FavoritesRepository>,

    /// City service channel sender
    city_service_tx: Sender<CityServiceMessage>,

    /// City service channel receiver
    city_service_rx: Mutex<Receiver<CityServiceMessage>>,

    /// Weather service channel sender
    weather_service_tx: Sender<WeatherServiceMessage>,

    /// Weather service channel receiver
    weather_service_rx: Mutex<Receiver<WeatherServiceMessage>>,
}

impl AppServices {
    /// Build services from configuration. Favorites are stored in
    /// `local_storage.json` inside the config directory.
    pub fn init(config: Config) -> Result<Arc<Self>> {
        let city_client =
            CityClient::from_config(&config.cities).context("Failed to create city client")?;
        let weather_provider = WeatherProvider::from_config(&config.weather)
            .context("Failed to create weather provider")?;
        let store = FileKeyValueStore::new(config.local_storage_path());
        tracing::info!("Local storage at {:?}", store.path());

        Self::with_parts(
            config,
            city_client,
            weather_provider,
            Arc::new(LocalFavoritesRepository::new(store)),
        )
    }

    /// Build services from already constructed parts.
    pub fn with_parts(
        config: Config,
        city_client: CityClient,
        weather_provider: WeatherProvider,
        favorites: Arc<dyn FavoritesRepository>,
    ) -> Result<Arc<Self>> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("cityweather-tokio")
            .build()
            .context("Failed to create tokio runtime")?;

        let (city_service_tx, city_service_rx) = mpsc::channel();
        let (weather_service_tx, weather_service_rx) = mpsc::channel();

        tracing::info!("AppServices initialized");

        Ok(Arc::new(Self {
            runtime,
            config: Arc::new(config),
            city_client: Arc::new(city_client),
            weather_provider: Arc::new(weather_provider),
            favorites,
            city_service_tx,
            city_service_rx: Mutex::new(city_service_rx),
            weather_service_tx,
            weather_service_rx: Mutex::new(weather_service_rx),
        }))
    }

    pub fn runtime(&self) -> &tokio::runtime::Runtime {
        &self.runtime
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn city_client(&self) -> Arc<CityClient> {
        self.city_client.clone()
    }

    pub fn weather_provider(&self) -> Arc<WeatherProvider> {
        self.weather_provider.clone()
    }

    pub fn favorites(&self) -> Arc<dyn FavoritesRepository> {
        self.favorites.clone()
    }

    pub fn city_sender(&self) -> &Sender<CityServiceMessage> {
        &self.city_service_tx
    }

    pub fn weather_sender(&self) -> &Sender<WeatherServiceMessage> {
        &self.weather_service_tx
    }

    /// Non-blocking receive of the next city service message.
    pub fn try_recv_city_message(&self) -> Option<CityServiceMessage> {
        match self.city_service_rx.lock().try_recv() {
            Ok(msg) => Some(msg),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                tracing::warn!("City service channel disconnected");
                None
            }
        }
    }

    /// Non-blocking receive of the next weather service message.
    pub fn try_recv_weather_message(&self) -> Option<WeatherServiceMessage> {
        match self.weather_service_rx.lock().try_recv() {
            Ok(msg) => Some(msg),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                tracing::warn!("Weather service channel disconnected");
                None
            }
        }
    }
}
