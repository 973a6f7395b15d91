//! City detail screen: current weather, unit switch and favorites.

use std::sync::Arc;

use cityweather_core::{AppError, RouteError};
use cityweather_weather::{
    ApplyOutcome, DetailFailure, DetailState, DetailStatus, FavoriteSet, RequestKey, UnitSystem,
};

use crate::app_services::{AppServices, WeatherServiceMessage};
use crate::error_mapping::storage_error;
use crate::services;

pub const ADD_FAVORITE_LABEL: &str = "Add to Favorites";
pub const REMOVE_FAVORITE_LABEL: &str = "Remove from Favorites";

pub struct CityDetailModel {
    services: Arc<AppServices>,
    state: DetailState,
    favorites: FavoriteSet,
    /// User-facing message for the current failure, if any
    error_message: Option<String>,
    /// Set when favorites could not be read or written
    storage_notice: Option<String>,
}

impl CityDetailModel {
    pub fn new(services: Arc<AppServices>) -> Self {
        let units = services.config().weather.default_units.into();
        Self {
            services,
            state: DetailState::new(None, units),
            favorites: FavoriteSet::new(),
            error_message: None,
            storage_notice: None,
        }
    }

    /// Show `city`: load favorites and fetch weather in the default units.
    pub fn mount(&mut self, city: Option<String>) {
        self.storage_notice = None;
        self.favorites = match self.services.favorites().load() {
            Ok(set) => set,
            Err(e) => {
                let app = storage_error(&e, false);
                tracing::error!("Failed to load favorites: {}", e);
                self.storage_notice = Some(app.user_message().to_string());
                FavoriteSet::new()
            }
        };

        let units = self.services.config().weather.default_units.into();
        self.state = DetailState::new(city, units);
        let key = self.state.begin_fetch();
        self.dispatch(key);
    }

    pub fn set_city(&mut self, city: Option<String>) {
        let key = self.state.set_city(city);
        self.dispatch(key);
    }

    pub fn set_units(&mut self, units: UnitSystem) {
        let key = self.state.set_units(units);
        self.dispatch(key);
    }

    /// Flip the current city's favorite flag and persist the set.
    /// Returns the new flag, or `None` without a city.
    pub fn toggle_favorite(&mut self) -> Option<bool> {
        let city = self.state.city()?.to_string();
        let now = self.favorites.toggle(&city);

        match self.services.favorites().save(&self.favorites) {
            Ok(()) => {
                tracing::info!(
                    "{} {} favorites",
                    if now { "Added to" } else { "Removed from" },
                    city
                );
                self.storage_notice = None;
            }
            Err(e) => {
                let app = storage_error(&e, true);
                tracing::error!("Failed to save favorites: {}", e);
                self.storage_notice = Some(app.user_message().to_string());
            }
        }

        Some(now)
    }

    pub fn is_favorite(&self) -> bool {
        self.state
            .city()
            .is_some_and(|city| self.favorites.contains(city))
    }

    pub fn favorite_label(&self) -> &'static str {
        if self.is_favorite() {
            REMOVE_FAVORITE_LABEL
        } else {
            ADD_FAVORITE_LABEL
        }
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn favorites(&self) -> &FavoriteSet {
        &self.favorites
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn storage_notice(&self) -> Option<&str> {
        self.storage_notice.as_deref()
    }

    fn dispatch(&mut self, key: Option<RequestKey>) {
        match key {
            Some(key) => {
                self.error_message = None;
                services::request_weather_fetch(
                    self.services.weather_sender(),
                    self.services.runtime().handle(),
                    self.services.weather_provider(),
                    key,
                );
            }
            None => {
                if self.state.status() == &DetailStatus::Failed(DetailFailure::MissingCityName) {
                    let app = AppError::Route(RouteError::MissingCityName);
                    tracing::warn!("{}", app);
                    self.error_message = Some(app.user_message().to_string());
                }
            }
        }
    }

    /// Apply finished weather requests. Returns whether anything changed.
    pub fn poll_channel(&mut self) -> bool {
        let mut changed = false;

        while let Some(msg) = self.services.try_recv_weather_message() {
            match msg {
                WeatherServiceMessage::FetchDone { key, result } => {
                    let message = result
                        .as_ref()
                        .err()
                        .map(|e| AppError::from(e.clone()).user_message().to_string());

                    if self.state.apply_result(&key, result) == ApplyOutcome::Applied {
                        self.error_message = message;
                        changed = true;
                    }
                }
            }
        }

        changed
    }
}
