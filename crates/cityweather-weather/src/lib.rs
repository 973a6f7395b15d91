//! Weather service for cityweather
//!
//! Provides current weather by city name via the OpenWeatherMap API, the
//! detail-screen state with stale-result suppression, and the locally
//! persisted favorites list.

pub mod detail;
pub mod favorites;
pub mod provider;
pub mod types;

pub use detail::{ApplyOutcome, DetailFailure, DetailState, DetailStatus, RequestKey};
pub use favorites::{
    FavoriteSet, FavoritesError, FavoritesRepository, FileKeyValueStore, KeyValueStore,
    LocalFavoritesRepository, MemoryKeyValueStore, FAVORITES_KEY,
};
pub use provider::WeatherProvider;
pub use types::*;
