//! City detail state with stale-result suppression.
//!
//! Every fetch is issued for a `RequestKey` (city, units). A result is only
//! applied while that key is still the one the screen wants; anything else
//! is dropped.

use std::fmt::Display;

use crate::types::{UnitSystem, WeatherReport};

/// Identity of a weather request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey {
    pub city: String,
    pub units: UnitSystem,
}

/// Why the detail screen has nothing to show
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DetailFailure {
    #[error("City name is missing from the route")]
    MissingCityName,
    #[error("{0}")]
    Fetch(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailStatus {
    Loading,
    Ready(WeatherReport),
    Failed(DetailFailure),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// The result answered a request the screen no longer wants.
    Stale,
}

#[derive(Debug, Clone)]
pub struct DetailState {
    city: Option<String>,
    units: UnitSystem,
    status: DetailStatus,
}

impl DetailState {
    pub fn new(city: Option<String>, units: UnitSystem) -> Self {
        Self {
            city: normalize(city),
            units,
            status: DetailStatus::Loading,
        }
    }

    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    pub fn units(&self) -> UnitSystem {
        self.units
    }

    pub fn status(&self) -> &DetailStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, DetailStatus::Loading)
    }

    /// The key a result must carry to be displayed.
    pub fn desired_key(&self) -> Option<RequestKey> {
        self.city.as_ref().map(|city| RequestKey {
            city: city.clone(),
            units: self.units,
        })
    }

    /// Enter `Loading` and return the key to fetch. Without a city name the
    /// state fails immediately and no fetch is issued.
    pub fn begin_fetch(&mut self) -> Option<RequestKey> {
        match self.desired_key() {
            Some(key) => {
                self.status = DetailStatus::Loading;
                Some(key)
            }
            None => {
                self.status = DetailStatus::Failed(DetailFailure::MissingCityName);
                None
            }
        }
    }

    /// Switch to another city. Returns the request to issue if anything
    /// changed.
    pub fn set_city(&mut self, city: Option<String>) -> Option<RequestKey> {
        let city = normalize(city);
        if city == self.city {
            return None;
        }
        self.city = city;
        self.begin_fetch()
    }

    /// Switch unit system. Selecting the current system does nothing.
    pub fn set_units(&mut self, units: UnitSystem) -> Option<RequestKey> {
        if units == self.units {
            return None;
        }
        self.units = units;
        self.begin_fetch()
    }

    /// Apply a completed fetch if it still matches the desired key.
    pub fn apply_result<E: Display>(
        &mut self,
        key: &RequestKey,
        result: Result<WeatherReport, E>,
    ) -> ApplyOutcome {
        if self.desired_key().as_ref() != Some(key) {
            tracing::debug!(
                "Discarding stale weather for {} ({})",
                key.city,
                key.units.as_query()
            );
            return ApplyOutcome::Stale;
        }

        self.status = match result {
            Ok(report) => DetailStatus::Ready(report),
            Err(e) => DetailStatus::Failed(DetailFailure::Fetch(e.to_string())),
        };
        ApplyOutcome::Applied
    }
}

fn normalize(city: Option<String>) -> Option<String> {
    city.filter(|c| !c.trim().is_empty())
}
