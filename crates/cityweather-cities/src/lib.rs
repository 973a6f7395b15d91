//! City directory for cityweather
//!
//! Fetches paginated city records from an open-data records API and keeps
//! the accumulated, filterable list the city screen shows.

pub mod client;
pub mod list;
pub mod types;

pub use client::CityClient;
pub use list::{CityListState, PageOutcome};
pub use types::*;
