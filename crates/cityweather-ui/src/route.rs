//! Path routing for the two screens.
//!
//! `/` is the city list, `/city/<name>` the detail screen for `<name>`.
//! City names are percent-decoded when parsed and percent-encoded when a
//! path is built.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left as-is inside a path segment
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

const CITY_PREFIX: &str = "/city";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    CityList,
    /// `None` when the path carries no city name (`/city/`).
    CityDetail { city_name: Option<String> },
    NotFound(String),
}

impl Route {
    pub fn city(name: impl Into<String>) -> Self {
        Route::CityDetail {
            city_name: Some(name.into()),
        }
    }

    pub fn parse(input: &str) -> Self {
        let path = input
            .split(|c| c == '?' || c == '#')
            .next()
            .unwrap_or_default()
            .trim();

        if path.is_empty() || path == "/" {
            return Route::CityList;
        }

        let Some(rest) = path.strip_prefix(CITY_PREFIX) else {
            return Route::NotFound(path.to_string());
        };

        let segment = match rest {
            "" => "",
            _ => match rest.strip_prefix('/') {
                Some(segment) => segment,
                None => return Route::NotFound(path.to_string()),
            },
        };

        if segment.contains('/') {
            return Route::NotFound(path.to_string());
        }

        let name = percent_decode_str(segment).decode_utf8_lossy().into_owned();
        Route::CityDetail {
            city_name: Some(name).filter(|n| !n.is_empty()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::CityList => "/".to_string(),
            Route::CityDetail {
                city_name: Some(name),
            } => format!("{}/{}", CITY_PREFIX, encode_segment(name)),
            Route::CityDetail { city_name: None } => format!("{}/", CITY_PREFIX),
            Route::NotFound(path) => path.clone(),
        }
    }
}

/// Page for `city` on the external weather website.
pub fn external_url(host: &str, city: &str) -> String {
    format!("https://{}/{}", host, encode_segment(city))
}

fn encode_segment(s: &str) -> String {
    utf8_percent_encode(s, SEGMENT).to_string()
}
