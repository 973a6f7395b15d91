use serde::{Deserialize, Serialize};

/// A single city row as received from the records API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityRecord {
    pub name: String,
    pub country: String,
    pub timezone: String,
}

/// One page request: `rows` records starting at `offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: usize,
    pub rows: usize,
}

/// Sortable table columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Name,
    Country,
    Timezone,
}

impl SortColumn {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Name => "City Name",
            Self::Country => "Country",
            Self::Timezone => "Timezone",
        }
    }

    /// Parse a column from user input ("name", "country", "timezone").
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "name" | "city" | "city_name" => Some(Self::Name),
            "country" => Some(Self::Country),
            "timezone" | "tz" => Some(Self::Timezone),
            _ => None,
        }
    }

    pub(crate) fn key<'a>(&self, city: &'a CityRecord) -> &'a str {
        match self {
            Self::Name => &city.name,
            Self::Country => &city.country,
            Self::Timezone => &city.timezone,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Display ordering applied on top of the accumulated sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub column: SortColumn,
    pub direction: SortDirection,
}

/// Records search response envelope
#[derive(Debug, Deserialize)]
pub(crate) struct RecordsResponse {
    #[serde(default)]
    pub records: Vec<RecordEnvelope>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecordEnvelope {
    pub fields: RecordFields,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecordFields {
    pub name: String,
    #[serde(default, alias = "country_name")]
    pub cou_name_en: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
}

impl From<RecordFields> for CityRecord {
    fn from(fields: RecordFields) -> Self {
        Self {
            name: fields.name,
            country: fields.cou_name_en.unwrap_or_default(),
            timezone: fields.timezone.unwrap_or_default(),
        }
    }
}

/// City data client errors
#[derive(Debug, thiserror::Error)]
pub enum CityError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("City API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid endpoint: {0}")]
    Url(#[from] url::ParseError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_fields_map_country_name() {
        let fields: RecordFields = serde_json::from_value(serde_json::json!({
            "name": "Berlin",
            "cou_name_en": "Germany",
            "timezone": "Europe/Berlin"
        }))
        .unwrap();

        let city = CityRecord::from(fields);
        assert_eq!(city.name, "Berlin");
        assert_eq!(city.country, "Germany");
        assert_eq!(city.timezone, "Europe/Berlin");
    }

    #[test]
    fn test_record_fields_accept_country_name_alias() {
        let fields: RecordFields = serde_json::from_value(serde_json::json!({
            "name": "Lyon",
            "country_name": "France",
            "timezone": "Europe/Paris"
        }))
        .unwrap();

        assert_eq!(CityRecord::from(fields).country, "France");
    }

    #[test]
    fn test_missing_optional_fields_become_empty() {
        let fields: RecordFields =
            serde_json::from_value(serde_json::json!({ "name": "Nowhere" })).unwrap();

        let city = CityRecord::from(fields);
        assert_eq!(city.country, "");
        assert_eq!(city.timezone, "");
    }

    #[test]
    fn test_sort_column_parse() {
        assert_eq!(SortColumn::parse("Name"), Some(SortColumn::Name));
        assert_eq!(SortColumn::parse(" country "), Some(SortColumn::Country));
        assert_eq!(SortColumn::parse("tz"), Some(SortColumn::Timezone));
        assert_eq!(SortColumn::parse("population"), None);
    }
}
