//! HTTP client for the paginated city records API.

use std::sync::Arc;
use std::time::Duration;

use cityweather_core::CitiesConfig;
use reqwest::Client;
use url::Url;

use crate::types::{CityError, CityRecord, PageRequest, RecordsResponse};

/// Read-only client for the open-data city records endpoint
#[derive(Debug, Clone)]
pub struct CityClient {
    base_url: Url,
    dataset: String,
    sort: String,
    client: Arc<Client>,
}

impl CityClient {
    pub fn new(
        api_url: &str,
        dataset: impl Into<String>,
        sort: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, CityError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: Url::parse(api_url)?,
            dataset: dataset.into(),
            sort: sort.into(),
            client: Arc::new(client),
        })
    }

    pub fn from_config(config: &CitiesConfig) -> Result<Self, CityError> {
        Self::new(
            &config.api_url,
            config.dataset.clone(),
            config.sort.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Fetch one page of city records.
    ///
    /// Records come back in server order; an empty vector means the
    /// dataset is exhausted at this offset.
    pub async fn fetch_page(&self, request: PageRequest) -> Result<Vec<CityRecord>, CityError> {
        tracing::debug!(
            "Fetching cities offset={} rows={}",
            request.offset,
            request.rows
        );

        let query = [
            ("dataset", self.dataset.clone()),
            ("rows", request.rows.to_string()),
            ("start", request.offset.to_string()),
            ("sort", self.sort.clone()),
        ];

        let response = self
            .client
            .get(self.base_url.clone())
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CityError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: RecordsResponse = response
            .json()
            .await
            .map_err(|e| CityError::Parse(e.to_string()))?;

        let cities: Vec<CityRecord> = body
            .records
            .into_iter()
            .map(|record| CityRecord::from(record.fields))
            .collect();

        tracing::debug!("Received {} cities at offset {}", cities.len(), request.offset);
        Ok(cities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_endpoint() {
        let result = CityClient::new("not a url", "ds", "name", Duration::from_secs(1));
        assert!(matches!(result, Err(CityError::Url(_))));
    }

    #[test]
    fn test_from_default_config() {
        let client = CityClient::from_config(&CitiesConfig::default()).unwrap();
        assert_eq!(client.dataset, "geonames-all-cities-with-a-population-1000");
        assert_eq!(client.sort, "name");
    }
}
