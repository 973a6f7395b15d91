//! City backend: async page fetching for the city list.
//! All network work runs off the UI thread; results sent via mpsc.

use std::sync::Arc;

use cityweather_cities::{CityClient, CityError, CityRecord, PageRequest};

/// Error type for city page operations
#[derive(Debug, Clone)]
pub enum CityServiceError {
    Network(String),
    Timeout,
    Api { status: u16, message: String },
    Parse(String),
}

impl std::fmt::Display for CityServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CityServiceError::Network(s) => write!(f, "Network error: {}", s),
            CityServiceError::Api { status, message } => {
                write!(f, "City API error ({}): {}", status, message)
            }
            CityServiceError::Timeout => write!(f, "City request timed out"),
            CityServiceError::Parse(s) => write!(f, "Unexpected city data: {}", s),
        }
    }
}

impl std::error::Error for CityServiceError {}

impl From<CityError> for CityServiceError {
    fn from(e: CityError) -> Self {
        match e {
            CityError::Network(e) if e.is_timeout() => CityServiceError::Timeout,
            CityError::Network(e) => CityServiceError::Network(e.to_string()),
            CityError::Api { status, message } => CityServiceError::Api { status, message },
            CityError::Parse(s) => CityServiceError::Parse(s),
            CityError::Url(e) => CityServiceError::Network(e.to_string()),
        }
    }
}

/// Messages sent from async operations back to the UI thread
#[derive(Debug)]
pub enum CityServiceMessage {
    /// Result of fetching one page. `mount` identifies the list screen
    /// instance that asked for it.
    PageDone {
        mount: u64,
        request: PageRequest,
        result: Result<Vec<CityRecord>, CityServiceError>,
    },
}

/// Request one page of cities asynchronously.
/// Sends `PageDone` on the channel when complete.
pub fn request_page(
    tx: &std::sync::mpsc::Sender<CityServiceMessage>,
    runtime: &tokio::runtime::Handle,
    client: Arc<CityClient>,
    mount: u64,
    request: PageRequest,
) {
    let tx = tx.clone();

    runtime.spawn(async move {
        let result = client
            .fetch_page(request)
            .await
            .map_err(CityServiceError::from);
        let _ = tx.send(CityServiceMessage::PageDone {
            mount,
            request,
            result,
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::any;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_city_error_display() {
        let e = CityServiceError::Api {
            status: 503,
            message: "down".into(),
        };
        assert!(format!("{}", e).contains("503"));
        assert!(format!("{}", CityServiceError::Timeout).contains("timed out"));
    }

    #[test]
    fn test_city_service_message_variants() {
        let _done = CityServiceMessage::PageDone {
            mount: 1,
            request: PageRequest { offset: 0, rows: 20 },
            result: Err(CityServiceError::Timeout),
        };
    }

    #[tokio::test]
    async fn test_timed_out_request_maps_to_timeout() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let client = CityClient::new(&server.uri(), "cities", "name", Duration::from_millis(200))
            .unwrap();
        let err = client
            .fetch_page(PageRequest { offset: 0, rows: 20 })
            .await
            .unwrap_err();

        assert!(matches!(CityServiceError::from(err), CityServiceError::Timeout));
    }
}
