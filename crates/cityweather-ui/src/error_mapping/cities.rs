use crate::services::CityServiceError;
use cityweather_core::{AppError, CityDataError, NetworkError};

impl From<CityServiceError> for AppError {
    fn from(e: CityServiceError) -> Self {
        match e {
            CityServiceError::Network(s) => AppError::Network(NetworkError::ConnectionFailed(s)),
            CityServiceError::Timeout => AppError::Network(NetworkError::Timeout),
            CityServiceError::Api { status, message } => {
                AppError::CityData(CityDataError::ApiError { status, message })
            }
            CityServiceError::Parse(s) => AppError::CityData(CityDataError::InvalidData(s)),
        }
    }
}
