//! Maps weather-crate errors onto the application error hierarchy.

use skywatch_core::error::WeatherError as ServiceError;
use skywatch_core::{AppError, NetworkError, ReqwestErrorExt};
use skywatch_weather::WeatherError;

pub fn to_app_error(err: WeatherError) -> AppError {
    match err {
        WeatherError::Network(e) => AppError::Network(e.into_network_error()),
        WeatherError::Status { status: 503, .. } => {
            AppError::Weather(ServiceError::ServiceUnavailable)
        }
        WeatherError::Status { status, body } => AppError::Network(NetworkError::ServerError {
            status,
            message: body,
        }),
        WeatherError::Parse(msg) => AppError::Network(NetworkError::InvalidResponse(msg)),
        WeatherError::Timeout => AppError::Network(NetworkError::Timeout),
        WeatherError::Cancelled => AppError::Other(anyhow::anyhow!("request cancelled")),
        WeatherError::Unavailable(msg) => AppError::Weather(ServiceError::ApiError(msg)),
    }
}
