//! OpenWeatherMap-backed weather provider with a synthetic-data fallback.
//!
//! Data fetches never fail: a missing or placeholder API key, a timeout, a
//! non-2xx status, or an undecodable body all yield synthetic data of the same
//! shape. The only error the cancellable variants return is `Cancelled`.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::owm::{CurrentResponse, ForecastResponse};
use crate::synthetic;
use crate::types::{Coordinate, CurrentWeather, Forecast, WeatherError};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_GEO_URL: &str = "https://api.openweathermap.org/geo/1.0";
pub const WEATHER_TIMEOUT: Duration = Duration::from_secs(10);
pub const GEOCODE_TIMEOUT: Duration = Duration::from_secs(5);

const USER_AGENT: &str = concat!("skywatch/", env!("CARGO_PKG_VERSION"));

/// Connection settings for the weather provider
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub api_key: String,
    pub base_url: String,
    pub geo_url: String,
    pub weather_timeout: Duration,
    pub geo_timeout: Duration,
}

impl ProviderSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Point both endpoints at one host (used against mock servers)
    pub fn with_base_urls(mut self, base_url: impl Into<String>, geo_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self.geo_url = geo_url.into();
        self
    }

    /// Check if the API key is set to something other than a placeholder
    pub fn is_configured(&self) -> bool {
        skywatch_core::is_real_api_key(&self.api_key)
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            geo_url: DEFAULT_GEO_URL.to_string(),
            weather_timeout: WEATHER_TIMEOUT,
            geo_timeout: GEOCODE_TIMEOUT,
        }
    }
}

/// Source of weather data for the polling store.
///
/// Implementations must observe `cancel` and return `WeatherError::Cancelled`
/// once it fires.
pub trait WeatherSource: Send + Sync + 'static {
    fn current_weather(
        &self,
        coordinate: Coordinate,
        cancel: CancellationToken,
    ) -> impl Future<Output = Result<CurrentWeather, WeatherError>> + Send;

    fn forecast(
        &self,
        coordinate: Coordinate,
        cancel: CancellationToken,
    ) -> impl Future<Output = Result<Forecast, WeatherError>> + Send;
}

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    pub(crate) client: Arc<Client>,
    pub(crate) settings: ProviderSettings,
}

impl WeatherProvider {
    pub fn new(settings: ProviderSettings) -> Result<Self, WeatherError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;

        if !settings.is_configured() {
            tracing::warn!(
                "No OpenWeatherMap API key configured - serving synthetic weather data"
            );
        }

        Ok(Self {
            client: Arc::new(client),
            settings,
        })
    }

    pub fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    /// Current conditions for `coordinate`; synthetic on any failure
    #[instrument(skip(self), level = "info")]
    pub async fn get_current_weather(&self, coordinate: Coordinate) -> CurrentWeather {
        if !self.settings.is_configured() {
            tracing::debug!("Using synthetic current weather (no API key)");
            return synthetic_current(coordinate);
        }

        let url = format!("{}/weather", self.settings.base_url);
        match self
            .request_json::<CurrentResponse>(&url, &self.data_query(coordinate), self.settings.weather_timeout)
            .await
        {
            Ok(raw) => CurrentWeather::from(raw),
            Err(e) => {
                tracing::error!("Error fetching current weather, using synthetic data: {}", e);
                synthetic_current(coordinate)
            }
        }
    }

    /// 5-day / 3-hour forecast for `coordinate`; synthetic on any failure
    #[instrument(skip(self), level = "info")]
    pub async fn get_forecast(&self, coordinate: Coordinate) -> Forecast {
        if !self.settings.is_configured() {
            tracing::debug!("Using synthetic forecast (no API key)");
            return synthetic_forecast(coordinate);
        }

        let url = format!("{}/forecast", self.settings.base_url);
        match self
            .request_json::<ForecastResponse>(&url, &self.data_query(coordinate), self.settings.weather_timeout)
            .await
        {
            Ok(raw) => Forecast::from(raw),
            Err(e) => {
                tracing::error!("Error fetching forecast, using synthetic data: {}", e);
                synthetic_forecast(coordinate)
            }
        }
    }

    /// Like `get_current_weather`, but abandons the request once `cancel` fires
    pub async fn current_weather_until(
        &self,
        coordinate: Coordinate,
        cancel: &CancellationToken,
    ) -> Result<CurrentWeather, WeatherError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(WeatherError::Cancelled),
            weather = self.get_current_weather(coordinate) => Ok(weather),
        }
    }

    /// Like `get_forecast`, but abandons the request once `cancel` fires
    pub async fn forecast_until(
        &self,
        coordinate: Coordinate,
        cancel: &CancellationToken,
    ) -> Result<Forecast, WeatherError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(WeatherError::Cancelled),
            forecast = self.get_forecast(coordinate) => Ok(forecast),
        }
    }

    fn data_query(&self, coordinate: Coordinate) -> Vec<(&'static str, String)> {
        vec![
            ("lat", coordinate.latitude.to_string()),
            ("lon", coordinate.longitude.to_string()),
            ("appid", self.settings.api_key.clone()),
            ("units", "metric".to_string()),
        ]
    }

    /// GET `url` with `query` and decode a JSON body, bounded by `timeout`
    pub(crate) async fn request_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&'static str, String)],
        timeout: Duration,
    ) -> Result<T, WeatherError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .timeout(timeout)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WeatherError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| WeatherError::Parse(e.without_url().to_string()))
    }
}

impl WeatherSource for WeatherProvider {
    fn current_weather(
        &self,
        coordinate: Coordinate,
        cancel: CancellationToken,
    ) -> impl Future<Output = Result<CurrentWeather, WeatherError>> + Send {
        async move { self.current_weather_until(coordinate, &cancel).await }
    }

    fn forecast(
        &self,
        coordinate: Coordinate,
        cancel: CancellationToken,
    ) -> impl Future<Output = Result<Forecast, WeatherError>> + Send {
        async move { self.forecast_until(coordinate, &cancel).await }
    }
}

// The request URL carries the API key, so it is stripped before the error is logged
fn classify(e: reqwest::Error) -> WeatherError {
    if e.is_timeout() {
        WeatherError::Timeout
    } else {
        WeatherError::Network(e.without_url())
    }
}

fn synthetic_current(coordinate: Coordinate) -> CurrentWeather {
    synthetic::current_weather(coordinate, Utc::now(), &mut rand::thread_rng())
}

fn synthetic_forecast(coordinate: Coordinate) -> Forecast {
    synthetic::forecast(coordinate, Utc::now(), &mut rand::thread_rng())
}
