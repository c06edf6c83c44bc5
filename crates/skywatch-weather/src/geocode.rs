//! Forward and reverse geocoding through the OpenWeatherMap geo API.
//! Lookups never fail: without an API key, or on any request error, they
//! return an empty list and the caller keeps its current location.

use tracing::instrument;

use crate::owm::GeoResult;
use crate::provider::WeatherProvider;
use crate::types::{Coordinate, LocationCandidate};

const SEARCH_LIMIT: u8 = 5;
const REVERSE_LIMIT: u8 = 1;

impl WeatherProvider {
    /// Find up to five places matching a free-text query
    #[instrument(skip(self), level = "info")]
    pub async fn search_location(&self, query: &str) -> Vec<LocationCandidate> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }
        if !self.settings.is_configured() {
            tracing::warn!("Location search unavailable without an API key");
            return Vec::new();
        }

        let url = format!("{}/direct", self.settings.geo_url);
        let params = [
            ("q", query.to_string()),
            ("limit", SEARCH_LIMIT.to_string()),
            ("appid", self.settings.api_key.clone()),
        ];
        self.geocode(&url, &params).await
    }

    /// Resolve a coordinate to the nearest named place
    #[instrument(skip(self), level = "info")]
    pub async fn location_by_coords(&self, coordinate: Coordinate) -> Vec<LocationCandidate> {
        if !self.settings.is_configured() {
            tracing::warn!("Reverse geocoding unavailable without an API key");
            return Vec::new();
        }

        let url = format!("{}/reverse", self.settings.geo_url);
        let params = [
            ("lat", coordinate.latitude.to_string()),
            ("lon", coordinate.longitude.to_string()),
            ("limit", REVERSE_LIMIT.to_string()),
            ("appid", self.settings.api_key.clone()),
        ];
        self.geocode(&url, &params).await
    }

    async fn geocode(&self, url: &str, params: &[(&'static str, String)]) -> Vec<LocationCandidate> {
        match self
            .request_json::<Vec<GeoResult>>(url, params, self.settings.geo_timeout)
            .await
        {
            Ok(results) => {
                let candidates: Vec<LocationCandidate> =
                    results.into_iter().map(LocationCandidate::from).collect();
                tracing::debug!("Geocoding returned {} candidates", candidates.len());
                candidates
            }
            Err(e) => {
                tracing::error!("Geocoding request failed: {}", e);
                Vec::new()
            }
        }
    }
}
