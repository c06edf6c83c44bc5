use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Display unit; storage is always Celsius
pub use skywatch_core::TemperatureUnit;

/// Weather condition groups as reported by OpenWeatherMap's `weather[0].main`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WeatherCondition {
    #[default]
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Thunderstorm,
    Snow,
    Mist,
    Fog,
    Haze,
    Smoke,
    Dust,
    Other,
}

impl WeatherCondition {
    /// Parse the provider's condition group. Unknown groups map to `Other`.
    pub fn from_main(main: &str) -> Self {
        match main.trim().to_ascii_lowercase().as_str() {
            "clear" => Self::Clear,
            "clouds" => Self::Clouds,
            "rain" => Self::Rain,
            "drizzle" => Self::Drizzle,
            "thunderstorm" => Self::Thunderstorm,
            "snow" => Self::Snow,
            "mist" => Self::Mist,
            "fog" => Self::Fog,
            "haze" => Self::Haze,
            "smoke" => Self::Smoke,
            "dust" | "sand" | "ash" => Self::Dust,
            _ => Self::Other,
        }
    }

    /// Human-readable label matching the provider's spelling
    pub fn label(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::Clouds => "Clouds",
            Self::Rain => "Rain",
            Self::Drizzle => "Drizzle",
            Self::Thunderstorm => "Thunderstorm",
            Self::Snow => "Snow",
            Self::Mist => "Mist",
            Self::Fog => "Fog",
            Self::Haze => "Haze",
            Self::Smoke => "Smoke",
            Self::Dust => "Dust",
            Self::Other => "Other",
        }
    }

    /// True for groups that carry liquid precipitation
    pub fn is_rainy(&self) -> bool {
        matches!(self, Self::Rain | Self::Drizzle)
    }

    /// True for groups that obscure the sky without precipitation
    pub fn is_overcast(&self) -> bool {
        matches!(self, Self::Clouds | Self::Mist | Self::Fog)
    }
}

/// Geographic coordinate in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Current weather conditions for one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub location_name: String,
    pub coordinate: Coordinate,
    pub condition: WeatherCondition,
    pub description: String,
    /// Provider icon code, e.g. `01d`
    pub icon: String,
    pub temperature: f64,
    pub feels_like: f64,
    /// Not guaranteed to be <= `temperature`
    pub temp_min: f64,
    /// Not guaranteed to be >= `temperature`
    pub temp_max: f64,
    /// Percent, 0..=100
    pub humidity: u8,
    /// hPa
    pub pressure: f64,
    /// Meters
    pub visibility: f64,
    /// m/s
    pub wind_speed: f64,
    /// Degrees
    pub wind_direction: f64,
    /// Percent, 0..=100
    pub cloudiness: u8,
    /// Rain volume over the last hour, mm
    pub rain_1h: Option<f64>,
    /// Snow volume over the last hour, mm
    pub snow_1h: Option<f64>,
    pub observed_at: DateTime<Utc>,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
    /// Shift in seconds from UTC
    pub timezone_offset: i32,
}

/// One 3-hour forecast step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub timestamp: DateTime<Utc>,
    pub condition: WeatherCondition,
    pub description: String,
    pub icon: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: u8,
    pub pressure: f64,
    pub visibility: f64,
    pub wind_speed: f64,
    pub wind_direction: f64,
    pub cloudiness: u8,
    /// Probability of precipitation, 0.0..=1.0
    pub pop: f64,
    /// Rain volume over the 3-hour step, mm
    pub rain_3h: Option<f64>,
    pub is_day: bool,
}

/// Multi-day forecast for one location, ordered by strictly increasing timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub location_name: String,
    pub coordinate: Coordinate,
    pub timezone_offset: i32,
    pub entries: Vec<ForecastEntry>,
}

impl Forecast {
    /// Build a forecast, sorting entries and dropping repeated timestamps
    pub fn new(
        location_name: impl Into<String>,
        coordinate: Coordinate,
        timezone_offset: i32,
        mut entries: Vec<ForecastEntry>,
    ) -> Self {
        entries.sort_by_key(|e| e.timestamp);
        entries.dedup_by_key(|e| e.timestamp);
        Self {
            location_name: location_name.into(),
            coordinate,
            timezone_offset,
            entries,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Geocoding result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationCandidate {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country: String,
    pub state: Option<String>,
}

impl LocationCandidate {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    /// "Name, State, Country" with empty parts omitted
    pub fn display_name(&self) -> String {
        let mut parts = vec![self.name.as_str()];
        if let Some(state) = self.state.as_deref().filter(|s| !s.is_empty()) {
            if state != self.name {
                parts.push(state);
            }
        }
        if !self.country.is_empty() {
            parts.push(self.country.as_str());
        }
        parts.join(", ")
    }
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Weather API returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Request timed out")]
    Timeout,
    #[error("Request cancelled")]
    Cancelled,
    #[error("Weather data unavailable: {0}")]
    Unavailable(String),
}

impl WeatherError {
    /// Cancellation is a supersession signal, never a user-visible failure
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use chrono::TimeZone;

    fn entry_at(secs: i64) -> ForecastEntry {
        ForecastEntry {
            timestamp: Utc.timestamp_opt(secs, 0).unwrap(),
            condition: WeatherCondition::Clear,
            description: "clear sky".into(),
            icon: "01d".into(),
            temperature: 20.0,
            feels_like: 20.0,
            temp_min: 19.0,
            temp_max: 21.0,
            humidity: 50,
            pressure: 1013.0,
            visibility: 10_000.0,
            wind_speed: 2.0,
            wind_direction: 90.0,
            cloudiness: 0,
            pop: 0.0,
            rain_3h: None,
            is_day: true,
        }
    }

    #[test]
    fn test_condition_from_main() {
        assert_eq!(WeatherCondition::from_main("Clear"), WeatherCondition::Clear);
        assert_eq!(WeatherCondition::from_main("clouds"), WeatherCondition::Clouds);
        assert_eq!(WeatherCondition::from_main(" Rain "), WeatherCondition::Rain);
        assert_eq!(
            WeatherCondition::from_main("Thunderstorm"),
            WeatherCondition::Thunderstorm
        );
        assert_eq!(WeatherCondition::from_main("Sand"), WeatherCondition::Dust);
    }

    #[test]
    fn test_unknown_condition_maps_to_other() {
        assert_eq!(WeatherCondition::from_main("Tornado"), WeatherCondition::Other);
        assert_eq!(WeatherCondition::from_main(""), WeatherCondition::Other);
    }

    #[test]
    fn test_condition_groups() {
        assert!(WeatherCondition::Drizzle.is_rainy());
        assert!(!WeatherCondition::Thunderstorm.is_rainy());
        assert!(WeatherCondition::Mist.is_overcast());
        assert!(!WeatherCondition::Clear.is_overcast());
    }

    #[test]
    fn test_forecast_orders_and_dedups_entries() {
        let forecast = Forecast::new(
            "Pune",
            Coordinate::new(18.52, 73.85),
            19_800,
            vec![entry_at(7_200), entry_at(0), entry_at(7_200), entry_at(3_600)],
        );
        let stamps: Vec<i64> = forecast.entries.iter().map(|e| e.timestamp.timestamp()).collect();
        assert_eq!(stamps, vec![0, 3_600, 7_200]);
    }

    #[test]
    fn test_candidate_display_name() {
        let candidate = LocationCandidate {
            name: "Mumbai".into(),
            latitude: 19.07,
            longitude: 72.87,
            country: "IN".into(),
            state: Some("Maharashtra".into()),
        };
        assert_eq!(candidate.display_name(), "Mumbai, Maharashtra, IN");

        let delhi = LocationCandidate {
            name: "Delhi".into(),
            latitude: 28.61,
            longitude: 77.20,
            country: "IN".into(),
            state: Some("Delhi".into()),
        };
        assert_eq!(delhi.display_name(), "Delhi, IN");
    }

    #[test]
    fn test_cancelled_is_flagged() {
        assert!(WeatherError::Cancelled.is_cancelled());
        assert!(!WeatherError::Timeout.is_cancelled());
    }
}
