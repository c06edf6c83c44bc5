//! OpenWeatherMap wire format and conversion into domain types.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::types::{
    Coordinate, CurrentWeather, Forecast, ForecastEntry, LocationCandidate, WeatherCondition,
};

/// Visibility reported when the provider omits it (its documented maximum)
const DEFAULT_VISIBILITY_M: f64 = 10_000.0;

#[derive(Debug, Deserialize)]
pub(crate) struct CurrentResponse {
    coord: Coord,
    #[serde(default)]
    weather: Vec<Condition>,
    main: Main,
    visibility: Option<f64>,
    wind: Wind,
    #[serde(default)]
    clouds: Clouds,
    rain: Option<Precipitation>,
    snow: Option<Precipitation>,
    dt: i64,
    sys: Sys,
    #[serde(default)]
    timezone: i32,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct Coord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct Condition {
    main: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
struct Main {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    pressure: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct Wind {
    speed: f64,
    deg: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct Clouds {
    all: f64,
}

#[derive(Debug, Deserialize)]
struct Precipitation {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
    #[serde(rename = "3h")]
    three_hour: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Sys {
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ForecastResponse {
    city: City,
    list: Vec<ForecastItem>,
}

#[derive(Debug, Deserialize)]
struct City {
    #[serde(default)]
    name: String,
    coord: Coord,
    #[serde(default)]
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct ForecastItem {
    dt: i64,
    main: Main,
    #[serde(default)]
    weather: Vec<Condition>,
    #[serde(default)]
    clouds: Clouds,
    wind: Wind,
    visibility: Option<f64>,
    #[serde(default)]
    pop: f64,
    rain: Option<Precipitation>,
    sys: Option<PartOfDay>,
}

#[derive(Debug, Deserialize)]
struct PartOfDay {
    pod: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeoResult {
    name: String,
    lat: f64,
    lon: f64,
    #[serde(default)]
    country: String,
    state: Option<String>,
}

fn timestamp(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs.max(0), 0).unwrap_or_default()
}

fn percent(value: f64) -> u8 {
    value.clamp(0.0, 100.0).round() as u8
}

fn condition_parts(weather: &[Condition]) -> (WeatherCondition, String, String) {
    match weather.first() {
        Some(w) => (
            WeatherCondition::from_main(&w.main),
            w.description.clone(),
            w.icon.clone(),
        ),
        None => (WeatherCondition::Other, String::new(), String::new()),
    }
}

impl From<CurrentResponse> for CurrentWeather {
    fn from(data: CurrentResponse) -> Self {
        let (condition, description, icon) = condition_parts(&data.weather);

        Self {
            location_name: data.name,
            coordinate: Coordinate::new(data.coord.lat, data.coord.lon),
            condition,
            description,
            icon,
            temperature: data.main.temp,
            feels_like: data.main.feels_like,
            temp_min: data.main.temp_min,
            temp_max: data.main.temp_max,
            humidity: percent(data.main.humidity),
            pressure: data.main.pressure,
            visibility: data.visibility.unwrap_or(DEFAULT_VISIBILITY_M),
            wind_speed: data.wind.speed,
            wind_direction: data.wind.deg.unwrap_or(0.0),
            cloudiness: percent(data.clouds.all),
            rain_1h: data.rain.and_then(|r| r.one_hour),
            snow_1h: data.snow.and_then(|s| s.one_hour),
            observed_at: timestamp(data.dt),
            sunrise: timestamp(data.sys.sunrise),
            sunset: timestamp(data.sys.sunset),
            timezone_offset: data.timezone,
        }
    }
}

impl From<ForecastItem> for ForecastEntry {
    fn from(item: ForecastItem) -> Self {
        let (condition, description, icon) = condition_parts(&item.weather);
        // Icon codes end in d/n when the part-of-day block is missing
        let is_day = match &item.sys {
            Some(sys) => sys.pod != "n",
            None => !icon.ends_with('n'),
        };

        Self {
            timestamp: timestamp(item.dt),
            condition,
            description,
            icon,
            temperature: item.main.temp,
            feels_like: item.main.feels_like,
            temp_min: item.main.temp_min,
            temp_max: item.main.temp_max,
            humidity: percent(item.main.humidity),
            pressure: item.main.pressure,
            visibility: item.visibility.unwrap_or(DEFAULT_VISIBILITY_M),
            wind_speed: item.wind.speed,
            wind_direction: item.wind.deg.unwrap_or(0.0),
            cloudiness: percent(item.clouds.all),
            pop: item.pop.clamp(0.0, 1.0),
            rain_3h: item.rain.and_then(|r| r.three_hour),
            is_day,
        }
    }
}

impl From<ForecastResponse> for Forecast {
    fn from(data: ForecastResponse) -> Self {
        Forecast::new(
            data.city.name,
            Coordinate::new(data.city.coord.lat, data.city.coord.lon),
            data.city.timezone,
            data.list.into_iter().map(ForecastEntry::from).collect(),
        )
    }
}

impl From<GeoResult> for LocationCandidate {
    fn from(geo: GeoResult) -> Self {
        Self {
            name: geo.name,
            latitude: geo.lat,
            longitude: geo.lon,
            country: geo.country,
            state: geo.state,
        }
    }
}
