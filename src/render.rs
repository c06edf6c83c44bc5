//! Plain-text views of weather state for the terminal.

use chrono::{DateTime, Utc};
use skywatch_weather::format::{
    format_temperature, format_time, format_updated_ago, weather_glyph, wind_direction,
};
use skywatch_weather::{
    condition_breakdown, daily_summaries, Alert, CurrentWeather, FetchState, Forecast,
    LocationCandidate, StoreStatus, TemperatureUnit,
};

const RETRY_HINT: &str = "Check your connection and API key, then try again.";

pub fn current(weather: &CurrentWeather, unit: TemperatureUnit) -> Vec<String> {
    let tz = weather.timezone_offset;
    let marker = weather.marker_severity();

    vec![
        format!("{}  ({})", weather.location_name, weather.coordinate),
        format!(
            "{}  {}  {}  (feels like {})",
            weather_glyph(&weather.icon),
            format_temperature(weather.temperature, unit),
            weather.description,
            format_temperature(weather.feels_like, unit)
        ),
        format!(
            "H {}  L {}   Humidity {}%   Pressure {:.0} hPa",
            format_temperature(weather.temp_max, unit),
            format_temperature(weather.temp_min, unit),
            weather.humidity,
            weather.pressure
        ),
        format!(
            "Wind {:.1} m/s {}   Visibility {:.1} km   Clouds {}%",
            weather.wind_speed,
            wind_direction(weather.wind_direction),
            weather.visibility / 1000.0,
            weather.cloudiness
        ),
        format!(
            "Sunrise {}   Sunset {}",
            format_time(weather.sunrise, tz),
            format_time(weather.sunset, tz)
        ),
        format!("Conditions: {} ({})", marker.label, marker.color),
    ]
}

pub fn alerts(alerts: &[Alert]) -> Vec<String> {
    if alerts.is_empty() {
        return vec!["No weather advisories.".to_string()];
    }
    alerts
        .iter()
        .map(|a| format!("[{}] {}: {}", a.severity.label(), a.title, a.message))
        .collect()
}

pub fn forecast(forecast: &Forecast, days: usize, unit: TemperatureUnit) -> Vec<String> {
    let mut lines = vec![format!("{} forecast", forecast.location_name)];

    for day in daily_summaries(forecast, days) {
        lines.push(format!(
            "{:<12} {}  {:>5} / {:<5} rain {:>3.0}%  {:.1} mm  wind {:.1} m/s  {}",
            day.date.format("%a, %b %-d").to_string(),
            weather_glyph(&day.icon),
            format_temperature(day.high, unit),
            format_temperature(day.low, unit),
            day.max_pop * 100.0,
            day.total_rain,
            day.max_wind,
            day.description
        ));
    }

    let breakdown = condition_breakdown(forecast)
        .into_iter()
        .map(|(condition, count)| format!("{} {}", condition.label(), count))
        .collect::<Vec<_>>()
        .join(", ");
    if !breakdown.is_empty() {
        lines.push(format!("Conditions: {}", breakdown));
    }
    lines
}

pub fn candidates(results: &[LocationCandidate]) -> Vec<String> {
    if results.is_empty() {
        return vec!["No matching places.".to_string()];
    }
    results
        .iter()
        .map(|c| format!("{}  ({})", c.display_name(), c.coordinate()))
        .collect()
}

/// Full dashboard for a store snapshot.
///
/// With no data ever loaded an error is blocking; once data exists a failed
/// refresh only adds a stale notice above the last good snapshot.
pub fn state(state: &FetchState, unit: TemperatureUnit, now: DateTime<Utc>) -> Vec<String> {
    match (state.status(), &state.current_weather) {
        (StoreStatus::Loading, None) | (StoreStatus::Idle, None) => {
            vec!["Loading weather data...".to_string()]
        }
        (StoreStatus::Errored, _) | (_, None) => vec![
            format!(
                "Unable to load weather data: {}",
                state.error.as_deref().unwrap_or("unknown error")
            ),
            RETRY_HINT.to_string(),
        ],
        (status, Some(weather)) => {
            let mut lines = Vec::new();
            if status == StoreStatus::Stale {
                lines.push(format!(
                    "! Showing last known data, refresh failed: {}",
                    state.error.as_deref().unwrap_or("unknown error")
                ));
            }
            lines.extend(current(weather, unit));
            if let Some(updated) = state.last_updated {
                let refreshing = if status == StoreStatus::Loading {
                    " (refreshing)"
                } else {
                    ""
                };
                lines.push(format!(
                    "Updated {}{}",
                    format_updated_ago(updated, now),
                    refreshing
                ));
            }
            lines.push(String::new());
            lines.extend(alerts(&state.alerts().unwrap_or_default()));
            lines
        }
    }
}

pub fn print(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use chrono::TimeZone;
    use skywatch_weather::{Coordinate, WeatherCondition};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 3, 12, 0, 0).unwrap()
    }

    fn sample() -> CurrentWeather {
        CurrentWeather {
            location_name: "New Delhi".into(),
            coordinate: Coordinate::new(28.6139, 77.209),
            condition: WeatherCondition::Clear,
            description: "clear sky".into(),
            icon: "01d".into(),
            temperature: 38.0,
            feels_like: 41.0,
            temp_min: 36.0,
            temp_max: 39.0,
            humidity: 30,
            pressure: 1004.0,
            visibility: 9000.0,
            wind_speed: 3.2,
            wind_direction: 300.0,
            cloudiness: 0,
            rain_1h: None,
            snow_1h: None,
            observed_at: now(),
            sunrise: now(),
            sunset: now(),
            timezone_offset: 19_800,
        }
    }

    #[test]
    fn test_initial_loading() {
        let lines = state(&FetchState::default(), TemperatureUnit::Celsius, now());
        assert_eq!(lines, vec!["Loading weather data...".to_string()]);
    }

    #[test]
    fn test_blocking_error_without_data() {
        let fetch_state = FetchState {
            is_loading: false,
            error: Some("timed out".into()),
            ..FetchState::default()
        };
        let lines = state(&fetch_state, TemperatureUnit::Celsius, now());
        assert!(lines[0].contains("timed out"));
        assert_eq!(lines[1], RETRY_HINT);
    }

    #[test]
    fn test_stale_notice_keeps_data() {
        let fetch_state = FetchState {
            current_weather: Some(sample()),
            is_loading: false,
            error: Some("timed out".into()),
            last_updated: Some(now()),
            ..FetchState::default()
        };
        let lines = state(&fetch_state, TemperatureUnit::Fahrenheit, now());
        assert!(lines[0].starts_with("! Showing last known data"));
        assert!(lines.iter().any(|l| l.contains("New Delhi")));
        assert!(lines.iter().any(|l| l.contains("100°F")));
        assert!(lines.iter().any(|l| l.contains("Hot Weather Advisory")));
        assert!(lines.iter().any(|l| l == "Updated just now"));
    }

    #[test]
    fn test_empty_alerts_message() {
        assert_eq!(alerts(&[]), vec!["No weather advisories.".to_string()]);
    }
}
