//! Display helpers. Values are stored in Celsius and only rounded here.

use chrono::{DateTime, FixedOffset, Offset, Utc};

use crate::types::TemperatureUnit;

const COMPASS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Glyph for icon codes missing from the table
pub const DEFAULT_GLYPH: &str = "🌤️";

/// Nearest integer with halves rounded towards positive infinity, so -2.5
/// becomes -2 (`f64::round` would give -3)
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Celsius to whole-degree Fahrenheit
pub fn to_fahrenheit(celsius: f64) -> i64 {
    round_half_up(celsius * 9.0 / 5.0 + 32.0)
}

/// Celsius rounded to whole degrees
pub fn to_celsius_display(celsius: f64) -> i64 {
    round_half_up(celsius)
}

/// Whole-degree value in `unit`
pub fn display_degrees(celsius: f64, unit: TemperatureUnit) -> i64 {
    match unit {
        TemperatureUnit::Celsius => to_celsius_display(celsius),
        TemperatureUnit::Fahrenheit => to_fahrenheit(celsius),
    }
}

/// e.g. `31°C` or `88°F`
pub fn format_temperature(celsius: f64, unit: TemperatureUnit) -> String {
    format!("{}{}", display_degrees(celsius, unit), unit.symbol())
}

/// Emoji for an OpenWeatherMap icon code
pub fn weather_glyph(icon_code: &str) -> &'static str {
    match icon_code {
        "01d" => "☀️",
        "01n" => "🌙",
        "02d" => "⛅",
        "02n" | "03d" | "03n" | "04d" | "04n" => "☁️",
        "09d" | "09n" => "🌧️",
        "10d" | "10n" => "🌦️",
        "11d" | "11n" => "⛈️",
        "13d" | "13n" => "❄️",
        "50d" | "50n" => "🌫️",
        _ => DEFAULT_GLYPH,
    }
}

/// 16-point compass bucket for a bearing in degrees
pub fn wind_direction(degrees: f64) -> &'static str {
    if !degrees.is_finite() {
        return COMPASS[0];
    }
    let index = (degrees.rem_euclid(360.0) / 22.5).round() as usize % COMPASS.len();
    COMPASS[index]
}

// Out-of-range offsets fall back to UTC
fn local(timestamp: DateTime<Utc>, tz_offset_secs: i32) -> DateTime<FixedOffset> {
    let offset = FixedOffset::east_opt(tz_offset_secs).unwrap_or_else(|| Utc.fix());
    timestamp.with_timezone(&offset)
}

/// `HH:MM` in the location's local time
pub fn format_time(timestamp: DateTime<Utc>, tz_offset_secs: i32) -> String {
    local(timestamp, tz_offset_secs).format("%H:%M").to_string()
}

/// e.g. `Wed, Jul 3` in the location's local time
pub fn format_date(timestamp: DateTime<Utc>, tz_offset_secs: i32) -> String {
    local(timestamp, tz_offset_secs).format("%a, %b %-d").to_string()
}

/// Relative age of the last successful update
pub fn format_updated_ago(last_updated: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(last_updated);
    let minutes = elapsed.num_minutes();

    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        plural(minutes, "minute")
    } else if elapsed.num_hours() < 24 {
        plural(elapsed.num_hours(), "hour")
    } else {
        plural(elapsed.num_days(), "day")
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", n, unit)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_fahrenheit_conversion() {
        assert_eq!(to_fahrenheit(0.0), 32);
        assert_eq!(to_fahrenheit(100.0), 212);
        assert_eq!(to_fahrenheit(-40.0), -40);
        assert_eq!(to_fahrenheit(25.0), 77);
        // 36.6 * 1.8 + 32 = 97.88
        assert_eq!(to_fahrenheit(36.6), 98);
    }

    #[test]
    fn test_celsius_display_rounds() {
        assert_eq!(to_celsius_display(24.4), 24);
        assert_eq!(to_celsius_display(24.5), 25);
        assert_eq!(to_celsius_display(-3.6), -4);
    }

    #[test]
    fn test_negative_halves_round_up() {
        assert_eq!(to_celsius_display(-0.5), 0);
        assert_eq!(to_celsius_display(-2.5), -2);
        assert_eq!(round_half_up(-2.6), -3);
        // -17.5°C is exactly 0.5°F
        assert_eq!(to_fahrenheit(-17.5), 1);
        assert_eq!(format_temperature(-0.5, TemperatureUnit::Celsius), "0°C");
    }

    #[test]
    fn test_unit_flip_is_lossy_only_within_rounding() {
        let celsius = 21.3;
        let f = to_fahrenheit(celsius) as f64;
        let back = (f - 32.0) * 5.0 / 9.0;
        assert!((back - celsius).abs() <= 0.5);
    }

    #[test]
    fn test_format_temperature() {
        assert_eq!(format_temperature(31.4, TemperatureUnit::Celsius), "31°C");
        assert_eq!(format_temperature(31.4, TemperatureUnit::Fahrenheit), "89°F");
    }

    #[test]
    fn test_known_glyphs() {
        assert_eq!(weather_glyph("01d"), "☀️");
        assert_eq!(weather_glyph("01n"), "🌙");
        assert_eq!(weather_glyph("04n"), "☁️");
        assert_eq!(weather_glyph("11d"), "⛈️");
    }

    #[test]
    fn test_unknown_glyph_is_default() {
        assert_eq!(weather_glyph("99x"), DEFAULT_GLYPH);
        assert_eq!(weather_glyph(""), DEFAULT_GLYPH);
    }

    #[test]
    fn test_wind_direction_buckets() {
        assert_eq!(wind_direction(0.0), "N");
        assert_eq!(wind_direction(11.0), "N");
        assert_eq!(wind_direction(12.0), "NNE");
        assert_eq!(wind_direction(90.0), "E");
        assert_eq!(wind_direction(225.0), "SW");
        assert_eq!(wind_direction(350.0), "N");
        assert_eq!(wind_direction(360.0), "N");
        assert_eq!(wind_direction(-90.0), "W");
        assert_eq!(wind_direction(f64::NAN), "N");
    }

    #[test]
    fn test_format_time_uses_offset() {
        let ts = Utc.with_ymd_and_hms(2024, 7, 3, 6, 0, 0).unwrap();
        assert_eq!(format_time(ts, 0), "06:00");
        assert_eq!(format_time(ts, 19_800), "11:30");
    }

    #[test]
    fn test_format_date() {
        let ts = Utc.with_ymd_and_hms(2024, 7, 3, 20, 0, 0).unwrap();
        assert_eq!(format_date(ts, 0), "Wed, Jul 3");
        // already the 4th in IST
        assert_eq!(format_date(ts, 19_800), "Thu, Jul 4");
    }

    #[test]
    fn test_updated_ago() {
        let now = Utc.with_ymd_and_hms(2024, 7, 3, 12, 0, 0).unwrap();
        assert_eq!(format_updated_ago(now - Duration::seconds(20), now), "just now");
        assert_eq!(format_updated_ago(now - Duration::minutes(1), now), "1 minute ago");
        assert_eq!(format_updated_ago(now - Duration::minutes(5), now), "5 minutes ago");
        assert_eq!(format_updated_ago(now - Duration::hours(3), now), "3 hours ago");
        assert_eq!(format_updated_ago(now - Duration::days(2), now), "2 days ago");
        assert_eq!(format_updated_ago(now + Duration::minutes(2), now), "just now");
    }
}
