//! Synthetic weather used when the provider is unconfigured or unreachable.
//!
//! Values are a smooth function of the coordinate (nearby points get similar
//! temperatures) plus a time-of-day oscillation. The output has exactly the
//! shape of real provider data.

use std::f64::consts::PI;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::types::{Coordinate, CurrentWeather, Forecast, ForecastEntry, WeatherCondition};

/// Name used until the caller substitutes its own display name
pub const PLACEHOLDER_NAME: &str = "Current Location";

/// Number of steps in a synthetic forecast
pub const FORECAST_STEPS: usize = 40;
/// Hours between forecast steps
pub const STEP_HOURS: i64 = 3;

/// IST, the original dataset's home timezone
const SYNTHETIC_TZ_OFFSET: i32 = 19_800;

struct Preset {
    condition: WeatherCondition,
    description: &'static str,
    icon: &'static str,
}

const PRESETS: [Preset; 4] = [
    Preset {
        condition: WeatherCondition::Clear,
        description: "clear sky",
        icon: "01d",
    },
    Preset {
        condition: WeatherCondition::Clouds,
        description: "scattered clouds",
        icon: "02d",
    },
    Preset {
        condition: WeatherCondition::Rain,
        description: "light rain",
        icon: "10d",
    },
    Preset {
        condition: WeatherCondition::Mist,
        description: "mist",
        icon: "50d",
    },
];

/// Location-dependent baseline temperature in Celsius
pub fn base_temperature(coordinate: Coordinate) -> f64 {
    25.0 + (coordinate.latitude * 0.1).sin() * 10.0 + (coordinate.longitude * 0.1).cos() * 5.0
}

fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    let secs = now.timestamp();
    DateTime::from_timestamp(secs - secs.rem_euclid(86_400), 0).unwrap_or(now)
}

/// Synthesize a current-conditions snapshot for `coordinate` at `now`
pub fn current_weather<R: Rng + ?Sized>(
    coordinate: Coordinate,
    now: DateTime<Utc>,
    rng: &mut R,
) -> CurrentWeather {
    let t = now.timestamp() as f64;
    let temp = base_temperature(coordinate) + (t / 3600.0).sin() * 3.0;
    let preset = &PRESETS[rng.gen_range(0..PRESETS.len())];
    let midnight = start_of_day(now);

    CurrentWeather {
        location_name: PLACEHOLDER_NAME.to_string(),
        coordinate,
        condition: preset.condition,
        description: preset.description.to_string(),
        icon: preset.icon.to_string(),
        temperature: temp,
        feels_like: temp + 2.0,
        temp_min: temp - 3.0,
        temp_max: temp + 4.0,
        humidity: (45.0 + (t / 1800.0).sin() * 25.0).round() as u8,
        pressure: 1013.0 + (t / 7200.0).sin() * 20.0,
        visibility: 8000.0 + rng.gen_range(0.0..4000.0),
        wind_speed: 2.0 + rng.gen_range(0.0..6.0),
        wind_direction: f64::from(rng.gen_range(0u16..360)),
        cloudiness: rng.gen_range(0..100),
        rain_1h: None,
        snow_1h: None,
        observed_at: now,
        sunrise: midnight + Duration::hours(6),
        sunset: midnight + Duration::hours(18),
        timezone_offset: SYNTHETIC_TZ_OFFSET,
    }
}

/// Synthesize a 5-day forecast at 3-hour steps starting at `now`
pub fn forecast<R: Rng + ?Sized>(
    coordinate: Coordinate,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Forecast {
    let base = base_temperature(coordinate);

    let entries = (0..FORECAST_STEPS)
        .map(|i| {
            let step_hours = i as i64 * STEP_HOURS;
            let timestamp = now + Duration::hours(step_hours);
            let daily = ((step_hours as f64 * 3600.0) / 86_400.0 * 2.0 * PI).sin() * 8.0;
            let hourly = ((step_hours as f64) / 24.0 * 2.0 * PI).sin() * 4.0;
            let temp = base + daily + hourly;
            let t = timestamp.timestamp() as f64;
            let preset = &PRESETS[i % PRESETS.len()];
            let pop = ((i as f64 * 0.5).sin() * 0.5 + 0.3).clamp(0.0, 1.0);

            ForecastEntry {
                timestamp,
                condition: preset.condition,
                description: preset.description.to_string(),
                icon: preset.icon.to_string(),
                temperature: temp,
                feels_like: temp + 2.0,
                temp_min: temp - 2.0,
                temp_max: temp + 3.0,
                humidity: (50.0 + (t / 3600.0).sin() * 30.0).round() as u8,
                pressure: 1013.0 + (t / 7200.0).sin() * 15.0,
                visibility: 8000.0 + ((i * 100) % 4000) as f64,
                wind_speed: 2.0 + (i % 6) as f64,
                wind_direction: ((i * 15) % 360) as f64,
                cloudiness: ((i * 7) % 100) as u8,
                pop,
                rain_3h: (i % 5 == 0).then(|| rng.gen_range(0.0..3.0)),
                is_day: i % 8 < 4,
            }
        })
        .collect();

    Forecast::new(PLACEHOLDER_NAME, coordinate, SYNTHETIC_TZ_OFFSET, entries)
}
