//! Derived views over a forecast: per-day summaries, condition counts and
//! the near-term temperature series.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

use crate::types::{Forecast, ForecastEntry, WeatherCondition};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    /// Calendar day in the forecast location's local time
    pub date: NaiveDate,
    pub high: f64,
    pub low: f64,
    pub max_pop: f64,
    pub total_rain: f64,
    pub max_wind: f64,
    pub condition: WeatherCondition,
    pub icon: String,
    pub description: String,
}

impl DailySummary {
    fn start(date: NaiveDate, entry: &ForecastEntry) -> Self {
        Self {
            date,
            high: entry.temp_max,
            low: entry.temp_min,
            max_pop: entry.pop,
            total_rain: entry.rain_3h.unwrap_or(0.0),
            max_wind: entry.wind_speed,
            condition: entry.condition,
            icon: entry.icon.clone(),
            description: entry.description.clone(),
        }
    }

    fn absorb(&mut self, entry: &ForecastEntry) {
        self.high = self.high.max(entry.temp_max);
        self.low = self.low.min(entry.temp_min);
        self.max_pop = self.max_pop.max(entry.pop);
        self.total_rain += entry.rain_3h.unwrap_or(0.0);
        self.max_wind = self.max_wind.max(entry.wind_speed);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendPoint {
    pub timestamp: DateTime<Utc>,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: u8,
}

fn local_date(timestamp: DateTime<Utc>, tz_offset_secs: i32) -> NaiveDate {
    (timestamp + Duration::seconds(i64::from(tz_offset_secs))).date_naive()
}

/// Group entries by local calendar day, keeping at most `max_days` days.
pub fn daily_summaries(forecast: &Forecast, max_days: usize) -> Vec<DailySummary> {
    let mut days: Vec<DailySummary> = Vec::new();

    for entry in &forecast.entries {
        let date = local_date(entry.timestamp, forecast.timezone_offset);
        match days.last_mut() {
            Some(day) if day.date == date => day.absorb(entry),
            _ => {
                if days.len() == max_days {
                    break;
                }
                days.push(DailySummary::start(date, entry));
            }
        }
    }

    days
}

/// Entry count per condition, in first-seen order
pub fn condition_breakdown(forecast: &Forecast) -> Vec<(WeatherCondition, usize)> {
    let mut counts: Vec<(WeatherCondition, usize)> = Vec::new();
    for entry in &forecast.entries {
        match counts.iter_mut().find(|(c, _)| *c == entry.condition) {
            Some((_, n)) => *n += 1,
            None => counts.push((entry.condition, 1)),
        }
    }
    counts
}

pub fn temperature_trend(forecast: &Forecast, n: usize) -> Vec<TrendPoint> {
    forecast
        .entries
        .iter()
        .take(n)
        .map(|e| TrendPoint {
            timestamp: e.timestamp,
            temperature: e.temperature,
            feels_like: e.feels_like,
            humidity: e.humidity,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use crate::types::Coordinate;
    use chrono::TimeZone;

    fn entry(hour_offset: i64, temp: f64, condition: WeatherCondition) -> ForecastEntry {
        let start = Utc.with_ymd_and_hms(2024, 7, 3, 0, 0, 0).unwrap();
        ForecastEntry {
            timestamp: start + Duration::hours(hour_offset),
            condition,
            description: condition.label().to_lowercase(),
            icon: "01d".into(),
            temperature: temp,
            feels_like: temp + 1.0,
            temp_min: temp - 1.0,
            temp_max: temp + 1.0,
            humidity: 60,
            pressure: 1010.0,
            visibility: 10_000.0,
            wind_speed: 2.0 + hour_offset as f64 / 10.0,
            wind_direction: 0.0,
            cloudiness: 10,
            pop: 0.1,
            rain_3h: None,
            is_day: true,
        }
    }

    fn forecast(tz: i32, entries: Vec<ForecastEntry>) -> Forecast {
        Forecast::new("Delhi", Coordinate::new(28.6, 77.2), tz, entries)
    }

    #[test]
    fn test_daily_summaries_group_by_utc_day() {
        let mut entries: Vec<ForecastEntry> = (0..16)
            .map(|i| entry(i * 3, 20.0 + i as f64, WeatherCondition::Clear))
            .collect();
        entries[2].pop = 0.8;
        entries[3].rain_3h = Some(1.5);
        entries[5].rain_3h = Some(0.5);

        let days = daily_summaries(&forecast(0, entries), 5);

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2024, 7, 3).unwrap());
        assert_eq!(days[0].low, 19.0);
        assert_eq!(days[0].high, 28.0);
        assert_eq!(days[0].max_pop, 0.8);
        assert!((days[0].total_rain - 2.0).abs() < 1e-9);
        assert_eq!(days[1].low, 27.0);
    }

    #[test]
    fn test_daily_summaries_use_local_offset() {
        // 21:00 UTC is already the next day at +05:30
        let entries = vec![
            entry(0, 20.0, WeatherCondition::Clear),
            entry(18, 22.0, WeatherCondition::Clouds),
            entry(21, 24.0, WeatherCondition::Rain),
        ];
        let days = daily_summaries(&forecast(19_800, entries), 5);
        assert_eq!(days.len(), 2);
        assert_eq!(days[1].date, NaiveDate::from_ymd_opt(2024, 7, 4).unwrap());
        assert_eq!(days[1].condition, WeatherCondition::Rain);
    }

    #[test]
    fn test_daily_summaries_respect_max_days() {
        let entries: Vec<ForecastEntry> = (0..40)
            .map(|i| entry(i * 3, 20.0, WeatherCondition::Clear))
            .collect();
        let f = forecast(0, entries);
        assert_eq!(daily_summaries(&f, 3).len(), 3);
        assert_eq!(daily_summaries(&f, 10).len(), 5);
        assert!(daily_summaries(&f, 0).is_empty());
    }

    #[test]
    fn test_representative_is_first_entry_of_day() {
        let entries = vec![
            entry(0, 20.0, WeatherCondition::Mist),
            entry(3, 30.0, WeatherCondition::Thunderstorm),
        ];
        let days = daily_summaries(&forecast(0, entries), 5);
        assert_eq!(days[0].condition, WeatherCondition::Mist);
        assert_eq!(days[0].description, "mist");
    }

    #[test]
    fn test_condition_breakdown_first_seen_order() {
        let entries = vec![
            entry(0, 20.0, WeatherCondition::Rain),
            entry(3, 20.0, WeatherCondition::Clear),
            entry(6, 20.0, WeatherCondition::Rain),
            entry(9, 20.0, WeatherCondition::Clouds),
            entry(12, 20.0, WeatherCondition::Rain),
        ];
        assert_eq!(
            condition_breakdown(&forecast(0, entries)),
            vec![
                (WeatherCondition::Rain, 3),
                (WeatherCondition::Clear, 1),
                (WeatherCondition::Clouds, 1),
            ]
        );
    }

    #[test]
    fn test_temperature_trend_takes_first_n() {
        let entries: Vec<ForecastEntry> = (0..10)
            .map(|i| entry(i * 3, 10.0 + i as f64, WeatherCondition::Clear))
            .collect();
        let trend = temperature_trend(&forecast(0, entries), 8);
        assert_eq!(trend.len(), 8);
        assert_eq!(trend[0].temperature, 10.0);
        assert_eq!(trend[7].feels_like, 18.0);
        assert!(temperature_trend(&forecast(0, Vec::new()), 8).is_empty());
    }
}
