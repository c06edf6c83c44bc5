//! Advisory derivation from a single current-conditions snapshot.
//!
//! Each axis (heat, cold, humidity, wind, visibility, rain, storm, comfort)
//! is an exclusive ladder evaluated independently, so a snapshot yields at
//! most one alert per axis and never the same kind twice.

use serde::Serialize;

use crate::format::round_half_up;
use crate::types::{CurrentWeather, WeatherCondition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlertKind {
    ExtremeHeat,
    Heatwave,
    Hot,
    ExtremeCold,
    ExtremeHumidity,
    HighHumidity,
    StrongWind,
    ModerateWind,
    PoorVisibility,
    ReducedVisibility,
    HeavyRain,
    Rain,
    Thunderstorm,
    Pleasant,
}

impl AlertKind {
    /// Stable identifier, one per kind
    pub fn id(&self) -> &'static str {
        match self {
            AlertKind::ExtremeHeat => "extreme-heat",
            AlertKind::Heatwave => "heatwave",
            AlertKind::Hot => "hot",
            AlertKind::ExtremeCold => "extreme-cold",
            AlertKind::ExtremeHumidity => "extreme-humidity",
            AlertKind::HighHumidity => "high-humidity",
            AlertKind::StrongWind => "strong-wind",
            AlertKind::ModerateWind => "moderate-wind",
            AlertKind::PoorVisibility => "poor-visibility",
            AlertKind::ReducedVisibility => "reduced-visibility",
            AlertKind::HeavyRain => "heavy-rain",
            AlertKind::Rain => "rain",
            AlertKind::Thunderstorm => "thunderstorm",
            AlertKind::Pleasant => "pleasant",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertCategory {
    Warning,
    Info,
    Success,
    Error,
}

/// Ordered low < medium < high < extreme
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
    Extreme,
}

impl AlertSeverity {
    pub fn label(&self) -> &'static str {
        match self {
            AlertSeverity::Low => "low",
            AlertSeverity::Medium => "medium",
            AlertSeverity::High => "high",
            AlertSeverity::Extreme => "extreme",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub category: AlertCategory,
    pub severity: AlertSeverity,
    pub title: String,
    pub message: String,
}

impl Alert {
    fn new(
        kind: AlertKind,
        category: AlertCategory,
        severity: AlertSeverity,
        title: &str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            category,
            severity,
            title: title.to_string(),
            message: message.into(),
        }
    }
}

/// Derive every advisory that applies to `weather`, most severe first.
///
/// An empty result means nothing to report.
pub fn derive_alerts(weather: &CurrentWeather) -> Vec<Alert> {
    let mut alerts: Vec<Alert> = [
        heat_alert(weather.temperature),
        cold_alert(weather.temperature),
        humidity_alert(weather.humidity),
        wind_alert(weather.wind_speed),
        visibility_alert(weather.visibility),
        rain_alert(weather.condition, weather.rain_1h),
        storm_alert(weather.condition),
        pleasant_alert(weather),
    ]
    .into_iter()
    .flatten()
    .collect();

    // sort_by is stable, so equal severities keep rule order
    alerts.sort_by(|a, b| b.severity.cmp(&a.severity));
    alerts
}

fn heat_alert(temp: f64) -> Option<Alert> {
    let rounded = round_half_up(temp);
    if temp > 45.0 {
        Some(Alert::new(
            AlertKind::ExtremeHeat,
            AlertCategory::Error,
            AlertSeverity::Extreme,
            "EXTREME HEAT WARNING",
            format!(
                "Dangerous temperature of {}°C. Avoid all outdoor activities. \
                 Risk of heat stroke is very high.",
                rounded
            ),
        ))
    } else if temp > 40.0 {
        Some(Alert::new(
            AlertKind::Heatwave,
            AlertCategory::Error,
            AlertSeverity::High,
            "Heat Wave Alert",
            format!(
                "Temperature is {}°C. Stay hydrated, seek shade, and limit outdoor exposure.",
                rounded
            ),
        ))
    } else if temp > 35.0 {
        Some(Alert::new(
            AlertKind::Hot,
            AlertCategory::Warning,
            AlertSeverity::Medium,
            "Hot Weather Advisory",
            format!(
                "Temperature is {}°C. Take precautions when going outside.",
                rounded
            ),
        ))
    } else {
        None
    }
}

fn cold_alert(temp: f64) -> Option<Alert> {
    (temp < 5.0).then(|| {
        Alert::new(
            AlertKind::ExtremeCold,
            AlertCategory::Error,
            AlertSeverity::High,
            "Extreme Cold Warning",
            format!(
                "Temperature is {}°C. Risk of hypothermia. Dress warmly and limit exposure.",
                round_half_up(temp)
            ),
        )
    })
}

fn humidity_alert(humidity: u8) -> Option<Alert> {
    if humidity > 90 {
        Some(Alert::new(
            AlertKind::ExtremeHumidity,
            AlertCategory::Warning,
            AlertSeverity::Medium,
            "Extreme Humidity",
            format!(
                "Humidity is {}%. Very uncomfortable conditions. \
                 Stay in air-conditioned areas if possible.",
                humidity
            ),
        ))
    } else if humidity > 80 {
        Some(Alert::new(
            AlertKind::HighHumidity,
            AlertCategory::Info,
            AlertSeverity::Low,
            "High Humidity",
            format!(
                "Humidity is {}%. You may feel uncomfortable due to high moisture levels.",
                humidity
            ),
        ))
    } else {
        None
    }
}

fn wind_alert(speed: f64) -> Option<Alert> {
    if speed > 15.0 {
        Some(Alert::new(
            AlertKind::StrongWind,
            AlertCategory::Error,
            AlertSeverity::High,
            "Strong Wind Warning",
            format!(
                "Wind speed is {:.1} m/s. Dangerous conditions for outdoor activities. \
                 Secure loose objects.",
                speed
            ),
        ))
    } else if speed > 10.0 {
        Some(Alert::new(
            AlertKind::ModerateWind,
            AlertCategory::Warning,
            AlertSeverity::Medium,
            "Moderate Wind Advisory",
            format!(
                "Wind speed is {:.1} m/s. Be cautious of flying debris and secure loose objects.",
                speed
            ),
        ))
    } else {
        None
    }
}

fn visibility_alert(visibility_m: f64) -> Option<Alert> {
    let km = visibility_m / 1000.0;
    if visibility_m < 500.0 {
        Some(Alert::new(
            AlertKind::PoorVisibility,
            AlertCategory::Error,
            AlertSeverity::High,
            "Severe Visibility Warning",
            format!(
                "Visibility is only {:.1} km. Extremely dangerous driving conditions.",
                km
            ),
        ))
    } else if visibility_m < 1000.0 {
        Some(Alert::new(
            AlertKind::ReducedVisibility,
            AlertCategory::Warning,
            AlertSeverity::Medium,
            "Poor Visibility Alert",
            format!(
                "Visibility is {:.1} km. Drive carefully and use headlights.",
                km
            ),
        ))
    } else {
        None
    }
}

fn rain_alert(condition: WeatherCondition, rain_1h: Option<f64>) -> Option<Alert> {
    if condition != WeatherCondition::Rain {
        return None;
    }
    if rain_1h.is_some_and(|mm| mm > 10.0) {
        Some(Alert::new(
            AlertKind::HeavyRain,
            AlertCategory::Error,
            AlertSeverity::High,
            "Heavy Rain Warning",
            "Heavy rainfall detected. Risk of flooding. Avoid low-lying areas and drive carefully.",
        ))
    } else {
        Some(Alert::new(
            AlertKind::Rain,
            AlertCategory::Info,
            AlertSeverity::Low,
            "Rain Advisory",
            "Rain is currently falling. Carry an umbrella and drive carefully.",
        ))
    }
}

fn storm_alert(condition: WeatherCondition) -> Option<Alert> {
    (condition == WeatherCondition::Thunderstorm).then(|| {
        Alert::new(
            AlertKind::Thunderstorm,
            AlertCategory::Error,
            AlertSeverity::Extreme,
            "THUNDERSTORM WARNING",
            "Thunderstorm activity detected. Seek shelter immediately. \
             Avoid open areas and tall objects.",
        )
    })
}

fn pleasant_alert(weather: &CurrentWeather) -> Option<Alert> {
    let comfortable = (20.0..=30.0).contains(&weather.temperature)
        && weather.humidity < 70
        && weather.wind_speed < 5.0
        && weather.condition == WeatherCondition::Clear;

    comfortable.then(|| {
        Alert::new(
            AlertKind::Pleasant,
            AlertCategory::Success,
            AlertSeverity::Low,
            "Perfect Weather",
            "Excellent weather conditions! Ideal time for outdoor activities and recreation.",
        )
    })
}
