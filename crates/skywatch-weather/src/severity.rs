//! Map-marker severity for a location's current conditions.

use serde::Serialize;

use crate::types::{CurrentWeather, WeatherCondition};

const HEAVY_RAIN_MM: f64 = 5.0;
const MODERATE_RAIN_MM: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityLevel {
    Clear,
    Light,
    Moderate,
    Heavy,
}

/// Marker level plus the colour and label it is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MarkerSeverity {
    pub level: SeverityLevel,
    pub color: &'static str,
    pub label: &'static str,
}

impl MarkerSeverity {
    const fn new(level: SeverityLevel, color: &'static str, label: &'static str) -> Self {
        Self {
            level,
            color,
            label,
        }
    }
}

/// Classify a rain reading (mm over the last hour) and condition group.
///
/// The measured amount wins over the condition: a Clear sky reporting 6 mm is
/// still heavy rain.
pub fn classify_severity(condition: WeatherCondition, rain_1h: Option<f64>) -> MarkerSeverity {
    match rain_1h {
        Some(mm) if mm > HEAVY_RAIN_MM => {
            MarkerSeverity::new(SeverityLevel::Heavy, "#EF4444", "Heavy Rain")
        }
        Some(mm) if mm > MODERATE_RAIN_MM => {
            MarkerSeverity::new(SeverityLevel::Moderate, "#F59E0B", "Moderate Rain")
        }
        Some(_) => MarkerSeverity::new(SeverityLevel::Light, "#3B82F6", "Light Rain"),
        None if condition.is_rainy() => {
            MarkerSeverity::new(SeverityLevel::Light, "#3B82F6", "Light Rain")
        }
        None if condition.is_overcast() => {
            MarkerSeverity::new(SeverityLevel::Moderate, "#6B7280", "Cloudy")
        }
        None => MarkerSeverity::new(SeverityLevel::Clear, "#10B981", "Clear Sky"),
    }
}

impl CurrentWeather {
    pub fn marker_severity(&self) -> MarkerSeverity {
        classify_severity(self.condition, self.rain_1h)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn test_rain_amount_thresholds() {
        let heavy = classify_severity(WeatherCondition::Rain, Some(5.1));
        assert_eq!(heavy.level, SeverityLevel::Heavy);
        assert_eq!(heavy.color, "#EF4444");

        let moderate = classify_severity(WeatherCondition::Rain, Some(5.0));
        assert_eq!(moderate.level, SeverityLevel::Moderate);
        assert_eq!(moderate.label, "Moderate Rain");

        let light = classify_severity(WeatherCondition::Rain, Some(1.0));
        assert_eq!(light.level, SeverityLevel::Light);
    }

    #[test]
    fn test_zero_reading_is_light_rain() {
        let s = classify_severity(WeatherCondition::Clear, Some(0.0));
        assert_eq!(s.level, SeverityLevel::Light);
        assert_eq!(s.label, "Light Rain");
    }

    #[test]
    fn test_amount_overrides_condition() {
        let s = classify_severity(WeatherCondition::Clear, Some(7.0));
        assert_eq!(s.level, SeverityLevel::Heavy);
    }

    #[test]
    fn test_condition_only() {
        assert_eq!(
            classify_severity(WeatherCondition::Drizzle, None).label,
            "Light Rain"
        );
        let cloudy = classify_severity(WeatherCondition::Fog, None);
        assert_eq!(cloudy.level, SeverityLevel::Moderate);
        assert_eq!(cloudy.color, "#6B7280");
        assert_eq!(
            classify_severity(WeatherCondition::Snow, None).label,
            "Clear Sky"
        );
        assert_eq!(
            classify_severity(WeatherCondition::Clear, None).color,
            "#10B981"
        );
    }

    #[test]
    fn test_levels_are_ordered() {
        assert!(SeverityLevel::Heavy > SeverityLevel::Moderate);
        assert!(SeverityLevel::Light > SeverityLevel::Clear);
    }
}
