//! Weather service for Skywatch
//!
//! Provides current conditions and forecasts from OpenWeatherMap with a
//! synthetic fallback, a polling store with supersession-safe refreshes,
//! and the derived views renderers need (alerts, marker severity, daily
//! summaries, display formatting).

pub mod alerts;
pub mod analytics;
pub mod format;
pub mod geocode;
mod owm;
pub mod provider;
pub mod severity;
pub mod store;
pub mod synthetic;
pub mod types;

pub use alerts::{derive_alerts, Alert, AlertCategory, AlertKind, AlertSeverity};
pub use analytics::{condition_breakdown, daily_summaries, temperature_trend, DailySummary, TrendPoint};
pub use provider::{ProviderSettings, WeatherProvider, WeatherSource};
pub use severity::{classify_severity, MarkerSeverity, SeverityLevel};
pub use store::{FetchState, StoreStatus, StoreTarget, WeatherStore, DEFAULT_REFRESH_INTERVAL_MS};
pub use types::*;
