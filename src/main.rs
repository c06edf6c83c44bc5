mod cli;
mod error_mapping;
mod render;

use anyhow::Result;
use clap::Parser;
use skywatch_core::error::WeatherError as ServiceError;
use skywatch_core::{AppError, Config};
use skywatch_weather::{
    Coordinate, FetchState, ProviderSettings, StoreStatus, StoreTarget, TemperatureUnit,
    WeatherProvider, WeatherStore,
};

use crate::cli::{Cli, Command, LocationArgs, UnitArg};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize core
    skywatch_core::init()?;

    let (config, _validation) = Config::load_validated().map_err(|e| {
        let err = AppError::from_config_load(e);
        tracing::error!("{}", err.user_message());
        err
    })?;
    tracing::debug!("Config directory: {}", config.config_dir.display());

    let unit = match cli.unit {
        Some(UnitArg::C) => TemperatureUnit::Celsius,
        Some(UnitArg::F) => TemperatureUnit::Fahrenheit,
        None => config.weather.temperature_unit,
    };

    let settings = ProviderSettings::new(config.weather.api_key.clone())
        .with_base_urls(config.weather.base_url.clone(), config.weather.geo_url.clone());
    let provider = WeatherProvider::new(settings).map_err(error_mapping::to_app_error)?;

    match cli.command {
        Command::Now(location) => {
            let target = resolve_target(&provider, &config, &location).await;
            let state = load_once(provider, target).await;
            render::print(&render::state(&state, unit, chrono::Utc::now()));
        }
        Command::Forecast { location, days } => {
            let target = resolve_target(&provider, &config, &location).await;
            let state = load_once(provider, target).await;
            match &state.forecast {
                Some(forecast) => render::print(&render::forecast(forecast, days, unit)),
                None => render::print(&render::state(&state, unit, chrono::Utc::now())),
            }
        }
        Command::Search { query } => {
            let results = provider.search_location(&query).await;
            render::print(&render::candidates(&results));
        }
        Command::Watch {
            location,
            interval_secs,
        } => {
            let target = resolve_target(&provider, &config, &location).await;
            let interval_ms = interval_secs
                .map(|secs| i64::try_from(secs.saturating_mul(1000)).unwrap_or(i64::MAX))
                .unwrap_or_else(|| config.weather.refresh_interval_ms());
            watch(provider, target, interval_ms, unit).await;
        }
    }

    Ok(())
}

/// Pick the location from CLI flags, falling back to the configured one
async fn resolve_target(
    provider: &WeatherProvider,
    config: &Config,
    location: &LocationArgs,
) -> StoreTarget {
    if let (Some(lat), Some(lon)) = (location.lat, location.lon) {
        let coordinate = Coordinate::new(lat, lon);
        let name = provider
            .location_by_coords(coordinate)
            .await
            .first()
            .map(|c| c.display_name())
            .unwrap_or_else(|| coordinate.to_string());
        return StoreTarget::new(coordinate, name);
    }

    if let Some(city) = &location.city {
        match provider.search_location(city).await.first() {
            Some(candidate) => {
                return StoreTarget::new(candidate.coordinate(), candidate.display_name())
            }
            None => {
                let err = AppError::Weather(ServiceError::LocationNotFound(city.clone()));
                tracing::warn!("{}, using configured location {}", err, config.location.name);
            }
        }
    }

    StoreTarget::new(
        Coordinate::new(config.location.latitude, config.location.longitude),
        config.location.name.clone(),
    )
}

/// One refresh through a non-polling store, returned once it settles
async fn load_once(provider: WeatherProvider, target: StoreTarget) -> FetchState {
    let store = WeatherStore::spawn(provider, target, 0);
    let mut rx = store.subscribe();

    let state = loop {
        let state = rx.borrow_and_update().clone();
        if state.status() != StoreStatus::Loading {
            break state;
        }
        if rx.changed().await.is_err() {
            break rx.borrow().clone();
        }
    };

    store.shutdown().await;
    state
}

async fn watch(provider: WeatherProvider, target: StoreTarget, interval_ms: i64, unit: TemperatureUnit) {
    let store = WeatherStore::spawn(provider, target, interval_ms);
    let mut rx = store.subscribe();

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        let state = rx.borrow_and_update().clone();
        render::print(&render::state(&state, unit, chrono::Utc::now()));
        println!();

        tokio::select! {
            _ = &mut ctrl_c => break,
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }

    tracing::info!("Stopping weather watch");
    store.shutdown().await;
}
