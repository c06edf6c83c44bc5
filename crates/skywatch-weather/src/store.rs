//! Polling weather store.
//!
//! A store is a supervisor task that exclusively owns one `FetchState`, one
//! refresh timer and at most one in-flight fetch. Consumers talk to it through
//! a [`WeatherStore`] handle: commands go in over an mpsc channel and state
//! snapshots come out over a `watch` channel.
//!
//! Every fetch gets a generation number and a child cancellation token. Starting
//! a new fetch cancels the previous one, and any result whose generation is no
//! longer current is dropped, so a superseded request can never overwrite
//! newer data.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::alerts::{derive_alerts, Alert};
use crate::provider::WeatherSource;
use crate::types::{Coordinate, CurrentWeather, Forecast, WeatherError};

/// Five minutes
pub const DEFAULT_REFRESH_INTERVAL_MS: i64 = 300_000;

/// Location a store tracks
#[derive(Debug, Clone, PartialEq)]
pub struct StoreTarget {
    pub coordinate: Coordinate,
    /// Written over the provider's own place name on every commit
    pub display_name: String,
}

impl StoreTarget {
    pub fn new(coordinate: Coordinate, display_name: impl Into<String>) -> Self {
        Self {
            coordinate,
            display_name: display_name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchState {
    pub current_weather: Option<CurrentWeather>,
    pub forecast: Option<Forecast>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl Default for FetchState {
    fn default() -> Self {
        Self {
            current_weather: None,
            forecast: None,
            is_loading: true,
            error: None,
            last_updated: None,
        }
    }
}

/// Coarse state for renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreStatus {
    /// A fetch with the loading indicator is in flight
    Loading,
    Ready,
    /// The last refresh failed but earlier data is still shown
    Stale,
    /// Nothing has ever loaded and the last attempt failed
    Errored,
    Idle,
}

impl FetchState {
    pub fn has_data(&self) -> bool {
        self.current_weather.is_some()
    }

    /// Advisories for the current snapshot, `None` until one has loaded
    pub fn alerts(&self) -> Option<Vec<Alert>> {
        self.current_weather.as_ref().map(derive_alerts)
    }

    pub fn status(&self) -> StoreStatus {
        match (self.is_loading, self.has_data(), self.error.is_some()) {
            (true, _, _) => StoreStatus::Loading,
            (false, true, true) => StoreStatus::Stale,
            (false, true, false) => StoreStatus::Ready,
            (false, false, true) => StoreStatus::Errored,
            (false, false, false) => StoreStatus::Idle,
        }
    }
}

#[derive(Debug)]
enum Command {
    Refresh,
    SetTarget(StoreTarget),
    SetRefreshInterval(i64),
}

#[derive(Debug, Clone, Copy)]
enum FetchReason {
    Initial,
    Manual,
    Retarget,
    Reconfigure,
    Poll,
}

struct Completion {
    generation: u64,
    outcome: Result<(CurrentWeather, Forecast), WeatherError>,
}

/// Handle to a running store. Dropping it stops the store.
pub struct WeatherStore {
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<FetchState>,
    shutdown: CancellationToken,
    task: JoinHandle<()>,
    _guard: DropGuard,
}

impl WeatherStore {
    /// Start a store for `target`, polling every `refresh_interval_ms`.
    ///
    /// An interval of zero or less disables polling; the store then only
    /// fetches on spawn, `refresh_data` and `set_target`. Must be called from
    /// within a tokio runtime.
    pub fn spawn<S: WeatherSource>(source: S, target: StoreTarget, refresh_interval_ms: i64) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(FetchState::default());
        let shutdown = CancellationToken::new();

        let period = polling_period(refresh_interval_ms);

        tracing::info!(
            "Starting weather store for {} at {} (refresh: {:?})",
            target.display_name,
            target.coordinate,
            period
        );

        let supervisor = Supervisor {
            source: Arc::new(source),
            target,
            period,
            state: FetchState::default(),
            generation: 0,
            inflight: None,
            publisher: state_tx,
            completions: completion_tx,
            shutdown: shutdown.clone(),
        };
        let task = tokio::spawn(supervisor.run(command_rx, completion_rx));

        Self {
            commands: command_tx,
            state: state_rx,
            _guard: shutdown.clone().drop_guard(),
            shutdown,
            task,
        }
    }

    /// Latest published snapshot
    pub fn state(&self) -> FetchState {
        self.state.borrow().clone()
    }

    /// Receiver that wakes on every published change
    pub fn subscribe(&self) -> watch::Receiver<FetchState> {
        self.state.clone()
    }

    /// Fetch now, showing the loading indicator
    pub fn refresh_data(&self) {
        self.send(Command::Refresh);
    }

    /// Switch location: cancels the in-flight fetch, restarts the timer and
    /// fetches for the new target
    pub fn set_target(&self, target: StoreTarget) {
        self.send(Command::SetTarget(target));
    }

    /// Change the polling interval. The timer is rebuilt and a fetch with the
    /// loading indicator starts immediately; zero or less disables polling.
    pub fn set_refresh_interval(&self, refresh_interval_ms: i64) {
        self.send(Command::SetRefreshInterval(refresh_interval_ms));
    }

    /// Stop the store and wait for its task to finish
    pub async fn shutdown(self) {
        self.shutdown.cancel();
        if let Err(e) = self.task.await {
            tracing::warn!("Weather store task ended abnormally: {}", e);
        }
    }

    fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            tracing::debug!("Weather store already stopped, command dropped");
        }
    }
}

struct Supervisor<S> {
    source: Arc<S>,
    target: StoreTarget,
    period: Option<Duration>,
    state: FetchState,
    generation: u64,
    inflight: Option<CancellationToken>,
    publisher: watch::Sender<FetchState>,
    completions: mpsc::UnboundedSender<Completion>,
    shutdown: CancellationToken,
}

impl<S: WeatherSource> Supervisor<S> {
    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut completions: mpsc::UnboundedReceiver<Completion>,
    ) {
        let mut ticker = self.new_ticker();
        self.start_fetch(FetchReason::Initial, true);

        loop {
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break,
                Some(done) = completions.recv() => self.complete(done),
                command = commands.recv() => match command {
                    Some(Command::Refresh) => self.start_fetch(FetchReason::Manual, true),
                    Some(Command::SetTarget(target)) => {
                        tracing::info!("Weather store retargeted to {}", target.display_name);
                        self.target = target;
                        ticker = self.new_ticker();
                        self.start_fetch(FetchReason::Retarget, true);
                    }
                    Some(Command::SetRefreshInterval(ms)) => {
                        self.period = polling_period(ms);
                        tracing::info!("Weather store refresh interval set to {:?}", self.period);
                        ticker = self.new_ticker();
                        self.start_fetch(FetchReason::Reconfigure, true);
                    }
                    None => break,
                },
                _ = next_tick(&mut ticker) => self.start_fetch(FetchReason::Poll, false),
            }
        }

        self.cancel_inflight();
        tracing::debug!("Weather store stopped");
    }

    // The first tick is one full period out; there is no immediate tick
    fn new_ticker(&self) -> Option<Interval> {
        self.period.map(|period| {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        })
    }

    fn cancel_inflight(&mut self) {
        if let Some(token) = self.inflight.take() {
            token.cancel();
        }
    }

    fn start_fetch(&mut self, reason: FetchReason, show_loading: bool) {
        self.cancel_inflight();
        self.generation += 1;
        let generation = self.generation;

        tracing::debug!(
            "Fetch {} started ({:?}) for {}",
            generation,
            reason,
            self.target.coordinate
        );

        if show_loading {
            self.state.is_loading = true;
            self.state.error = None;
            self.publish();
        }

        let token = self.shutdown.child_token();
        self.inflight = Some(token.clone());

        let source = Arc::clone(&self.source);
        let coordinate = self.target.coordinate;
        let completions = self.completions.clone();

        tokio::spawn(async move {
            let outcome = tokio::select! {
                biased;
                _ = token.cancelled() => Err(WeatherError::Cancelled),
                result = async {
                    tokio::try_join!(
                        source.current_weather(coordinate, token.clone()),
                        source.forecast(coordinate, token.clone())
                    )
                } => result,
            };
            // The supervisor may already be gone
            let _ = completions.send(Completion { generation, outcome });
        });
    }

    fn complete(&mut self, done: Completion) {
        if done.generation != self.generation {
            tracing::debug!(
                "Discarding result of superseded fetch {} (current {})",
                done.generation,
                self.generation
            );
            return;
        }
        self.inflight = None;

        match done.outcome {
            Ok((mut current, mut forecast)) => {
                current.location_name = self.target.display_name.clone();
                forecast.location_name = self.target.display_name.clone();

                tracing::info!(
                    "Weather updated for {}: {:.1}°C, {}",
                    self.target.display_name,
                    current.temperature,
                    current.description
                );

                self.state.current_weather = Some(current);
                self.state.forecast = Some(forecast);
                self.state.is_loading = false;
                self.state.error = None;
                self.state.last_updated = Some(Utc::now());
            }
            Err(e) if e.is_cancelled() => {
                tracing::debug!("Fetch {} cancelled", done.generation);
                return;
            }
            Err(e) => {
                tracing::warn!("Weather refresh failed: {}", e);
                self.state.is_loading = false;
                self.state.error = Some(e.to_string());
            }
        }
        self.publish();
    }

    fn publish(&self) {
        self.publisher.send_replace(self.state.clone());
    }
}

fn polling_period(refresh_interval_ms: i64) -> Option<Duration> {
    u64::try_from(refresh_interval_ms)
        .ok()
        .filter(|ms| *ms > 0)
        .map(Duration::from_millis)
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}
