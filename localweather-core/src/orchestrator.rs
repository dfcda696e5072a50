use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::{
    client::WeatherApi,
    error::{Endpoint, WeatherError},
    location::LocationProvider,
    model::Coordinates,
    state::{Effect, Outcome, Phase, ViewState},
};

/// A finished operation, tagged with the cycle that started it.
#[derive(Debug)]
struct Event {
    generation: u64,
    outcome: Outcome,
}

/// Sequences device location, geocoding and weather fetches.
///
/// Each network operation runs as its own task and reports back through a
/// channel; only [`RequestOrchestrator::step`] writes to the [`ViewState`].
/// Starting a cycle spawns tasks, so `mount` and `get_weather` must be
/// called from within a Tokio runtime.
#[derive(Debug)]
pub struct RequestOrchestrator {
    location: Arc<dyn LocationProvider>,
    weather: Arc<dyn WeatherApi>,
    state: ViewState,
    events_tx: mpsc::UnboundedSender<Event>,
    events_rx: mpsc::UnboundedReceiver<Event>,
}

impl RequestOrchestrator {
    pub fn new(location: Arc<dyn LocationProvider>, weather: Arc<dyn WeatherApi>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self { location, weather, state: ViewState::default(), events_tx, events_rx }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Automatic start-up cycle: locate the device, then fetch weather there.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn mount(&mut self) {
        let generation = self.state.begin_cycle(Phase::LocatingDevice);
        let location = Arc::clone(&self.location);

        self.spawn(
            generation,
            async move { Outcome::Located(location.current_coordinates().await) },
            |reason| Outcome::Located(Err(WeatherError::PositionError(reason))),
        );
    }

    /// Manual cycle ("Get Weather").
    ///
    /// A non-blank `city` is geocoded first and its coordinates replace the
    /// last-known ones; a failed lookup ends the cycle without falling back.
    /// A blank `city` reuses the last-known coordinates, or fails with
    /// `MissingCoordinates` without touching the network.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn get_weather(&mut self, city: &str) {
        let city = city.trim();

        if !city.is_empty() {
            let generation = self.state.begin_cycle(Phase::GeocodingCity);
            let weather = Arc::clone(&self.weather);
            let city = city.to_string();
            info!(%city, generation, "geocoding city");

            self.spawn(
                generation,
                async move { Outcome::Geocoded(weather.geocode_city(&city).await) },
                |reason| Outcome::Geocoded(Err(WeatherError::fetch(Endpoint::Geocode, reason))),
            );
            return;
        }

        match self.state.coordinates() {
            Some(at) => {
                let generation = self.state.begin_cycle(Phase::FetchingWeather);
                self.fetch_weather(generation, at);
            }
            None => {
                self.state.fail_missing_coordinates();
            }
        }
    }

    /// Wait for the next finished operation and apply it.
    pub async fn step(&mut self) {
        // The orchestrator holds a sender, so the channel never closes while it lives.
        let Some(Event { generation, outcome }) = self.events_rx.recv().await else {
            return;
        };

        if let Some(Effect::FetchWeather(at)) = self.state.reduce(generation, outcome) {
            self.fetch_weather(generation, at);
        }
    }

    /// Drive events until the latest cycle has finished.
    pub async fn settle(&mut self) -> &ViewState {
        while !self.state.is_settled() {
            self.step().await;
        }

        &self.state
    }

    // The two fetches are independent: neither waits for nor cancels the other.
    fn fetch_weather(&self, generation: u64, at: Coordinates) {
        debug!(generation, lat = at.latitude, lon = at.longitude, "fetching weather");

        let weather = Arc::clone(&self.weather);
        self.spawn(
            generation,
            async move { Outcome::CurrentLoaded(weather.current_weather(at).await) },
            |reason| {
                Outcome::CurrentLoaded(Err(WeatherError::fetch(Endpoint::CurrentWeather, reason)))
            },
        );

        let weather = Arc::clone(&self.weather);
        self.spawn(
            generation,
            async move { Outcome::HistoryLoaded(weather.weather_history(at).await) },
            |reason| {
                Outcome::HistoryLoaded(Err(WeatherError::fetch(Endpoint::WeatherHistory, reason)))
            },
        );
    }

    /// Run `task` and post its outcome. If the task panics or is cancelled,
    /// `on_failure` supplies the outcome instead, so the cycle still completes.
    fn spawn<F, E>(&self, generation: u64, task: F, on_failure: E)
    where
        F: std::future::Future<Output = Outcome> + Send + 'static,
        E: FnOnce(String) -> Outcome + Send + 'static,
    {
        let events_tx = self.events_tx.clone();
        let handle = tokio::spawn(task);

        tokio::spawn(async move {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(generation, error = %e, "request task failed");
                    on_failure(format!("task failed: {e}"))
                }
            };
            // The receiver only goes away with the orchestrator itself.
            let _ = events_tx.send(Event { generation, outcome });
        });
    }
}
