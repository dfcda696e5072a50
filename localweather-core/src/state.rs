//! Centrally-owned view state and the transitions that update it.
//!
//! Every asynchronous result is tagged with the generation of the request
//! cycle that issued it. [`ViewState::reduce`] drops results from any cycle
//! other than the latest, so an older, slower request can never overwrite
//! what a newer cycle produced.

use serde::Serialize;
use tracing::{debug, info};

use crate::{
    error::WeatherError,
    model::{Coordinates, CurrentWeather, HistoryEntry},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    LocatingDevice,
    GeocodingCity,
    FetchingWeather,
    Done,
}

/// Result of one asynchronous operation.
#[derive(Debug)]
pub enum Outcome {
    Located(Result<Coordinates, WeatherError>),
    Geocoded(Result<Coordinates, WeatherError>),
    CurrentLoaded(Result<CurrentWeather, WeatherError>),
    HistoryLoaded(Result<Vec<HistoryEntry>, WeatherError>),
}

impl Outcome {
    fn name(&self) -> &'static str {
        match self {
            Outcome::Located(_) => "located",
            Outcome::Geocoded(_) => "geocoded",
            Outcome::CurrentLoaded(_) => "current_loaded",
            Outcome::HistoryLoaded(_) => "history_loaded",
        }
    }
}

/// Follow-up work the owner of the state must start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    FetchWeather(Coordinates),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Pending {
    current: bool,
    history: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ViewState {
    phase: Phase,
    generation: u64,
    coordinates: Option<Coordinates>,
    current: Option<CurrentWeather>,
    history: Vec<HistoryEntry>,
    error: Option<String>,
    #[serde(skip)]
    pending: Pending,
}

impl ViewState {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Last-known coordinates, from the device or the most recent geocode.
    pub fn coordinates(&self) -> Option<Coordinates> {
        self.coordinates
    }

    pub fn current(&self) -> Option<&CurrentWeather> {
        self.current.as_ref()
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// No request of the latest cycle is still outstanding.
    pub fn is_settled(&self) -> bool {
        matches!(self.phase, Phase::Idle | Phase::Done)
    }

    /// Start a new request cycle in `phase` and return its generation.
    ///
    /// Results still in flight from earlier cycles become stale.
    pub fn begin_cycle(&mut self, phase: Phase) -> u64 {
        self.generation += 1;
        self.pending = Pending::default();
        self.phase = phase;
        info!(generation = self.generation, ?phase, "request cycle started");

        if phase == Phase::FetchingWeather {
            self.enter_fetching();
        }

        self.generation
    }

    /// Start a cycle that fails immediately because no coordinates are known.
    pub fn fail_missing_coordinates(&mut self) -> u64 {
        let generation = self.begin_cycle(Phase::Done);
        self.set_error(&WeatherError::MissingCoordinates);
        generation
    }

    /// Apply `outcome` if it belongs to the latest cycle.
    pub fn reduce(&mut self, generation: u64, outcome: Outcome) -> Option<Effect> {
        if generation != self.generation {
            debug!(
                stale = generation,
                latest = self.generation,
                outcome = outcome.name(),
                "discarding result from superseded cycle"
            );
            return None;
        }

        match outcome {
            Outcome::Located(Ok(at)) | Outcome::Geocoded(Ok(at)) => {
                self.coordinates = Some(at);
                self.enter_fetching();
                return Some(Effect::FetchWeather(at));
            }
            Outcome::Located(Err(e)) => {
                self.set_error(&e);
                self.phase = Phase::Done;
            }
            Outcome::Geocoded(Err(e)) => {
                self.current = None;
                self.history.clear();
                self.set_error(&e);
                self.phase = Phase::Done;
            }
            Outcome::CurrentLoaded(result) => {
                match result {
                    Ok(weather) => {
                        self.current = Some(weather);
                        self.error = None;
                    }
                    Err(e) => {
                        self.current = None;
                        self.set_error(&e);
                    }
                }
                self.pending.current = false;
                self.finish_fetch_if_complete();
            }
            Outcome::HistoryLoaded(result) => {
                match result {
                    Ok(entries) => self.history = entries,
                    Err(e) => {
                        self.history.clear();
                        self.set_error(&e);
                    }
                }
                self.pending.history = false;
                self.finish_fetch_if_complete();
            }
        }

        None
    }

    fn enter_fetching(&mut self) {
        self.phase = Phase::FetchingWeather;
        self.pending = Pending { current: true, history: true };
    }

    fn finish_fetch_if_complete(&mut self) {
        if self.phase == Phase::FetchingWeather && self.pending == Pending::default() {
            self.phase = Phase::Done;
            info!(generation = self.generation, "request cycle done");
        }
    }

    // Only the most recent failure is kept.
    fn set_error(&mut self, error: &WeatherError) {
        self.error = Some(error.user_message().to_string());
    }
}
