//! Core library for the `localweather` CLI.
//!
//! This crate defines:
//! - Device location providers
//! - The HTTP client for the weather backend
//! - Request orchestration over a reducer-style view state
//! - Text presentation of that state
//! - Configuration handling
//!
//! It is used by `localweather-cli`, but can also be reused by other front ends.

pub mod client;
pub mod config;
pub mod error;
pub mod location;
pub mod model;
pub mod orchestrator;
pub mod render;
pub mod state;

pub use client::{HttpWeatherClient, WeatherApi};
pub use config::{Config, LocationConfig, LocationMode};
pub use error::{Endpoint, WeatherError};
pub use location::LocationProvider;
pub use model::{Coordinates, CurrentWeather, HistoryEntry};
pub use orchestrator::RequestOrchestrator;
pub use render::render;
pub use state::{Phase, ViewState};
