//! One-shot device location.
//!
//! A terminal has no geolocation capability of its own, so the "device"
//! position comes from one of the configured [`LocationMode`]s: an IP lookup,
//! fixed coordinates, or nothing at all when the user has opted out.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::{fmt::Debug, sync::Arc};
use tracing::{debug, info, warn};

use crate::{
    config::{LocationConfig, LocationMode},
    error::WeatherError,
    model::Coordinates,
};

pub const DEFAULT_LOOKUP_URL: &str = "http://ip-api.com/json";

#[async_trait]
pub trait LocationProvider: Send + Sync + Debug {
    /// Resolve the current position once. Never retried.
    async fn current_coordinates(&self) -> Result<Coordinates, WeatherError>;
}

/// Coordinates supplied by configuration or on the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocation(Option<Coordinates>);

impl FixedLocation {
    pub fn new(coordinates: Option<Coordinates>) -> Self {
        Self(coordinates)
    }
}

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn current_coordinates(&self) -> Result<Coordinates, WeatherError> {
        self.0.ok_or(WeatherError::LocationUnavailable)
    }
}

/// The user declined to share a location.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeniedLocation;

#[async_trait]
impl LocationProvider for DeniedLocation {
    async fn current_coordinates(&self) -> Result<Coordinates, WeatherError> {
        Err(WeatherError::PermissionDenied)
    }
}

/// Approximate position from an ip-api compatible lookup service.
#[derive(Debug, Clone)]
pub struct IpLocation {
    lookup_url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct IpLookupBody {
    status: String,
    #[serde(default)]
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    #[serde(default)]
    city: Option<String>,
}

impl IpLocation {
    pub fn new(lookup_url: impl Into<String>) -> Self {
        Self { lookup_url: lookup_url.into(), http: Client::new() }
    }
}

impl Default for IpLocation {
    fn default() -> Self {
        Self::new(DEFAULT_LOOKUP_URL)
    }
}

#[async_trait]
impl LocationProvider for IpLocation {
    async fn current_coordinates(&self) -> Result<Coordinates, WeatherError> {
        debug!(url = %self.lookup_url, "requesting IP geolocation");

        let res = self
            .http
            .get(&self.lookup_url)
            .send()
            .await
            .map_err(|e| position_error(format!("lookup request failed: {e}")))?;

        if !res.status().is_success() {
            return Err(position_error(format!("lookup returned status {}", res.status())));
        }

        let body: IpLookupBody = res
            .json()
            .await
            .map_err(|e| position_error(format!("failed to parse lookup response: {e}")))?;

        if body.status != "success" {
            let message = body.message.unwrap_or_else(|| body.status.clone());
            return Err(position_error(format!("lookup failed: {message}")));
        }

        let coordinates = match (body.lat, body.lon) {
            (Some(lat), Some(lon)) => Coordinates::new(lat, lon),
            _ => return Err(position_error("lookup response has no coordinates".into())),
        };

        if !coordinates.is_valid() {
            return Err(position_error(format!("lookup returned invalid coordinates ({coordinates})")));
        }

        info!(
            lat = coordinates.latitude,
            lon = coordinates.longitude,
            city = body.city.as_deref().unwrap_or("unknown"),
            "resolved device location"
        );
        Ok(coordinates)
    }
}

fn position_error(reason: String) -> WeatherError {
    warn!(%reason, "device location unavailable");
    WeatherError::PositionError(reason)
}

/// Build the location provider selected by `config`.
pub fn provider_from_config(config: &LocationConfig) -> Arc<dyn LocationProvider> {
    match config.mode {
        LocationMode::Ip => Arc::new(IpLocation::new(config.lookup_url.clone())),
        LocationMode::Fixed => Arc::new(FixedLocation::new(config.fixed_coordinates())),
        LocationMode::Off => Arc::new(DeniedLocation),
    }
}
