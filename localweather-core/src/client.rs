use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use tracing::{debug, warn};

use crate::{
    error::{Endpoint, WeatherError},
    model::{
        Coordinates, CurrentWeather, CurrentWeatherBody, GeocodeBody, HistoryEntry,
        HistoryEntryBody,
    },
};

/// Backend host used when no override is configured.
pub const DEFAULT_BASE_URL: &str = "http://98.82.178.89";

/// The three read-only operations of the weather backend.
#[async_trait]
pub trait WeatherApi: Send + Sync + Debug {
    async fn current_weather(&self, at: Coordinates) -> Result<CurrentWeather, WeatherError>;

    /// Past days for `at`, in backend order. An empty list is a valid answer.
    async fn weather_history(&self, at: Coordinates) -> Result<Vec<HistoryEntry>, WeatherError>;

    async fn geocode_city(&self, city: &str) -> Result<Coordinates, WeatherError>;
}

#[derive(Debug, Clone)]
pub struct HttpWeatherClient {
    base_url: String,
    http: Client,
}

impl HttpWeatherClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, http: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T, Q>(&self, endpoint: Endpoint, path: &str, query: &Q) -> Result<T, WeatherError>
    where
        T: DeserializeOwned,
        Q: serde::Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(%endpoint, %url, "sending backend request");

        let res = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| fail(endpoint, format!("failed to send request: {e}")))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| fail(endpoint, format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            return Err(fail(
                endpoint,
                format!("status {}: {}", status, truncate_body(&body)),
            ));
        }

        serde_json::from_str(&body)
            .map_err(|e| fail(endpoint, format!("failed to parse JSON: {e}")))
    }
}

impl Default for HttpWeatherClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait]
impl WeatherApi for HttpWeatherClient {
    async fn current_weather(&self, at: Coordinates) -> Result<CurrentWeather, WeatherError> {
        let body: CurrentWeatherBody = self
            .get_json(
                Endpoint::CurrentWeather,
                "/weather",
                &[("lat", at.latitude), ("lon", at.longitude)],
            )
            .await?;

        Ok(body.into())
    }

    async fn weather_history(&self, at: Coordinates) -> Result<Vec<HistoryEntry>, WeatherError> {
        let body: Vec<HistoryEntryBody> = self
            .get_json(
                Endpoint::WeatherHistory,
                "/weather/history",
                &[("lat", at.latitude), ("lon", at.longitude)],
            )
            .await?;

        Ok(body.into_iter().map(HistoryEntry::from).collect())
    }

    async fn geocode_city(&self, city: &str) -> Result<Coordinates, WeatherError> {
        let body: GeocodeBody = self
            .get_json(Endpoint::Geocode, "/geo/city", &[("city", city)])
            .await?;

        let coordinates = Coordinates::from(body);
        if !coordinates.is_valid() {
            return Err(fail(
                Endpoint::Geocode,
                format!("'{city}' resolved to invalid coordinates ({coordinates})"),
            ));
        }

        Ok(coordinates)
    }
}

fn fail(endpoint: Endpoint, reason: String) -> WeatherError {
    warn!(%endpoint, %reason, "backend request failed");
    WeatherError::fetch(endpoint, reason)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let client = HttpWeatherClient::new("http://localhost:8080/");
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn default_client_targets_fixed_host() {
        assert_eq!(HttpWeatherClient::default().base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(300);
        let truncated = truncate_body(&long);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 203);

        assert_eq!(truncate_body("short"), "short");
    }
}
