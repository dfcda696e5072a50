use thiserror::Error;

/// Backend operation a fetch failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    CurrentWeather,
    WeatherHistory,
    Geocode,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::CurrentWeather => "current weather",
            Endpoint::WeatherHistory => "weather history",
            Endpoint::Geocode => "geocode",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Geolocation is not available on this host")]
    LocationUnavailable,

    #[error("Location access was denied")]
    PermissionDenied,

    #[error("Could not determine device position: {0}")]
    PositionError(String),

    #[error("{endpoint} request failed: {reason}")]
    Fetch { endpoint: Endpoint, reason: String },

    #[error("No coordinates available for a weather request")]
    MissingCoordinates,
}

impl WeatherError {
    pub fn fetch(endpoint: Endpoint, reason: impl Into<String>) -> Self {
        Self::Fetch { endpoint, reason: reason.into() }
    }

    /// Text shown to the user in place of the error.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::LocationUnavailable => "Geolocation is not supported on this host.",
            Self::PermissionDenied | Self::PositionError(_) => {
                "Error getting location. Make sure to allow location access."
            }
            Self::Fetch { endpoint: Endpoint::CurrentWeather, .. } => "Error fetching weather data",
            Self::Fetch { endpoint: Endpoint::WeatherHistory, .. } => {
                "Error fetching historical weather data"
            }
            Self::Fetch { endpoint: Endpoint::Geocode, .. } => "Error fetching city coordinates",
            Self::MissingCoordinates => "Latitude and Longitude are not available.",
        }
    }
}
