use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Whether both components are finite and within WGS84 bounds.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub temperature: f64,
    pub description: String,
    pub humidity: f64,
    pub wind_speed: f64,
    /// IANA zone name as reported by the backend, e.g. "Europe/London".
    pub timezone_label: String,
}

impl CurrentWeather {
    /// Place name derived from the timezone label: the segment after the first `/`.
    pub fn place_name(&self) -> &str {
        self.timezone_label
            .split('/')
            .nth(1)
            .unwrap_or(&self.timezone_label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub date: String,
    pub temperature: f64,
    pub description: String,
    pub humidity: f64,
    pub wind_speed: f64,
}

// Backend wire format.

#[derive(Debug, Deserialize)]
pub(crate) struct CurrentWeatherBody {
    current: CurrentConditions,
    timezone: String,
}

#[derive(Debug, Deserialize)]
struct CurrentConditions {
    temp: f64,
    #[serde(default)]
    weather: Vec<ConditionBody>,
    humidity: f64,
    wind_speed: f64,
}

#[derive(Debug, Deserialize)]
struct ConditionBody {
    description: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HistoryEntryBody {
    date: String,
    temp: f64,
    weather: String,
    humidity: f64,
    wind_speed: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeocodeBody {
    lat: f64,
    lon: f64,
}

impl From<CurrentWeatherBody> for CurrentWeather {
    fn from(body: CurrentWeatherBody) -> Self {
        let description = body
            .current
            .weather
            .into_iter()
            .next()
            .map(|w| w.description)
            .unwrap_or_default();

        Self {
            temperature: body.current.temp,
            description,
            humidity: body.current.humidity,
            wind_speed: body.current.wind_speed,
            timezone_label: body.timezone,
        }
    }
}

impl From<HistoryEntryBody> for HistoryEntry {
    fn from(body: HistoryEntryBody) -> Self {
        Self {
            date: body.date,
            temperature: body.temp,
            description: body.weather,
            humidity: body.humidity,
            wind_speed: body.wind_speed,
        }
    }
}

impl From<GeocodeBody> for Coordinates {
    fn from(body: GeocodeBody) -> Self {
        Coordinates::new(body.lat, body.lon)
    }
}
