//! Integration tests for HttpWeatherClient and IpLocation using wiremock.

use localweather_core::{
    Coordinates, Endpoint, HttpWeatherClient, WeatherApi, WeatherError,
    location::{IpLocation, LocationProvider},
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn london() -> Coordinates {
    Coordinates::new(51.5, -0.12)
}

#[tokio::test]
async fn current_weather_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("lat", "51.5"))
        .and(query_param("lon", "-0.12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "current": {
                "temp": 17.3,
                "weather": [{"description": "overcast clouds"}],
                "humidity": 72,
                "wind_speed": 5.1
            },
            "timezone": "Europe/London"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpWeatherClient::new(mock_server.uri());
    let weather = client.current_weather(london()).await.unwrap();

    assert_eq!(weather.temperature, 17.3);
    assert_eq!(weather.description, "overcast clouds");
    assert_eq!(weather.humidity, 72.0);
    assert_eq!(weather.wind_speed, 5.1);
    assert_eq!(weather.place_name(), "London");
}

#[tokio::test]
async fn current_weather_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&mock_server)
        .await;

    let client = HttpWeatherClient::new(mock_server.uri());
    let err = client.current_weather(london()).await.unwrap_err();

    match &err {
        WeatherError::Fetch { endpoint, reason } => {
            assert_eq!(*endpoint, Endpoint::CurrentWeather);
            assert!(reason.contains("500"));
            assert!(reason.contains("upstream exploded"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.user_message(), "Error fetching weather data");
}

#[tokio::test]
async fn current_weather_malformed_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let client = HttpWeatherClient::new(mock_server.uri());
    let err = client.current_weather(london()).await.unwrap_err();

    assert!(matches!(err, WeatherError::Fetch { endpoint: Endpoint::CurrentWeather, .. }));
}

#[tokio::test]
async fn weather_history_preserves_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather/history"))
        .and(query_param("lat", "51.5"))
        .and(query_param("lon", "-0.12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"date": "2024-06-05", "temp": 19.0, "weather": "clear sky", "humidity": 50, "wind_speed": 2.0},
            {"date": "2024-06-04", "temp": 16.5, "weather": "light rain", "humidity": 88, "wind_speed": 4.4}
        ])))
        .mount(&mock_server)
        .await;

    let client = HttpWeatherClient::new(mock_server.uri());
    let history = client.weather_history(london()).await.unwrap();

    assert_eq!(history.len(), 2);
    assert_eq!(history[0].date, "2024-06-05");
    assert_eq!(history[1].description, "light rain");
    assert_eq!(history[1].humidity, 88.0);
}

#[tokio::test]
async fn weather_history_empty() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather/history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let client = HttpWeatherClient::new(mock_server.uri());
    let history = client.weather_history(london()).await.unwrap();

    assert!(history.is_empty());
}

#[tokio::test]
async fn weather_history_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather/history"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = HttpWeatherClient::new(mock_server.uri());
    let err = client.weather_history(london()).await.unwrap_err();

    assert_eq!(err.user_message(), "Error fetching historical weather data");
}

#[tokio::test]
async fn geocode_city_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/city"))
        .and(query_param("city", "São Paulo"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"lat": -23.55, "lon": -46.63})),
        )
        .mount(&mock_server)
        .await;

    let client = HttpWeatherClient::new(format!("{}/", mock_server.uri()));
    let at = client.geocode_city("São Paulo").await.unwrap();

    assert_eq!(at, Coordinates::new(-23.55, -46.63));
}

#[tokio::test]
async fn geocode_city_unknown() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/city"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(serde_json::json!({"error": "City not found"})),
        )
        .mount(&mock_server)
        .await;

    let client = HttpWeatherClient::new(mock_server.uri());
    let err = client.geocode_city("Atlantis").await.unwrap_err();

    assert!(matches!(err, WeatherError::Fetch { endpoint: Endpoint::Geocode, .. }));
    assert_eq!(err.user_message(), "Error fetching city coordinates");
}

#[tokio::test]
async fn geocode_city_out_of_range() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/city"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"lat": 200.0, "lon": 0.0})))
        .mount(&mock_server)
        .await;

    let client = HttpWeatherClient::new(mock_server.uri());
    let err = client.geocode_city("Nowhere").await.unwrap_err();

    assert!(err.to_string().contains("invalid coordinates"));
}

#[tokio::test]
async fn unreachable_backend_is_fetch_error() {
    // Bind then drop a server so the port is closed.
    let uri = {
        let mock_server = MockServer::start().await;
        mock_server.uri()
    };

    let client = HttpWeatherClient::new(uri);
    let err = client.geocode_city("London").await.unwrap_err();

    assert!(matches!(err, WeatherError::Fetch { endpoint: Endpoint::Geocode, .. }));
}

#[tokio::test]
async fn ip_location_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "city": "Lisbon",
            "lat": 38.72,
            "lon": -9.14
        })))
        .mount(&mock_server)
        .await;

    let provider = IpLocation::new(format!("{}/json", mock_server.uri()));
    let at = provider.current_coordinates().await.unwrap();

    assert_eq!(at, Coordinates::new(38.72, -9.14));
}

#[tokio::test]
async fn ip_location_failure_is_position_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "fail",
            "message": "reserved range"
        })))
        .mount(&mock_server)
        .await;

    let provider = IpLocation::new(format!("{}/json", mock_server.uri()));
    let err = provider.current_coordinates().await.unwrap_err();

    match err {
        WeatherError::PositionError(reason) => assert!(reason.contains("reserved range")),
        other => panic!("unexpected error: {other:?}"),
    }
}
