use crate::config::WeatherConfig;
use crate::http::{blocking_client, build_url, get_text, FetchError};
use crate::weather::model::WeatherReport;
use crate::weather::WeatherSource;
use reqwest::blocking::Client;
use serde::Deserialize;

pub const OPEN_WEATHER_ENDPOINT: &str = "https://api.openweathermap.org/data/2.5/weather";

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    main: MainBlock,
    #[serde(default)]
    weather: Vec<Condition>,
}

#[derive(Debug, Deserialize)]
struct MainBlock {
    temp: f64,
    feels_like: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct Condition {
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon: String,
}

/// Decodes a current-weather response body.
///
/// A response without a condition entry keeps empty description and icon.
pub fn parse_weather_response(body: &str) -> Result<WeatherReport, FetchError> {
    let current: CurrentWeather =
        serde_json::from_str(body).map_err(|err| FetchError::Decode(err.to_string()))?;
    let condition = current.weather.into_iter().next();
    let (description, icon) = condition
        .map(|condition| (condition.description, condition.icon))
        .unwrap_or_default();

    Ok(WeatherReport {
        temperature: current.main.temp,
        feels_like: current.main.feels_like,
        humidity: current.main.humidity.round().clamp(0.0, 100.0) as u8,
        description,
        icon,
    })
}

/// Current-weather provider client (OpenWeatherMap).
pub struct OpenWeatherClient {
    client: Client,
    config: WeatherConfig,
}

impl OpenWeatherClient {
    pub fn new(config: WeatherConfig) -> Result<Self, FetchError> {
        Ok(Self {
            client: blocking_client()?,
            config,
        })
    }

    fn query(&self, api_key: &str) -> Vec<(&'static str, String)> {
        vec![
            ("lat", self.config.lat.to_string()),
            ("lon", self.config.lon.to_string()),
            ("appid", api_key.to_string()),
            ("units", "metric".to_string()),
            ("lang", "kr".to_string()),
        ]
    }
}

impl WeatherSource for OpenWeatherClient {
    fn current_weather(&self) -> Result<WeatherReport, FetchError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(FetchError::MissingApiKey("OpenWeatherMap"))?;
        let url = build_url(OPEN_WEATHER_ENDPOINT, &self.query(api_key))?;
        let body = get_text(&self.client, url, "weather")?;
        parse_weather_response(&body)
    }
}
