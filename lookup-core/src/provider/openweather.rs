use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use tracing::debug;

use crate::{
    Config, Endpoint, LookupError,
    model::{GEOCODE_LIMIT, PlaceSuggestion, WeatherResult},
};

use super::WeatherProvider;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    lang: String,
    units: String,
    geocoding_url: String,
    weather_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    /// Provider with the default endpoints, `pt_br` descriptions and metric units.
    pub fn new(api_key: String) -> Self {
        let cfg = Config::default();
        Self::with_client(api_key, &cfg, Client::new())
    }

    pub fn from_config(api_key: String, config: &Config) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self::with_client(api_key, config, http))
    }

    fn with_client(api_key: String, config: &Config, http: Client) -> Self {
        Self {
            api_key,
            lang: config.lang.clone(),
            units: config.units.clone(),
            geocoding_url: config.endpoints.geocoding.clone(),
            weather_url: config.endpoints.weather.clone(),
            http,
        }
    }

    fn search_request(&self, query: &str) -> RequestBuilder {
        let limit = GEOCODE_LIMIT.to_string();
        self.http.get(&self.geocoding_url).query(&[
            ("q", query),
            ("limit", limit.as_str()),
            ("appid", self.api_key.as_str()),
        ])
    }

    fn weather_request(&self, lat: f64, lon: f64) -> RequestBuilder {
        let (lat, lon) = (lat.to_string(), lon.to_string());
        self.http.get(&self.weather_url).query(&[
            ("lat", lat.as_str()),
            ("lon", lon.as_str()),
            ("appid", self.api_key.as_str()),
            ("lang", self.lang.as_str()),
            ("units", self.units.as_str()),
        ])
    }

    async fn send(&self, endpoint: Endpoint, request: RequestBuilder) -> Result<String, LookupError> {
        let res = request
            .send()
            .await
            .map_err(|source| LookupError::Transport { endpoint, source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| LookupError::Transport { endpoint, source })?;

        if !status.is_success() {
            return Err(LookupError::Status {
                endpoint,
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        Ok(body)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    #[serde(default)]
    feels_like: Option<f64>,
    #[serde(default)]
    humidity: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    #[serde(default)]
    dt: Option<i64>,
    main: OwMain,
    weather: Vec<OwWeather>,
}

fn decode_places(body: &str) -> Result<Vec<PlaceSuggestion>, LookupError> {
    let mut places: Vec<PlaceSuggestion> =
        serde_json::from_str(body).map_err(|source| LookupError::Decode {
            endpoint: Endpoint::Geocoding,
            source,
        })?;
    places.truncate(GEOCODE_LIMIT);
    Ok(places)
}

fn decode_weather(body: &str) -> Result<WeatherResult, LookupError> {
    let parsed: OwCurrentResponse =
        serde_json::from_str(body).map_err(|source| LookupError::Decode {
            endpoint: Endpoint::Weather,
            source,
        })?;

    let condition = parsed
        .weather
        .into_iter()
        .next()
        .ok_or(LookupError::MissingField {
            endpoint: Endpoint::Weather,
            field: "weather[0]",
        })?;

    Ok(WeatherResult {
        name: parsed.name,
        temperature_c: parsed.main.temp,
        description: condition.description,
        icon: condition.icon,
        feels_like_c: parsed.main.feels_like,
        humidity_pct: parsed.main.humidity,
        observed_at: parsed.dt.and_then(unix_to_utc),
    })
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn search_places(&self, query: &str) -> Result<Vec<PlaceSuggestion>, LookupError> {
        debug!(query, "searching places");
        let body = self.send(Endpoint::Geocoding, self.search_request(query)).await?;
        decode_places(&body)
    }

    async fn current_weather(&self, lat: f64, lon: f64) -> Result<WeatherResult, LookupError> {
        debug!(lat, lon, "fetching current weather");
        let body = self.send(Endpoint::Weather, self.weather_request(lat, lon)).await?;
        decode_weather(&body)
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
