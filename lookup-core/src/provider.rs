use crate::{
    Config, LookupError,
    model::{PlaceSuggestion, WeatherResult},
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

pub use openweather::OpenWeatherProvider;

/// The two remote calls the lookup screen depends on.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Direct geocoding: partial place name to at most `GEOCODE_LIMIT` candidates.
    async fn search_places(&self, query: &str) -> Result<Vec<PlaceSuggestion>, LookupError>;

    /// Current conditions at a coordinate.
    async fn current_weather(&self, lat: f64, lon: f64) -> Result<WeatherResult, LookupError>;
}

/// Construct the OpenWeather provider from config.
///
/// A missing API key is not an error here: every request will then be rejected
/// by the provider and handled like any other failed call.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let api_key = config.resolved_api_key().unwrap_or_default();
    let provider = OpenWeatherProvider::from_config(api_key, config)?;
    Ok(Arc::new(provider))
}
