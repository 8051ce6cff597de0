//! Side effects declared by the reducer and how they are carried out.

use tracing::trace;

use crate::{action::Action, provider::WeatherProvider};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Look up places matching `query`.
    SearchPlaces { token: u64, query: String },
    /// Drop focus from the text input (hide the keyboard).
    DismissInput,
    /// Fetch current weather for the given coordinates.
    FetchWeather { token: u64, lat: f64, lon: f64 },
}

/// Run one effect against the provider and turn its result into an action.
///
/// Returns `None` for effects that only concern the presentation layer.
pub async fn perform(provider: &dyn WeatherProvider, effect: Effect) -> Option<Action> {
    match effect {
        Effect::SearchPlaces { token, query } => {
            let action = match provider.search_places(&query).await {
                Ok(places) => Action::SearchDidLoad { token, places },
                Err(err) => Action::SearchDidError {
                    token,
                    kind: err.kind(),
                    message: err.to_string(),
                },
            };
            Some(action)
        }
        Effect::FetchWeather { token, lat, lon } => {
            let action = match provider.current_weather(lat, lon).await {
                Ok(weather) => Action::WeatherDidLoad { token, weather },
                Err(err) => Action::WeatherDidError {
                    token,
                    kind: err.kind(),
                    message: err.to_string(),
                },
            };
            Some(action)
        }
        Effect::DismissInput => {
            trace!("input focus dismissed");
            None
        }
    }
}
