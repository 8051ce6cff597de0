//! Events that drive the lookup state: user intents and async results.

use serde::{Deserialize, Serialize};

use crate::{
    ErrorKind,
    model::{PlaceSuggestion, WeatherResult},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Input text changed (one per keystroke).
    QueryChanged(String),

    /// Result: geocoding returned these places.
    SearchDidLoad {
        token: u64,
        places: Vec<PlaceSuggestion>,
    },

    /// Result: geocoding failed.
    SearchDidError {
        token: u64,
        kind: ErrorKind,
        message: String,
    },

    /// User picked the suggestion at this index.
    SuggestionSelected(usize),

    /// Result: current weather loaded.
    WeatherDidLoad { token: u64, weather: WeatherResult },

    /// Result: current weather failed.
    WeatherDidError {
        token: u64,
        kind: ErrorKind,
        message: String,
    },
}
