//! Lookup state, the single source of truth for the screen.

use serde::{Deserialize, Serialize};

use crate::model::{PlaceSuggestion, WeatherResult};

/// Coarse screen phase, derived from [`LookupState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    /// Nothing to show yet.
    Idle,
    /// Suggestions are listed beneath the input.
    Searching,
    /// A place has been picked and its weather is on screen.
    Resolved,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupState {
    /// Free-text input as last typed.
    pub query: String,

    /// Candidates from the last applied search, in provider order.
    pub suggestions: Vec<PlaceSuggestion>,

    /// Result of the last applied weather fetch. Never cleared on failure.
    pub weather: Option<WeatherResult>,

    /// Last place the user picked. Never cleared once set.
    pub selected: Option<PlaceSuggestion>,

    /// Token of the most recently issued place search.
    pub search_token: u64,

    /// Token of the most recently issued weather fetch.
    pub weather_token: u64,
}

impl LookupState {
    pub fn phase(&self) -> Phase {
        if !self.suggestions.is_empty() {
            Phase::Searching
        } else if self.weather.is_some() {
            Phase::Resolved
        } else {
            Phase::Idle
        }
    }
}
