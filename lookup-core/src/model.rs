use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of suggestions requested from the geocoding endpoint.
pub const GEOCODE_LIMIT: usize = 5;

/// Shortest query (in characters) that triggers a place search.
pub const MIN_QUERY_CHARS: usize = 2;

pub const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

/// One candidate place returned by the geocoding endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceSuggestion {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_names: Option<HashMap<String, String>>,
}

impl PlaceSuggestion {
    pub fn new(name: &str, state: Option<&str>, country: &str, lat: f64, lon: f64) -> Self {
        Self {
            name: name.to_string(),
            state: state.map(str::to_string),
            country: country.to_string(),
            lat,
            lon,
            local_names: None,
        }
    }

    /// `"São Paulo - SP - BR"`, or `"Lisbon - PT"` when the provider gives no state.
    pub fn label(&self) -> String {
        match &self.state {
            Some(state) => format!("{} - {} - {}", self.name, state, self.country),
            None => format!("{} - {}", self.name, self.country),
        }
    }
}

/// Current conditions for a selected place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResult {
    pub name: String,
    pub temperature_c: f64,
    pub description: String,
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feels_like_c: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity_pct: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_at: Option<DateTime<Utc>>,
}

impl WeatherResult {
    pub fn icon_url(&self) -> String {
        format!("{ICON_BASE_URL}/{}@2x.png", self.icon)
    }
}

/// True when `query` is long enough to be sent to the geocoding endpoint.
pub fn query_qualifies(query: &str) -> bool {
    query.chars().count() >= MIN_QUERY_CHARS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_length_counts_characters_not_bytes() {
        assert!(query_qualifies("Sã"));
        assert!(!query_qualifies("ã"));
        assert!(!query_qualifies("a"));
        assert!(!query_qualifies(""));
    }

    #[test]
    fn label_with_and_without_state() {
        let sp = PlaceSuggestion::new("São Paulo", Some("SP"), "BR", -23.55, -46.63);
        assert_eq!(sp.label(), "São Paulo - SP - BR");

        let lisbon = PlaceSuggestion::new("Lisbon", None, "PT", 38.72, -9.14);
        assert_eq!(lisbon.label(), "Lisbon - PT");
    }

    #[test]
    fn icon_url_uses_2x_convention() {
        let weather = WeatherResult {
            name: "São Paulo".into(),
            temperature_c: 24.3,
            description: "céu limpo".into(),
            icon: "01d".into(),
            feels_like_c: None,
            humidity_pct: None,
            observed_at: None,
        };
        assert_eq!(weather.icon_url(), "https://openweathermap.org/img/wn/01d@2x.png");
    }
}
