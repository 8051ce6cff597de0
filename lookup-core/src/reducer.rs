//! Reducer: `(state, action) -> Dispatch`, no I/O.

use tracing::{trace, warn};

use crate::{
    ResponseOrdering,
    action::Action,
    effect::Effect,
    model::{GEOCODE_LIMIT, query_qualifies},
    state::LookupState,
};

/// What a single dispatch did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dispatch {
    /// State was mutated.
    pub changed: bool,
    /// The action was a result that arrived for a superseded request and was dropped.
    pub stale: bool,
    /// Effects to run, in order.
    pub effects: Vec<Effect>,
}

impl Dispatch {
    pub fn unchanged() -> Self {
        Self::default()
    }

    pub fn changed() -> Self {
        Self {
            changed: true,
            ..Self::default()
        }
    }

    pub fn changed_with(effects: Vec<Effect>) -> Self {
        Self {
            changed: true,
            stale: false,
            effects,
        }
    }

    pub fn stale() -> Self {
        Self {
            stale: true,
            ..Self::default()
        }
    }
}

fn accepts(ordering: ResponseOrdering, latest: u64, token: u64) -> bool {
    match ordering {
        ResponseOrdering::LatestIssued => token == latest,
        ResponseOrdering::LastCompleted => true,
    }
}

pub fn reducer(state: &mut LookupState, action: Action, ordering: ResponseOrdering) -> Dispatch {
    match action {
        Action::QueryChanged(query) => {
            state.query = query;

            if !query_qualifies(&state.query) {
                state.suggestions.clear();
                if ordering == ResponseOrdering::LatestIssued {
                    // In-flight searches were for a query that no longer qualifies.
                    state.search_token += 1;
                }
                return Dispatch::changed();
            }

            state.search_token += 1;
            Dispatch::changed_with(vec![Effect::SearchPlaces {
                token: state.search_token,
                query: state.query.clone(),
            }])
        }

        Action::SearchDidLoad { token, mut places } => {
            if !accepts(ordering, state.search_token, token) || !query_qualifies(&state.query) {
                trace!(token, latest = state.search_token, "dropping stale place results");
                return Dispatch::stale();
            }

            places.truncate(GEOCODE_LIMIT);
            state.suggestions = places;
            Dispatch::changed()
        }

        Action::SearchDidError {
            token,
            kind,
            message,
        } => {
            warn!(%kind, token, "Place search failed: {message}");
            if !accepts(ordering, state.search_token, token) {
                return Dispatch::stale();
            }

            state.suggestions.clear();
            Dispatch::changed()
        }

        Action::SuggestionSelected(index) => {
            let Some(place) = state.suggestions.get(index).cloned() else {
                return Dispatch::unchanged();
            };

            let (lat, lon) = (place.lat, place.lon);
            state.selected = Some(place);
            state.suggestions.clear();
            state.weather_token += 1;
            if ordering == ResponseOrdering::LatestIssued {
                state.search_token += 1;
            }

            Dispatch::changed_with(vec![
                Effect::DismissInput,
                Effect::FetchWeather {
                    token: state.weather_token,
                    lat,
                    lon,
                },
            ])
        }

        Action::WeatherDidLoad { token, weather } => {
            if !accepts(ordering, state.weather_token, token) {
                trace!(token, latest = state.weather_token, "dropping stale weather");
                return Dispatch::stale();
            }

            state.weather = Some(weather);
            Dispatch::changed()
        }

        Action::WeatherDidError {
            token,
            kind,
            message,
        } => {
            warn!(%kind, token, "Weather fetch failed: {message}");
            if !accepts(ordering, state.weather_token, token) {
                return Dispatch::stale();
            }
            Dispatch::unchanged()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ErrorKind,
        model::{PlaceSuggestion, WeatherResult},
        state::Phase,
    };

    const LATEST: ResponseOrdering = ResponseOrdering::LatestIssued;
    const LEGACY: ResponseOrdering = ResponseOrdering::LastCompleted;

    fn sao_paulo() -> PlaceSuggestion {
        PlaceSuggestion::new("São Paulo", Some("SP"), "BR", -23.55, -46.63)
    }

    fn santos() -> PlaceSuggestion {
        PlaceSuggestion::new("Santos", Some("SP"), "BR", -23.96, -46.33)
    }

    fn weather(name: &str, temp: f64) -> WeatherResult {
        WeatherResult {
            name: name.into(),
            temperature_c: temp,
            description: "céu limpo".into(),
            icon: "01d".into(),
            feels_like_c: None,
            humidity_pct: None,
            observed_at: None,
        }
    }

    #[test]
    fn short_query_clears_without_effect() {
        let mut state = LookupState {
            suggestions: vec![sao_paulo()],
            ..Default::default()
        };

        let result = reducer(&mut state, Action::QueryChanged("S".into()), LATEST);

        assert!(result.changed);
        assert!(result.effects.is_empty());
        assert!(state.suggestions.is_empty());
        assert_eq!(state.query, "S");
    }

    #[test]
    fn qualifying_query_issues_search_with_fresh_token() {
        let mut state = LookupState::default();

        let result = reducer(&mut state, Action::QueryChanged("Sã".into()), LATEST);

        assert_eq!(
            result.effects,
            vec![Effect::SearchPlaces {
                token: 1,
                query: "Sã".into()
            }]
        );
        assert_eq!(state.search_token, 1);
    }

    #[test]
    fn search_results_replace_suggestions() {
        let mut state = LookupState::default();
        reducer(&mut state, Action::QueryChanged("Sa".into()), LATEST);

        let result = reducer(
            &mut state,
            Action::SearchDidLoad {
                token: 1,
                places: vec![sao_paulo(), santos()],
            },
            LATEST,
        );

        assert!(result.changed);
        assert_eq!(state.suggestions, vec![sao_paulo(), santos()]);
        assert_eq!(state.phase(), Phase::Searching);
    }

    #[test]
    fn search_error_clears_suggestions() {
        let mut state = LookupState::default();
        reducer(&mut state, Action::QueryChanged("Sa".into()), LATEST);
        reducer(
            &mut state,
            Action::SearchDidLoad {
                token: 1,
                places: vec![sao_paulo()],
            },
            LATEST,
        );
        reducer(&mut state, Action::QueryChanged("San".into()), LATEST);

        let result = reducer(
            &mut state,
            Action::SearchDidError {
                token: 2,
                kind: ErrorKind::Network,
                message: "connection refused".into(),
            },
            LATEST,
        );

        assert!(result.changed);
        assert!(state.suggestions.is_empty());
    }

    #[test]
    fn out_of_order_search_is_dropped_when_latest_issued_wins() {
        let mut state = LookupState::default();
        reducer(&mut state, Action::QueryChanged("Sa".into()), LATEST);
        reducer(&mut state, Action::QueryChanged("San".into()), LATEST);

        reducer(
            &mut state,
            Action::SearchDidLoad {
                token: 2,
                places: vec![santos()],
            },
            LATEST,
        );
        let late = reducer(
            &mut state,
            Action::SearchDidLoad {
                token: 1,
                places: vec![sao_paulo()],
            },
            LATEST,
        );

        assert!(late.stale);
        assert_eq!(state.suggestions, vec![santos()]);
    }

    #[test]
    fn out_of_order_search_overwrites_when_last_completed_wins() {
        let mut state = LookupState::default();
        reducer(&mut state, Action::QueryChanged("Sa".into()), LEGACY);
        reducer(&mut state, Action::QueryChanged("San".into()), LEGACY);

        reducer(
            &mut state,
            Action::SearchDidLoad {
                token: 2,
                places: vec![santos()],
            },
            LEGACY,
        );
        let late = reducer(
            &mut state,
            Action::SearchDidLoad {
                token: 1,
                places: vec![sao_paulo()],
            },
            LEGACY,
        );

        assert!(!late.stale);
        assert_eq!(state.suggestions, vec![sao_paulo()]);
    }

    #[test]
    fn late_results_never_populate_a_short_query() {
        for ordering in ResponseOrdering::all() {
            let mut state = LookupState::default();
            reducer(&mut state, Action::QueryChanged("Sa".into()), *ordering);
            reducer(&mut state, Action::QueryChanged("S".into()), *ordering);

            let late = reducer(
                &mut state,
                Action::SearchDidLoad {
                    token: 1,
                    places: vec![sao_paulo()],
                },
                *ordering,
            );

            assert!(late.stale, "{ordering}");
            assert!(state.suggestions.is_empty(), "{ordering}");
        }
    }

    #[test]
    fn selecting_emits_dismiss_then_fetch() {
        let mut state = LookupState {
            query: "Sa".into(),
            suggestions: vec![sao_paulo(), santos()],
            search_token: 1,
            ..Default::default()
        };

        let result = reducer(&mut state, Action::SuggestionSelected(1), LATEST);

        assert_eq!(state.selected, Some(santos()));
        assert!(state.suggestions.is_empty());
        assert_eq!(
            result.effects,
            vec![
                Effect::DismissInput,
                Effect::FetchWeather {
                    token: 1,
                    lat: -23.96,
                    lon: -46.33
                },
            ]
        );
    }

    #[test]
    fn selecting_out_of_range_does_nothing() {
        let mut state = LookupState {
            suggestions: vec![sao_paulo()],
            ..Default::default()
        };

        let result = reducer(&mut state, Action::SuggestionSelected(3), LATEST);

        assert_eq!(result, Dispatch::unchanged());
        assert_eq!(state.suggestions.len(), 1);
        assert_eq!(state.selected, None);
    }

    #[test]
    fn selection_supersedes_pending_search() {
        let mut state = LookupState::default();
        reducer(&mut state, Action::QueryChanged("Sa".into()), LATEST);
        reducer(
            &mut state,
            Action::SearchDidLoad {
                token: 1,
                places: vec![sao_paulo()],
            },
            LATEST,
        );
        reducer(&mut state, Action::QueryChanged("San".into()), LATEST);
        reducer(&mut state, Action::SuggestionSelected(0), LATEST);

        let late = reducer(
            &mut state,
            Action::SearchDidLoad {
                token: 2,
                places: vec![santos()],
            },
            LATEST,
        );

        assert!(late.stale);
        assert!(state.suggestions.is_empty());
    }

    #[test]
    fn weather_error_keeps_previous_result() {
        let mut state = LookupState {
            weather: Some(weather("São Paulo", 24.3)),
            weather_token: 2,
            ..Default::default()
        };

        let result = reducer(
            &mut state,
            Action::WeatherDidError {
                token: 2,
                kind: ErrorKind::Decode,
                message: "missing `weather[0]`".into(),
            },
            LATEST,
        );

        assert!(!result.changed);
        assert!(!result.stale);
        assert_eq!(state.weather, Some(weather("São Paulo", 24.3)));
    }

    #[test]
    fn stale_weather_is_dropped_when_latest_issued_wins() {
        let mut state = LookupState {
            weather_token: 2,
            ..Default::default()
        };

        reducer(
            &mut state,
            Action::WeatherDidLoad {
                token: 2,
                weather: weather("Santos", 22.0),
            },
            LATEST,
        );
        let late = reducer(
            &mut state,
            Action::WeatherDidLoad {
                token: 1,
                weather: weather("São Paulo", 24.3),
            },
            LATEST,
        );

        assert!(late.stale);
        assert_eq!(state.weather.as_ref().map(|w| w.name.as_str()), Some("Santos"));
    }
}
