use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    ErrorKind, ResponseOrdering,
    action::Action,
    effect::{self, Effect},
    model::GEOCODE_LIMIT,
    provider::WeatherProvider,
    reducer::{Dispatch, reducer},
    state::LookupState,
};

/// How one of the two remote calls ended, as seen by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Outcome<T> {
    /// No request was issued (query too short, or no such suggestion).
    Skipped,
    Success(T),
    /// The request failed; state was left as documented for that failure.
    Failed(ErrorKind),
    /// The response belonged to a superseded request and was dropped.
    Stale,
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn failure(&self) -> Option<ErrorKind> {
        match self {
            Outcome::Failed(kind) => Some(*kind),
            _ => None,
        }
    }
}

/// Owns the lookup state and the provider it talks to.
#[derive(Debug)]
pub struct WeatherLookup {
    state: LookupState,
    provider: Arc<dyn WeatherProvider>,
    ordering: ResponseOrdering,
}

impl WeatherLookup {
    pub fn new(provider: Arc<dyn WeatherProvider>, ordering: ResponseOrdering) -> Self {
        Self::with_state(LookupState::default(), provider, ordering)
    }

    /// Resume from a previously serialized state.
    pub fn with_state(
        state: LookupState,
        provider: Arc<dyn WeatherProvider>,
        ordering: ResponseOrdering,
    ) -> Self {
        Self {
            state,
            provider,
            ordering,
        }
    }

    pub fn view(&self) -> &LookupState {
        &self.state
    }

    pub fn ordering(&self) -> ResponseOrdering {
        self.ordering
    }

    /// Handle for running effects outside the controller, e.g. on spawned tasks.
    pub fn provider(&self) -> Arc<dyn WeatherProvider> {
        Arc::clone(&self.provider)
    }

    /// Apply one action. Any returned effects are the caller's to run.
    pub fn dispatch(&mut self, action: Action) -> Dispatch {
        reducer(&mut self.state, action, self.ordering)
    }

    /// Input text changed: search when it qualifies, otherwise clear suggestions.
    ///
    /// Returns the number of suggestions now shown on success.
    pub async fn input_changed(&mut self, text: impl Into<String>) -> Outcome<usize> {
        let dispatch = self.dispatch(Action::QueryChanged(text.into()));

        let mut outcome = Outcome::Skipped;
        for result in self.perform_all(dispatch.effects).await {
            outcome = match self.apply(result) {
                (_, true) => Outcome::Stale,
                (Action::SearchDidLoad { places, .. }, false) => {
                    Outcome::Success(places.len().min(GEOCODE_LIMIT))
                }
                (Action::SearchDidError { kind, .. }, false) => Outcome::Failed(kind),
                _ => outcome,
            };
        }
        outcome
    }

    /// User picked suggestion `index`. Suggestions are cleared before the fetch starts.
    pub async fn select(&mut self, index: usize) -> Outcome<()> {
        let dispatch = self.dispatch(Action::SuggestionSelected(index));

        let mut outcome = Outcome::Skipped;
        for result in self.perform_all(dispatch.effects).await {
            outcome = match self.apply(result) {
                (_, true) => Outcome::Stale,
                (Action::WeatherDidLoad { .. }, false) => Outcome::Success(()),
                (Action::WeatherDidError { kind, .. }, false) => Outcome::Failed(kind),
                _ => outcome,
            };
        }
        outcome
    }

    async fn perform_all(&self, effects: Vec<Effect>) -> Vec<Action> {
        let mut results = Vec::with_capacity(effects.len());
        for effect in effects {
            if let Some(action) = effect::perform(self.provider.as_ref(), effect).await {
                results.push(action);
            }
        }
        results
    }

    /// Feed a result back in. Returns the action for inspection and whether it was stale.
    fn apply(&mut self, action: Action) -> (Action, bool) {
        let dispatch = reducer(&mut self.state, action.clone(), self.ordering);
        (action, dispatch.stale)
    }
}
