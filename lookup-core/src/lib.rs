//! Core library for the `weather-lookup` app.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather provider (geocoding search and current weather)
//! - Explicit lookup state, the reducer that mutates it and the effects it declares
//! - `WeatherLookup`, the controller front ends drive
//!
//! It is used by `lookup-cli`, but has no terminal dependencies and can back any front end.

pub mod action;
pub mod config;
pub mod controller;
pub mod effect;
pub mod error;
pub mod model;
pub mod provider;
pub mod reducer;
pub mod state;

pub use action::Action;
pub use config::{Config, ResponseOrdering};
pub use controller::{Outcome, WeatherLookup};
pub use effect::Effect;
pub use error::{Endpoint, ErrorKind, LookupError};
pub use model::{PlaceSuggestion, WeatherResult};
pub use provider::{OpenWeatherProvider, WeatherProvider, provider_from_config};
pub use reducer::Dispatch;
pub use state::{LookupState, Phase};
