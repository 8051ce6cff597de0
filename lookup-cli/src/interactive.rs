use anyhow::Result;
use inquire::{InquireError, Select, Text};
use lookup_core::{Outcome, WeatherLookup};
use tracing::debug;

use crate::render;

/// Prompt loop: type a city, pick a suggestion, see the card. Empty input or Esc exits.
pub async fn run(lookup: &mut WeatherLookup) -> Result<()> {
    loop {
        let text = match Text::new("City:").with_placeholder("Type a city").prompt() {
            Ok(text) => text,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err.into()),
        };
        if text.is_empty() {
            break;
        }

        let outcome = lookup.input_changed(text).await;
        debug!(?outcome, "search finished");

        let suggestions = &lookup.view().suggestions;
        if suggestions.is_empty() {
            println!("No suggestions.");
            continue;
        }

        let labels: Vec<String> = suggestions.iter().map(|place| place.label()).collect();
        let picked = match Select::new("Place:", labels).raw_prompt() {
            Ok(option) => option.index,
            Err(InquireError::OperationCanceled) => continue,
            Err(InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err.into()),
        };

        if let Outcome::Failed(kind) = lookup.select(picked).await {
            debug!(%kind, "weather fetch failed, keeping previous result");
        }

        if let Some(card) = render::weather_card(lookup.view()) {
            println!("\n{card}\n");
        }
    }

    Ok(())
}
