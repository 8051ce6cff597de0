use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use inquire::{Password, Select};
use lookup_core::{
    Action, Config, Outcome, ResponseOrdering, WeatherLookup, config::API_KEY_ENV, effect,
    provider_from_config,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::{interactive, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather-lookup",
    version,
    about = "Look up current weather by city name"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Use this config file instead of the platform default.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Defaults to `interactive`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and response ordering policy.
    Configure,

    /// List place suggestions for a partial city name.
    Search {
        text: String,

        /// Replay every prefix of TEXT as a keystroke, with overlapping requests.
        #[arg(long)]
        incremental: bool,
    },

    /// Search, pick a suggestion and show its current weather.
    Show {
        text: String,

        /// Which suggestion to pick (1-based).
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..=5))]
        pick: u16,

        /// Print the lookup state as JSON instead of the result card.
        #[arg(long)]
        json: bool,
    },

    /// Prompt for cities until an empty line or Esc.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };

        match self.command.unwrap_or(Command::Interactive) {
            Command::Configure => configure(config, self.config.as_deref())?,
            Command::Search { text, incremental } => {
                let mut lookup = build_lookup(&config)?;
                if incremental {
                    search_incremental(&mut lookup, &text).await;
                } else {
                    let outcome = lookup.input_changed(text).await;
                    debug!(?outcome, "search finished");
                }
                print_suggestions(&lookup);
            }
            Command::Show { text, pick, json } => {
                let mut lookup = build_lookup(&config)?;
                let output = show(&mut lookup, &text, pick, json).await?;
                if !output.is_empty() {
                    println!("{output}");
                }
            }
            Command::Interactive => {
                let mut lookup = build_lookup(&config)?;
                interactive::run(&mut lookup).await?;
            }
        }

        Ok(())
    }
}

fn build_lookup(config: &Config) -> Result<WeatherLookup> {
    if config.resolved_api_key().is_none() {
        warn!(
            "No OpenWeather API key configured; every request will fail. \
             Hint: run `weather-lookup configure` or set {API_KEY_ENV}."
        );
    }

    let provider = provider_from_config(config)?;
    let lookup = WeatherLookup::new(provider, config.ordering);
    info!(ordering = %lookup.ordering(), "lookup ready");
    Ok(lookup)
}

/// Search `text`, pick suggestion `pick` (1-based) and render the result.
///
/// A failed weather fetch renders nothing; picking past the end of the list is an error.
async fn show(lookup: &mut WeatherLookup, text: &str, pick: u16, json: bool) -> Result<String> {
    let outcome = lookup.input_changed(text).await;
    debug!(?outcome, "search finished");

    let found = lookup.view().suggestions.len();
    if found == 0 {
        return Ok(format!("No places found for \"{text}\"."));
    }

    match lookup.select(usize::from(pick) - 1).await {
        Outcome::Skipped => bail!(
            "Only {found} suggestion(s) for \"{text}\"; cannot pick #{pick}.\n{}",
            render::suggestion_list(&lookup.view().suggestions)
        ),
        outcome if outcome.is_success() => debug!("weather fetch finished"),
        outcome => debug!(?outcome, "weather fetch did not update the card"),
    }

    if json {
        return serde_json::to_string_pretty(lookup.view())
            .context("Failed to serialize lookup state");
    }
    Ok(render::weather_card(lookup.view()).unwrap_or_default())
}

fn configure(mut config: Config, path: Option<&std::path::Path>) -> Result<()> {
    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_help_message("Leave empty to remove the stored key")
        .prompt()?;
    config.set_api_key(api_key);

    let orderings = ResponseOrdering::all().to_vec();
    let cursor = orderings
        .iter()
        .position(|o| *o == config.ordering)
        .unwrap_or_default();
    config.ordering = Select::new("When responses overlap, apply:", orderings)
        .with_starting_cursor(cursor)
        .prompt()?;

    let saved_to = match path {
        Some(path) => {
            config.save_to(path)?;
            path.to_path_buf()
        }
        None => config.save()?,
    };
    println!("Saved configuration to {}", saved_to.display());

    Ok(())
}

/// Dispatch every prefix of `text` as a keystroke, run the searches concurrently and
/// apply their results in completion order.
async fn search_incremental(lookup: &mut WeatherLookup, text: &str) {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let provider = lookup.provider();

    let mut prefix = String::new();
    for ch in text.chars() {
        prefix.push(ch);
        let dispatch = lookup.dispatch(Action::QueryChanged(prefix.clone()));

        for effect in dispatch.effects {
            let provider = Arc::clone(&provider);
            let tx = tx.clone();
            tokio::spawn(async move {
                if let Some(action) = effect::perform(provider.as_ref(), effect).await {
                    let _ = tx.send(action);
                }
            });
        }
    }
    drop(tx);

    while let Some(action) = rx.recv().await {
        let dispatch = lookup.dispatch(action);
        if dispatch.stale {
            debug!(
                ordering = %lookup.ordering(),
                "discarded response for a superseded keystroke"
            );
        }
    }
}

fn print_suggestions(lookup: &WeatherLookup) {
    let suggestions = &lookup.view().suggestions;
    if suggestions.is_empty() {
        println!("No suggestions.");
    } else {
        println!("{}", render::suggestion_list(suggestions));
    }
}
