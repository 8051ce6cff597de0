use chrono::Local;
use lookup_core::{LookupState, PlaceSuggestion, WeatherResult};

pub fn suggestion_list(suggestions: &[PlaceSuggestion]) -> String {
    suggestions
        .iter()
        .enumerate()
        .map(|(i, place)| format!("{:>2}. {}", i + 1, place.label()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Result card for the current weather, or `None` before the first successful fetch.
pub fn weather_card(state: &LookupState) -> Option<String> {
    let weather = state.weather.as_ref()?;
    Some(card(weather, state.selected.as_ref()))
}

fn card(weather: &WeatherResult, selected: Option<&PlaceSuggestion>) -> String {
    let mut lines = vec![weather.name.clone()];

    if let Some(place) = selected {
        if let Some(state) = &place.state {
            lines.push(format!("  State:       {state}"));
        }
        lines.push(format!("  Country:     {}", place.country));
    }

    let mut temp = format!("  Temperature: {}°C", weather.temperature_c);
    if let Some(feels_like) = weather.feels_like_c {
        temp.push_str(&format!(" (feels like {feels_like}°C)"));
    }
    lines.push(temp);
    lines.push(format!("  Conditions:  {}", weather.description));

    if let Some(humidity) = weather.humidity_pct {
        lines.push(format!("  Humidity:    {humidity}%"));
    }
    if let Some(observed_at) = weather.observed_at {
        let local = observed_at.with_timezone(&Local);
        lines.push(format!("  Updated:     {}", local.format("%Y-%m-%d %H:%M")));
    }
    lines.push(format!("  Icon:        {}", weather.icon_url()));

    lines.join("\n")
}
