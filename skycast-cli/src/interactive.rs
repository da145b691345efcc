use anyhow::{Context, Result};
use inquire::{InquireError, Select, Text};
use skycast_core::{CityTable, Config, RandomSource, Synthesizer, WeatherRequest};
use tracing::info;

use crate::render;

const SEARCH_OTHER: &str = "Search another city…";

/// `Ok(None)` when the user backs out with Esc or Ctrl-C.
fn answered<T>(result: Result<T, InquireError>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(err) => Err(err).context("Interactive prompt failed"),
    }
}

/// Pick-a-city loop: one report per pick until the user leaves.
pub fn browse<R: RandomSource>(synth: &Synthesizer<'_>, rng: &mut R) -> Result<()> {
    loop {
        let mut options: Vec<&str> = synth.cities().names().collect();
        options.push(SEARCH_OTHER);

        let Some(choice) = answered(Select::new("City:", options).prompt())? else {
            return Ok(());
        };

        let name = if choice == SEARCH_OTHER {
            match answered(Text::new("City name:").prompt())? {
                Some(name) => name,
                None => continue,
            }
        } else {
            choice.to_string()
        };

        match WeatherRequest::new(&name, None) {
            Ok(request) => {
                let report = synth.report(&request, rng);
                println!("{}\n", render::report_text(&report));
            }
            Err(err) => eprintln!("⚠️  {err}"),
        }
    }
}

/// Ask for a default city and an optional seed, then write the config file.
pub fn configure(mut config: Config, cities: &CityTable) -> Result<()> {
    let names: Vec<&str> = cities.names().collect();
    let cursor = names
        .iter()
        .position(|n| *n == config.default_city())
        .unwrap_or(0);

    let Some(city) = answered(
        Select::new("Default city:", names)
            .with_starting_cursor(cursor)
            .prompt(),
    )?
    else {
        return Ok(());
    };
    let city = city.to_string();

    let current_seed = config.seed.map(|s| s.to_string()).unwrap_or_default();
    let Some(seed_input) = answered(
        Text::new("Fixed seed:")
            .with_default(&current_seed)
            .with_help_message("leave empty for fresh random reports")
            .prompt(),
    )?
    else {
        return Ok(());
    };

    config.set_default_city(city);
    config.seed = parse_seed(&seed_input)?;

    let path = config.save()?;
    info!(path = %path.display(), "configuration written");
    println!("Saved configuration to {}", path.display());

    Ok(())
}

fn parse_seed(input: &str) -> Result<Option<u64>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    trimmed
        .parse()
        .map(Some)
        .with_context(|| format!("Seed must be a non-negative integer, got '{trimmed}'"))
}
