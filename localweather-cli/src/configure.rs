use anyhow::{Context, Result};
use inquire::{CustomType, Select, Text};
use localweather_core::{Config, Coordinates, LocationMode};

/// Interactive editing of the on-disk configuration.
pub fn run() -> Result<()> {
    let mut config = Config::load()?;

    config.base_url = Text::new("Weather backend URL:")
        .with_default(&config.base_url)
        .prompt()
        .context("Failed to read backend URL")?
        .trim()
        .to_string();

    let modes = LocationMode::all().to_vec();
    let start = modes.iter().position(|m| *m == config.location.mode).unwrap_or(0);
    let mode = Select::new("Device location source:", modes)
        .with_starting_cursor(start)
        .with_help_message("ip: look up by IP address, fixed: stored coordinates, off: never share")
        .prompt()
        .context("Failed to read location mode")?;

    if mode == LocationMode::Fixed {
        let latitude = prompt_degrees("Latitude:", config.location.latitude, 90.0)?;
        let longitude = prompt_degrees("Longitude:", config.location.longitude, 180.0)?;
        config.location.set_fixed(Coordinates::new(latitude, longitude));
    } else {
        config.location.mode = mode;
    }

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}

fn prompt_degrees(message: &str, current: Option<f64>, limit: f64) -> Result<f64> {
    let mut prompt = CustomType::<f64>::new(message)
        .with_error_message("Please enter a number")
        .with_validator(move |value: &f64| {
            if value.abs() <= limit {
                Ok(inquire::validator::Validation::Valid)
            } else {
                Ok(inquire::validator::Validation::Invalid(
                    format!("Must be between -{limit} and {limit}").into(),
                ))
            }
        });

    if let Some(current) = current {
        prompt = prompt.with_default(current);
    }

    prompt.prompt().with_context(|| format!("Failed to read {message}"))
}
