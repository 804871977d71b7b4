use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, Text};
use weather_core::{Config, WeatherRecord, lookup, provider_from_config};

use crate::server::{self, AppState};
use crate::views::reading;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-web", version, about = "Weather lookup service")]
pub struct Cli {
    /// Path to the config file. Defaults to the platform config directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the HTTP server.
    Serve {
        /// Address to listen on, e.g. "0.0.0.0:5000". Overrides the config file.
        #[arg(long)]
        bind: Option<String>,
    },

    /// Show current weather for a location.
    Show {
        /// Address or location name.
        location: String,

        /// Print the raw record as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Interactively set API keys and the listen address.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let path = self.config_path()?;

        match self.command {
            Command::Serve { bind } => {
                let config = load_config(&path)?;
                let bind = bind.unwrap_or_else(|| config.server.bind.clone());
                let state = AppState::from_config(&config)?;

                server::run_http_server(state, &bind).await
            }
            Command::Show { location, json } => {
                let config = load_config(&path)?;
                let provider = provider_from_config(&config)?;
                let record = lookup(provider.as_ref(), &location).await?;

                if json {
                    println!("{}", serde_json::to_string_pretty(&record)?);
                } else {
                    print!("{}", format_record(&location, &record));
                }
                Ok(())
            }
            Command::Configure => configure(&path),
        }
    }

    fn config_path(&self) -> anyhow::Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => Config::config_file_path(),
        }
    }
}

fn load_config(path: &std::path::Path) -> anyhow::Result<Config> {
    let mut config = Config::load_from(path)?;
    config.apply_env();
    Ok(config)
}

fn format_record(query: &str, record: &WeatherRecord) -> String {
    format!(
        "Weather for {query} ({})\n  \
         Temperature:    {} °C\n  \
         Wind speed:     {} m/s\n  \
         Precipitation:  {} mm (last hour)\n",
        record.location,
        reading(record.temperature),
        reading(record.wind_speed),
        reading(record.precipitation),
    )
}

/// Prompt for keys and bind address, then write them to `path`.
/// Environment overrides are not applied so they never end up on disk.
fn configure(path: &std::path::Path) -> anyhow::Result<()> {
    let mut config = Config::load_from(path)?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_help_message(keep_hint(config.api_key.is_some()))
        .prompt()
        .context("Failed to read API key")?;
    if !api_key.trim().is_empty() {
        config.api_key = Some(api_key.trim().to_string());
    }

    let maps_api_key = Password::new("Google Maps API key (optional):")
        .without_confirmation()
        .with_help_message(keep_hint(config.maps_api_key.is_some()))
        .prompt()
        .context("Failed to read maps API key")?;
    if !maps_api_key.trim().is_empty() {
        config.maps_api_key = Some(maps_api_key.trim().to_string());
    }

    let bind = Text::new("Listen address:")
        .with_default(&config.server.bind)
        .prompt()
        .context("Failed to read listen address")?;
    config.server.bind = bind;

    config.save_to(path)?;
    println!("Configuration saved to {}", path.display());

    Ok(())
}

fn keep_hint(has_value: bool) -> &'static str {
    if has_value {
        "Leave empty to keep the current value"
    } else {
        "Leave empty to skip"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_serve_with_global_config() {
        let cli = Cli::try_parse_from([
            "weather-web",
            "serve",
            "--bind",
            "0.0.0.0:8080",
            "--config",
            "/tmp/weather.toml",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("/tmp/weather.toml")));
        match cli.command {
            Command::Serve { bind } => assert_eq!(bind.as_deref(), Some("0.0.0.0:8080")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_show_with_json_flag() {
        let cli = Cli::try_parse_from(["weather-web", "show", "New York", "--json"]).unwrap();

        match cli.command {
            Command::Show { location, json } => {
                assert_eq!(location, "New York");
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn show_requires_a_location() {
        assert!(Cli::try_parse_from(["weather-web", "show"]).is_err());
    }

    #[test]
    fn explicit_config_path_wins() {
        let cli = Cli::try_parse_from(["weather-web", "--config", "cfg.toml", "configure"]).unwrap();
        assert_eq!(cli.config_path().unwrap(), PathBuf::from("cfg.toml"));
    }

    #[test]
    fn format_record_is_human_readable() {
        let record = WeatherRecord {
            latitude: 10.1,
            longitude: -10.1,
            temperature: 25.0,
            wind_speed: 5.0,
            precipitation: 0.0,
            location: "Lat: 10.1, Lon: -10.1".to_string(),
        };

        let out = format_record("London", &record);
        assert!(out.starts_with("Weather for London (Lat: 10.1, Lon: -10.1)"));
        assert!(out.contains("Temperature:    25.0 °C"));
        assert!(out.contains("Precipitation:  0.0 mm"));
    }

    #[test]
    fn format_record_does_not_round() {
        let record = WeatherRecord {
            latitude: 1.0,
            longitude: 2.0,
            temperature: 25.37,
            wind_speed: 3.25,
            precipitation: 0.04,
            location: "Lat: 1, Lon: 2".to_string(),
        };

        let out = format_record("Somewhere", &record);
        assert!(out.contains("Temperature:    25.37 °C"));
        assert!(out.contains("Wind speed:     3.25 m/s"));
        assert!(out.contains("Precipitation:  0.04 mm"));
    }
}
