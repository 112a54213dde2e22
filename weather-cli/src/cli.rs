use anyhow::{Context, anyhow};
use chrono::Utc;
use clap::{Parser, Subcommand};
use inquire::{CustomType, Select, Text};
use weather_core::{Config, Dashboard, DashboardState, ForecastIconMode, HourCycle};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Single-location weather dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch and show the dashboard for the configured location.
    Show {
        /// Print the derived display model as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Interactively configure the location and display options.
    Configure,

    /// Print the path of the configuration file.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Show { json } => show(json).await,
            Command::Configure => configure(),
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
                Ok(())
            }
        }
    }
}

async fn show(json: bool) -> anyhow::Result<()> {
    let config = Config::load()?;
    let dashboard = Dashboard::from_config(&config).context("Failed to set up weather client")?;

    let mut state = DashboardState::Loading;
    if !json {
        eprintln!("{}", render::render_state(&config.location.name, &state));
    }
    state = dashboard.load_state(Utc::now()).await;

    match &state {
        DashboardState::Ready(model) if json => {
            let out = serde_json::to_string_pretty(model.as_ref())
                .context("Failed to serialize display model")?;
            println!("{out}");
            Ok(())
        }
        DashboardState::Ready(_) => {
            print!("{}", render::render_state(&config.location.name, &state));
            Ok(())
        }
        DashboardState::Failed(msg) => {
            Err(anyhow!("Could not load weather for {}: {msg}", config.location.name))
        }
        DashboardState::Loading => Err(anyhow!("Weather data was not loaded")),
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    config.location.name = Text::new("Location name:")
        .with_default(&config.location.name)
        .prompt()?;
    config.location.latitude = CustomType::<f64>::new("Latitude:")
        .with_default(config.location.latitude)
        .with_error_message("Please enter a number, e.g. 44.17")
        .prompt()?;
    config.location.longitude = CustomType::<f64>::new("Longitude:")
        .with_default(config.location.longitude)
        .with_error_message("Please enter a number, e.g. 28.62")
        .prompt()?;
    config.request_timeout_secs = CustomType::<u64>::new("Request timeout (seconds):")
        .with_default(config.request_timeout_secs)
        .prompt()?;

    let cycles = vec![ClockChoice(HourCycle::H23), ClockChoice(HourCycle::H12)];
    let cursor = usize::from(config.hour_cycle == HourCycle::H12);
    config.hour_cycle = Select::new("Clock:", cycles).with_starting_cursor(cursor).prompt()?.0;

    let modes = vec![
        IconChoice(ForecastIconMode::CurrentCode),
        IconChoice(ForecastIconMode::DailyCode),
    ];
    let cursor = usize::from(config.forecast_icons == ForecastIconMode::DailyCode);
    config.forecast_icons =
        Select::new("Forecast card icons:", modes).with_starting_cursor(cursor).prompt()?.0;

    config.validate()?;
    let path = config.save()?;
    tracing::info!(path = %path.display(), "configuration saved");
    println!("Saved configuration to {}", path.display());

    Ok(())
}

struct ClockChoice(HourCycle);

impl std::fmt::Display for ClockChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self.0 {
            HourCycle::H23 => "24-hour (13:05)",
            HourCycle::H12 => "12-hour (01:05 PM)",
        })
    }
}

struct IconChoice(ForecastIconMode);

impl std::fmt::Display for IconChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self.0 {
            ForecastIconMode::CurrentCode => "Current weather on every card",
            ForecastIconMode::DailyCode => "Each day's own weather",
        })
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
    fn parses_show_json() {
        let cli = Cli::try_parse_from(["weather", "show", "--json"]).unwrap();
        assert!(matches!(cli.command, Command::Show { json: true }));
    }

    #[test]
    fn parses_config_path() {
        let cli = Cli::try_parse_from(["weather", "config-path"]).unwrap();
        assert!(matches!(cli.command, Command::ConfigPath));
    }

    #[test]
    fn rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["weather", "forecast"]).is_err());
    }
}
