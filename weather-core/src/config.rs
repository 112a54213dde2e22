use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::derive::{DeriveOptions, ForecastIconMode, HourCycle, Locale};

pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const DEFAULT_AIR_QUALITY_URL: &str = "https://air-quality-api.open-meteo.com/v1/air-quality";
/// Applied to each of the two requests separately.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// The single location shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationConfig {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self { name: "Constanta, Romania".to_string(), latitude: 44.17, longitude: 28.62 }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// request_timeout_secs = 10
/// hour_cycle = "h23"
/// forecast_icons = "current-code"
///
/// [location]
/// name = "Constanta, Romania"
/// latitude = 44.17
/// longitude = 28.62
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub forecast_url: String,
    pub air_quality_url: String,
    pub request_timeout_secs: u64,
    pub hour_cycle: HourCycle,
    pub forecast_icons: ForecastIconMode,
    pub location: LocationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
            air_quality_url: DEFAULT_AIR_QUALITY_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            hour_cycle: HourCycle::default(),
            forecast_icons: ForecastIconMode::default(),
            location: LocationConfig::default(),
        }
    }
}

impl Config {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn derive_options(&self) -> DeriveOptions {
        DeriveOptions {
            locale: Locale { hour_cycle: self.hour_cycle },
            forecast_icons: self.forecast_icons,
        }
    }

    /// Reject values the provider or the HTTP client cannot work with.
    pub fn validate(&self) -> Result<()> {
        let loc = &self.location;
        if !(-90.0..=90.0).contains(&loc.latitude) {
            return Err(anyhow!("Latitude {} is outside -90..=90", loc.latitude));
        }
        if !(-180.0..=180.0).contains(&loc.longitude) {
            return Err(anyhow!("Longitude {} is outside -180..=180", loc.longitude));
        }
        if self.request_timeout_secs == 0 {
            return Err(anyhow!("request_timeout_secs must be at least 1"));
        }
        Ok(())
    }

    /// Load config from disk, or return the defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(path)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-dashboard", "weather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_open_meteo() {
        let cfg = Config::default();
        assert_eq!(cfg.forecast_url, DEFAULT_FORECAST_URL);
        assert_eq!(cfg.air_quality_url, DEFAULT_AIR_QUALITY_URL);
        assert_eq!(cfg.request_timeout(), Duration::from_secs(10));
        assert_eq!(cfg.location.latitude, 44.17);
        assert_eq!(cfg.location.longitude, 28.62);
        assert_eq!(cfg.forecast_icons, ForecastIconMode::CurrentCode);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let cfg = Config::from_toml(
            r#"
            hour_cycle = "h12"

            [location]
            name = "Oslo"
            latitude = 59.91
            longitude = 10.75
            "#,
        )
        .unwrap();

        assert_eq!(cfg.location.name, "Oslo");
        assert_eq!(cfg.hour_cycle, HourCycle::H12);
        assert_eq!(cfg.request_timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(cfg.derive_options().locale.hour_cycle, HourCycle::H12);
    }

    #[test]
    fn icon_mode_uses_kebab_case() {
        let cfg = Config::from_toml(r#"forecast_icons = "daily-code""#).unwrap();
        assert_eq!(cfg.forecast_icons, ForecastIconMode::DailyCode);
        assert!(Config::from_toml(r#"forecast_icons = "DailyCode""#).is_err());
    }

    #[test]
    fn toml_roundtrip() {
        let mut cfg = Config::default();
        cfg.request_timeout_secs = 3;
        cfg.forecast_icons = ForecastIconMode::DailyCode;

        let text = toml::to_string_pretty(&cfg).unwrap();
        assert_eq!(Config::from_toml(&text).unwrap(), cfg);
    }

    #[test]
    fn rejects_bad_coordinates_and_zero_timeout() {
        let mut cfg = Config::default();
        cfg.location.latitude = 91.0;
        assert!(cfg.validate().unwrap_err().to_string().contains("Latitude"));

        let mut cfg = Config::default();
        cfg.location.longitude = -200.0;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.request_timeout_secs = 0;
        assert!(cfg.validate().is_err());
    }
}
