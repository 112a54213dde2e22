//! Core library for the `weather` dashboard.
//!
//! This crate defines:
//! - Configuration of the single dashboard location
//! - The fetch gateway over the Open-Meteo forecast and air-quality APIs
//! - The pure derivation of a render-ready [`DisplayModel`]
//!
//! It is used by `weather-cli`, but can also be reused by other front ends.

pub mod codes;
pub mod config;
pub mod dashboard;
pub mod derive;
pub mod error;
pub mod model;
pub mod provider;

pub use config::{Config, LocationConfig};
pub use dashboard::{Dashboard, DashboardState};
pub use derive::{DeriveOptions, ForecastIconMode, HourCycle, Locale, derive};
pub use error::{DataShapeError, Endpoint, NetworkError, WeatherError};
pub use model::{DisplayModel, RawAirQuality, RawBundle, RawForecast};
pub use provider::{OpenMeteoClient, WeatherSource};
