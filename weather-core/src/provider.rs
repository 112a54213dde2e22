use async_trait::async_trait;
use std::fmt::Debug;

use crate::{error::NetworkError, model::RawBundle};

pub mod open_meteo;

pub use open_meteo::OpenMeteoClient;

/// Source of the two raw payloads a dashboard load needs.
///
/// Implementations fetch both payloads or fail as a whole; a bundle is never
/// returned with one half missing.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn fetch(&self) -> Result<RawBundle, NetworkError>;
}
