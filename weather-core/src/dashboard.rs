//! One dashboard load: fetch both payloads, then derive the display model.

use chrono::{DateTime, Utc};

use crate::{
    config::Config,
    derive::{DeriveOptions, derive},
    error::WeatherError,
    model::DisplayModel,
    provider::{OpenMeteoClient, WeatherSource},
};

/// What the screen should show.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DashboardState {
    /// Nothing loaded yet.
    #[default]
    Loading,
    Ready(Box<DisplayModel>),
    /// The load failed as a whole; nothing partial is kept.
    Failed(String),
}

impl DashboardState {
    pub fn from_result(result: Result<DisplayModel, WeatherError>) -> Self {
        match result {
            Ok(model) => DashboardState::Ready(Box::new(model)),
            Err(err) => {
                tracing::error!(error = %err, "failed to load dashboard");
                DashboardState::Failed(err.to_string())
            }
        }
    }

    pub fn model(&self) -> Option<&DisplayModel> {
        match self {
            DashboardState::Ready(model) => Some(model.as_ref()),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct Dashboard {
    source: Box<dyn WeatherSource>,
    options: DeriveOptions,
}

impl Dashboard {
    pub fn new(source: Box<dyn WeatherSource>, options: DeriveOptions) -> Self {
        Self { source, options }
    }

    /// Dashboard backed by Open-Meteo, configured from `config`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        config.validate()?;
        let client = OpenMeteoClient::from_config(config)?;
        Ok(Self::new(Box::new(client), config.derive_options()))
    }

    pub async fn load(&self, now: DateTime<Utc>) -> Result<DisplayModel, WeatherError> {
        let bundle = self.source.fetch().await?;
        tracing::debug!(
            hourly = bundle.forecast.hourly.time.len(),
            daily = bundle.forecast.daily.time.len(),
            air_quality = bundle.air_quality.hourly.time.len(),
            "fetched payloads"
        );
        let model = derive(&bundle.forecast, &bundle.air_quality, now, &self.options)?;
        Ok(model)
    }

    pub async fn load_state(&self, now: DateTime<Utc>) -> DashboardState {
        DashboardState::from_result(self.load(now).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::{DataShapeError, Endpoint, NetworkError},
        model::{
            RawBundle,
            fixtures::{raw_air_quality, raw_forecast},
        },
    };
    use async_trait::async_trait;

    #[derive(Debug)]
    struct FixedSource {
        days: usize,
    }

    #[async_trait]
    impl WeatherSource for FixedSource {
        async fn fetch(&self) -> Result<RawBundle, NetworkError> {
            Ok(RawBundle {
                forecast: raw_forecast(self.days),
                air_quality: raw_air_quality(vec![Some(1); 24]),
            })
        }
    }

    #[derive(Debug)]
    struct TimedOutSource;

    #[async_trait]
    impl WeatherSource for TimedOutSource {
        async fn fetch(&self) -> Result<RawBundle, NetworkError> {
            Err(NetworkError::Timeout { endpoint: Endpoint::AirQuality, timeout_secs: 10 })
        }
    }

    fn now() -> DateTime<Utc> {
        "2024-06-01T12:00:00Z".parse().unwrap()
    }

    #[tokio::test]
    async fn loads_display_model() {
        let dashboard = Dashboard::new(Box::new(FixedSource { days: 7 }), DeriveOptions::default());
        let model = dashboard.load(now()).await.unwrap();
        assert_eq!(model.air_quality, "Good");
        assert_eq!(model.temperature_window.len(), 5);
    }

    #[tokio::test]
    async fn network_failure_yields_failed_state() {
        let dashboard = Dashboard::new(Box::new(TimedOutSource), DeriveOptions::default());
        let err = dashboard.load(now()).await.unwrap_err();
        assert!(matches!(err, WeatherError::Network(NetworkError::Timeout { .. })));

        let state = dashboard.load_state(now()).await;
        assert!(matches!(state, DashboardState::Failed(ref msg) if msg.contains("timed out")));
        assert!(state.model().is_none());
    }

    #[tokio::test]
    async fn short_daily_series_is_not_rendered() {
        let dashboard = Dashboard::new(Box::new(FixedSource { days: 3 }), DeriveOptions::default());
        let err = dashboard.load(now()).await.unwrap_err();
        assert!(matches!(
            err,
            WeatherError::DataShape(DataShapeError::TooFewDays { required: 4, actual: 3 })
        ));
    }

    #[test]
    fn starts_in_loading_state() {
        let state = DashboardState::default();
        assert_eq!(state, DashboardState::Loading);
        assert!(state.model().is_none());
    }

    #[test]
    fn from_config_rejects_invalid_location() {
        let mut cfg = Config::default();
        cfg.location.latitude = 123.0;
        assert!(Dashboard::from_config(&cfg).is_err());
    }
}
