//! Open-Meteo forecast + air-quality client.
//!
//! See: https://open-meteo.com/en/docs and https://open-meteo.com/en/docs/air-quality-api

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::{
    config::Config,
    derive::ForecastIconMode,
    error::{Endpoint, NetworkError},
    model::{RawAirQuality, RawBundle, RawForecast},
};

use super::WeatherSource;

const HOURLY_FORECAST_FIELDS: &str = "temperature_2m,pressure_msl,relative_humidity_2m,visibility";
const DAILY_FORECAST_FIELDS: &str =
    "temperature_2m_min,temperature_2m_max,sunrise,sunset,uv_index_max";
const HOURLY_AIR_QUALITY_FIELDS: &str = "pm10,pm2_5,european_aqi";

#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    http: Client,
    forecast_url: String,
    air_quality_url: String,
    latitude: f64,
    longitude: f64,
    timeout_secs: u64,
    daily_codes: bool,
}

impl OpenMeteoClient {
    pub fn from_config(config: &Config) -> reqwest::Result<Self> {
        let http = Client::builder().timeout(config.request_timeout()).build()?;

        Ok(Self {
            http,
            forecast_url: config.forecast_url.clone(),
            air_quality_url: config.air_quality_url.clone(),
            latitude: config.location.latitude,
            longitude: config.location.longitude,
            timeout_secs: config.request_timeout_secs,
            daily_codes: config.forecast_icons == ForecastIconMode::DailyCode,
        })
    }

    fn forecast_query(&self) -> Vec<(&'static str, String)> {
        let daily = if self.daily_codes {
            format!("{DAILY_FORECAST_FIELDS},weather_code")
        } else {
            DAILY_FORECAST_FIELDS.to_string()
        };

        vec![
            ("latitude", self.latitude.to_string()),
            ("longitude", self.longitude.to_string()),
            ("hourly", HOURLY_FORECAST_FIELDS.to_string()),
            ("daily", daily),
            ("current_weather", "true".to_string()),
            ("timezone", "auto".to_string()),
        ]
    }

    fn air_quality_query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("latitude", self.latitude.to_string()),
            ("longitude", self.longitude.to_string()),
            ("hourly", HOURLY_AIR_QUALITY_FIELDS.to_string()),
            ("timezone", "auto".to_string()),
        ]
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        url: &str,
        query: &[(&'static str, String)],
    ) -> Result<T, NetworkError> {
        tracing::debug!(%endpoint, url, "sending request");

        let res = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| self.transport_error(endpoint, e))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| self.transport_error(endpoint, e))?;

        if !status.is_success() {
            tracing::warn!(%endpoint, %status, "request failed");
            return Err(NetworkError::Status { endpoint, status, body: truncate_body(&body) });
        }

        serde_json::from_str(&body).map_err(|source| {
            tracing::warn!(%endpoint, error = %source, "malformed response body");
            NetworkError::Decode { endpoint, source }
        })
    }

    fn transport_error(&self, endpoint: Endpoint, err: reqwest::Error) -> NetworkError {
        tracing::warn!(%endpoint, error = %err, "transport error");
        if err.is_timeout() {
            NetworkError::Timeout { endpoint, timeout_secs: self.timeout_secs }
        } else {
            NetworkError::Request { endpoint, source: err }
        }
    }
}

#[async_trait]
impl WeatherSource for OpenMeteoClient {
    async fn fetch(&self) -> Result<RawBundle, NetworkError> {
        let forecast_query = self.forecast_query();
        let air_quality_query = self.air_quality_query();

        let (forecast, air_quality) = tokio::try_join!(
            self.get_json::<RawForecast>(Endpoint::Forecast, &self.forecast_url, &forecast_query),
            self.get_json::<RawAirQuality>(
                Endpoint::AirQuality,
                &self.air_quality_url,
                &air_quality_query
            ),
        )?;

        Ok(RawBundle { forecast, air_quality })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
