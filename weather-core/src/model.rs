//! Wire payloads, ingested tables and the render-ready display model.
//!
//! Open-Meteo returns each series as parallel arrays. Those are only ever
//! read through [`Forecast`] / [`AirQuality`], which zip them into one record
//! per timestamp and reject payloads whose arrays disagree in length or whose
//! timestamps go backwards.

use chrono::{FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::DataShapeError;

// --- wire payloads ---

#[derive(Debug, Clone, Deserialize)]
pub struct RawForecast {
    #[serde(default)]
    pub utc_offset_seconds: i32,
    #[serde(default)]
    pub timezone: Option<String>,
    pub current_weather: RawCurrentWeather,
    pub hourly: RawForecastHourly,
    pub daily: RawForecastDaily,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCurrentWeather {
    pub temperature: f64,
    pub weathercode: i64,
    pub windspeed: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawForecastHourly {
    pub time: Vec<String>,
    /// Open-Meteo reports gaps in hourly series as `null`.
    pub temperature_2m: Vec<Option<f64>>,
    pub pressure_msl: Vec<Option<f64>>,
    pub relative_humidity_2m: Vec<Option<f64>>,
    pub visibility: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawForecastDaily {
    pub time: Vec<String>,
    pub temperature_2m_min: Vec<f64>,
    pub temperature_2m_max: Vec<f64>,
    pub sunrise: Vec<String>,
    pub sunset: Vec<String>,
    pub uv_index_max: Vec<f64>,
    /// Only present when the request asked for `daily=...,weather_code`.
    #[serde(default)]
    pub weather_code: Option<Vec<i64>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawAirQuality {
    pub hourly: RawAirQualityHourly,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawAirQualityHourly {
    pub time: Vec<String>,
    pub european_aqi: Vec<Option<i64>>,
    #[serde(default)]
    pub pm10: Vec<Option<f64>>,
    #[serde(default)]
    pub pm2_5: Vec<Option<f64>>,
}

/// Both payloads of one load, produced only when both requests succeeded.
#[derive(Debug, Clone)]
pub struct RawBundle {
    pub forecast: RawForecast,
    pub air_quality: RawAirQuality,
}

// --- ingested tables ---

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentWeather {
    pub temperature: f64,
    pub weather_code: i64,
    pub wind_speed: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HourlyRecord {
    pub time: NaiveDateTime,
    pub temperature: Option<f64>,
    pub pressure: Option<f64>,
    pub relative_humidity: Option<f64>,
    pub visibility: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub temperature_min: f64,
    pub temperature_max: f64,
    pub sunrise: NaiveDateTime,
    pub sunset: NaiveDateTime,
    pub uv_index_max: f64,
    pub weather_code: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    pub current: CurrentWeather,
    /// Offset of the location's local time, as resolved by the provider.
    pub utc_offset: FixedOffset,
    pub hourly: Vec<HourlyRecord>,
    pub daily: Vec<DailyRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AirQualityRecord {
    pub time: NaiveDateTime,
    pub european_aqi: Option<i64>,
    pub pm10: Option<f64>,
    pub pm2_5: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AirQuality {
    pub hourly: Vec<AirQualityRecord>,
}

impl TryFrom<&RawForecast> for Forecast {
    type Error = DataShapeError;

    fn try_from(raw: &RawForecast) -> Result<Self, Self::Error> {
        let utc_offset = FixedOffset::east_opt(raw.utc_offset_seconds)
            .ok_or(DataShapeError::InvalidUtcOffset(raw.utc_offset_seconds))?;

        let h = &raw.hourly;
        let n = h.time.len();
        check_len("hourly", "temperature_2m", n, h.temperature_2m.len())?;
        check_len("hourly", "pressure_msl", n, h.pressure_msl.len())?;
        check_len("hourly", "relative_humidity_2m", n, h.relative_humidity_2m.len())?;
        check_len("hourly", "visibility", n, h.visibility.len())?;

        let hourly = h
            .time
            .iter()
            .enumerate()
            .map(|(i, t)| {
                Ok(HourlyRecord {
                    time: parse_local_timestamp("hourly", t)?,
                    temperature: h.temperature_2m[i],
                    pressure: h.pressure_msl[i],
                    relative_humidity: h.relative_humidity_2m[i],
                    visibility: h.visibility[i],
                })
            })
            .collect::<Result<Vec<_>, DataShapeError>>()?;
        ensure_increasing("hourly", hourly.iter().map(|r| r.time))?;

        let d = &raw.daily;
        let n = d.time.len();
        check_len("daily", "temperature_2m_min", n, d.temperature_2m_min.len())?;
        check_len("daily", "temperature_2m_max", n, d.temperature_2m_max.len())?;
        check_len("daily", "sunrise", n, d.sunrise.len())?;
        check_len("daily", "sunset", n, d.sunset.len())?;
        check_len("daily", "uv_index_max", n, d.uv_index_max.len())?;
        if let Some(codes) = &d.weather_code {
            check_len("daily", "weather_code", n, codes.len())?;
        }

        let daily = d
            .time
            .iter()
            .enumerate()
            .map(|(i, t)| {
                Ok(DailyRecord {
                    date: parse_local_date("daily", t)?,
                    temperature_min: d.temperature_2m_min[i],
                    temperature_max: d.temperature_2m_max[i],
                    sunrise: parse_local_timestamp("daily", &d.sunrise[i])?,
                    sunset: parse_local_timestamp("daily", &d.sunset[i])?,
                    uv_index_max: d.uv_index_max[i],
                    weather_code: d.weather_code.as_ref().map(|codes| codes[i]),
                })
            })
            .collect::<Result<Vec<_>, DataShapeError>>()?;
        ensure_increasing("daily", daily.iter().map(|r| r.date))?;

        Ok(Forecast {
            current: CurrentWeather {
                temperature: raw.current_weather.temperature,
                weather_code: raw.current_weather.weathercode,
                wind_speed: raw.current_weather.windspeed,
            },
            utc_offset,
            hourly,
            daily,
        })
    }
}

impl TryFrom<&RawAirQuality> for AirQuality {
    type Error = DataShapeError;

    fn try_from(raw: &RawAirQuality) -> Result<Self, Self::Error> {
        let h = &raw.hourly;
        let n = h.time.len();
        check_len("air_quality", "european_aqi", n, h.european_aqi.len())?;
        // pm series are requested but unused; tolerate them being absent.
        if !h.pm10.is_empty() {
            check_len("air_quality", "pm10", n, h.pm10.len())?;
        }
        if !h.pm2_5.is_empty() {
            check_len("air_quality", "pm2_5", n, h.pm2_5.len())?;
        }

        let hourly = h
            .time
            .iter()
            .enumerate()
            .map(|(i, t)| {
                Ok(AirQualityRecord {
                    time: parse_local_timestamp("air_quality", t)?,
                    european_aqi: h.european_aqi[i],
                    pm10: h.pm10.get(i).copied().flatten(),
                    pm2_5: h.pm2_5.get(i).copied().flatten(),
                })
            })
            .collect::<Result<Vec<_>, DataShapeError>>()?;
        ensure_increasing("air_quality", hourly.iter().map(|r| r.time))?;

        Ok(AirQuality { hourly })
    }
}

fn check_len(
    series: &'static str,
    field: &'static str,
    expected: usize,
    actual: usize,
) -> Result<(), DataShapeError> {
    if expected == actual {
        Ok(())
    } else {
        Err(DataShapeError::LengthMismatch { series, field, expected, actual })
    }
}

fn ensure_increasing<T: PartialOrd>(
    series: &'static str,
    values: impl Iterator<Item = T>,
) -> Result<(), DataShapeError> {
    let mut prev: Option<T> = None;
    for (index, value) in values.enumerate() {
        if let Some(p) = &prev {
            if value <= *p {
                return Err(DataShapeError::NotMonotonic { series, index });
            }
        }
        prev = Some(value);
    }
    Ok(())
}

/// Parse a provider-local timestamp. Open-Meteo omits seconds (`2024-06-01T05:47`)
/// but the seconds form is accepted as well.
pub fn parse_local_timestamp(
    series: &'static str,
    value: &str,
) -> Result<NaiveDateTime, DataShapeError> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M"))
        .map_err(|_| DataShapeError::InvalidTimestamp { series, value: value.to_string() })
}

fn parse_local_date(series: &'static str, value: &str) -> Result<NaiveDate, DataShapeError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| DataShapeError::InvalidTimestamp { series, value: value.to_string() })
}

// --- display model ---

/// Everything the dashboard renders, fully derived.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayModel {
    /// e.g. "Saturday, June 1, 2024", in the location's timezone.
    pub date_label: String,
    pub current: CurrentConditions,
    pub sunrise: String,
    pub sunset: String,
    pub pressure_hpa: f64,
    /// Kilometers with one decimal, e.g. "24.0".
    pub visibility_km: String,
    pub relative_humidity: f64,
    pub uv_index_max: f64,
    pub air_quality: &'static str,
    pub temperature_window: Vec<TemperaturePoint>,
    pub forecast: [ForecastDay; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentConditions {
    pub temperature: i64,
    pub description: &'static str,
    pub icon: &'static str,
    pub wind_speed_kmh: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemperaturePoint {
    pub label: String,
    pub temperature: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastDay {
    pub day_label: String,
    pub icon: &'static str,
    pub temperature_min: i64,
    pub temperature_max: i64,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A forecast for 2024-06-01 with 48 hourly rows and `days` daily rows.
    pub fn raw_forecast(days: usize) -> RawForecast {
        let time: Vec<String> = (0..48)
            .map(|h| format!("2024-06-{:02}T{:02}:00", 1 + h / 24, h % 24))
            .collect();
        let temps: Vec<Option<f64>> = (0..48).map(|h| Some(10.0 + (h % 24) as f64 * 0.5)).collect();
        let dates: Vec<String> = (0..days).map(|d| format!("2024-06-{:02}", d + 1)).collect();

        RawForecast {
            utc_offset_seconds: 0,
            timezone: Some("GMT".to_string()),
            current_weather: RawCurrentWeather {
                temperature: 17.6,
                weathercode: 2,
                windspeed: 12.3,
            },
            hourly: RawForecastHourly {
                time,
                temperature_2m: temps,
                pressure_msl: vec![Some(1013.2); 48],
                relative_humidity_2m: vec![Some(64.0); 48],
                visibility: vec![Some(24000.0); 48],
            },
            daily: RawForecastDaily {
                sunrise: dates.iter().map(|d| format!("{d}T05:47")).collect(),
                sunset: dates.iter().map(|d| format!("{d}T20:58")).collect(),
                temperature_2m_min: (0..days).map(|d| 11.4 + d as f64).collect(),
                temperature_2m_max: (0..days).map(|d| 22.5 + d as f64).collect(),
                uv_index_max: vec![7.35; days],
                weather_code: None,
                time: dates,
            },
        }
    }

    pub fn raw_air_quality(aqi: Vec<Option<i64>>) -> RawAirQuality {
        let time = (0..aqi.len()).map(|h| format!("2024-06-01T{h:02}:00")).collect();
        RawAirQuality {
            hourly: RawAirQualityHourly {
                time,
                european_aqi: aqi,
                pm10: vec![],
                pm2_5: vec![],
            },
        }
    }
}
