//! Turns the two raw payloads into a [`DisplayModel`].
//!
//! Nothing here performs I/O or reads the clock: `now` and the locale are
//! arguments, so the same inputs always produce the same model.

use chrono::{DateTime, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    codes::{aqi_category, weather_description, weather_icon},
    error::DataShapeError,
    model::{
        AirQuality, CurrentConditions, DailyRecord, DisplayModel, Forecast, ForecastDay,
        RawAirQuality, RawForecast, TemperaturePoint,
    },
};

/// Hours on either side of the current hour kept in the temperature window.
pub const WINDOW_RADIUS_HOURS: i64 = 2;
/// Forecast cards shown after today.
pub const FORECAST_DAYS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HourCycle {
    /// 00:00 - 23:59
    #[default]
    H23,
    /// 12:00 AM - 11:59 PM
    H12,
}

/// Which weather code drives the icon on each forecast card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ForecastIconMode {
    /// Every card shows the icon of the current weather.
    #[default]
    CurrentCode,
    /// Each card shows its own day's weather code.
    DailyCode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Locale {
    pub hour_cycle: HourCycle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeriveOptions {
    pub locale: Locale,
    pub forecast_icons: ForecastIconMode,
}

/// Ingest both payloads and derive the display model.
pub fn derive(
    forecast: &RawForecast,
    air_quality: &RawAirQuality,
    now: DateTime<Utc>,
    options: &DeriveOptions,
) -> Result<DisplayModel, DataShapeError> {
    let forecast = Forecast::try_from(forecast)?;
    let air_quality = AirQuality::try_from(air_quality)?;
    derive_from_tables(&forecast, &air_quality, now, options)
}

pub fn derive_from_tables(
    forecast: &Forecast,
    air_quality: &AirQuality,
    now: DateTime<Utc>,
    options: &DeriveOptions,
) -> Result<DisplayModel, DataShapeError> {
    let required = FORECAST_DAYS + 1;
    if forecast.daily.len() < required {
        return Err(DataShapeError::TooFewDays { required, actual: forecast.daily.len() });
    }
    let today = &forecast.daily[0];
    let snapshot = forecast.hourly.first().ok_or(DataShapeError::Empty { series: "hourly" })?;

    let locale = &options.locale;
    let local_now = now.with_timezone(&forecast.utc_offset).naive_local();
    let current_code = forecast.current.weather_code;

    Ok(DisplayModel {
        date_label: local_now.format("%A, %B %-d, %Y").to_string(),
        current: CurrentConditions {
            temperature: round_temperature(forecast.current.temperature),
            description: weather_description(current_code),
            icon: weather_icon(current_code),
            wind_speed_kmh: forecast.current.wind_speed,
        },
        sunrise: format_time(today.sunrise, locale),
        sunset: format_time(today.sunset, locale),
        pressure_hpa: snapshot_value(snapshot.pressure, "pressure_msl")?,
        visibility_km: format_visibility_km(snapshot_value(snapshot.visibility, "visibility")?),
        relative_humidity: snapshot_value(snapshot.relative_humidity, "relative_humidity_2m")?,
        uv_index_max: today.uv_index_max,
        air_quality: aqi_category(current_aqi(snapshot.time, air_quality)?),
        temperature_window: temperature_window(forecast, local_now, locale),
        forecast: forecast_days(
            &forecast.daily[1..required],
            current_code,
            options.forecast_icons,
        )?,
    })
}

/// Same-day hourly temperatures within [`WINDOW_RADIUS_HOURS`] of `local_now`.
///
/// Hours belonging to the previous or next day never qualify, so the window
/// shrinks near midnight and is empty when the series does not cover today.
/// Hours without a temperature are left out.
pub fn temperature_window(
    forecast: &Forecast,
    local_now: NaiveDateTime,
    locale: &Locale,
) -> Vec<TemperaturePoint> {
    let today = local_now.date();
    let hour = i64::from(local_now.hour());

    forecast
        .hourly
        .iter()
        .filter(|r| r.time.date() == today)
        .filter(|r| (i64::from(r.time.hour()) - hour).abs() <= WINDOW_RADIUS_HOURS)
        .filter_map(|r| {
            r.temperature.map(|temperature| TemperaturePoint {
                label: hour_label(r.time, locale),
                temperature,
            })
        })
        .collect()
}

fn forecast_days(
    days: &[DailyRecord],
    current_code: i64,
    mode: ForecastIconMode,
) -> Result<[ForecastDay; FORECAST_DAYS], DataShapeError> {
    let cards = days
        .iter()
        .map(|day| {
            let code = match mode {
                ForecastIconMode::CurrentCode => current_code,
                ForecastIconMode::DailyCode => {
                    day.weather_code.ok_or(DataShapeError::MissingDailyCodes)?
                }
            };
            Ok(ForecastDay {
                day_label: day.date.format("%a").to_string(),
                icon: weather_icon(code),
                temperature_min: round_temperature(day.temperature_min),
                temperature_max: round_temperature(day.temperature_max),
            })
        })
        .collect::<Result<Vec<_>, DataShapeError>>()?;

    cards.try_into().map_err(|cards: Vec<ForecastDay>| DataShapeError::TooFewDays {
        required: FORECAST_DAYS + 1,
        actual: cards.len() + 1,
    })
}

/// AQI for the hour the rest of the snapshot is read from, matched by timestamp.
/// Falls back to the first air-quality row when no row shares that timestamp.
fn current_aqi(
    reference: NaiveDateTime,
    air_quality: &AirQuality,
) -> Result<Option<i64>, DataShapeError> {
    let first = air_quality
        .hourly
        .first()
        .ok_or(DataShapeError::Empty { series: "air_quality" })?;

    let record = air_quality
        .hourly
        .iter()
        .find(|r| r.time == reference)
        .unwrap_or(first);

    Ok(record.european_aqi)
}

/// Hourly row 0 feeds the current-conditions panel, so its values must be present.
fn snapshot_value(value: Option<f64>, field: &'static str) -> Result<f64, DataShapeError> {
    value.ok_or(DataShapeError::MissingValue { series: "hourly", field, index: 0 })
}

pub fn format_time(time: NaiveDateTime, locale: &Locale) -> String {
    match locale.hour_cycle {
        HourCycle::H23 => time.format("%H:%M").to_string(),
        HourCycle::H12 => time.format("%I:%M %p").to_string(),
    }
}

fn hour_label(time: NaiveDateTime, locale: &Locale) -> String {
    match locale.hour_cycle {
        HourCycle::H23 => format!("{}:00", time.hour()),
        HourCycle::H12 => {
            let (pm, hour) = time.hour12();
            format!("{hour}:00 {}", if pm { "PM" } else { "AM" })
        }
    }
}

pub fn format_visibility_km(meters: f64) -> String {
    format!("{:.1}", meters / 1000.0)
}

/// Nearest integer, ties toward positive infinity (-2.5 -> -2, 2.5 -> 3).
fn round_temperature(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
