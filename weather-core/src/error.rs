use std::fmt;

use thiserror::Error;

/// Which of the two upstream calls an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Forecast,
    AirQuality,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Forecast => "forecast",
            Endpoint::AirQuality => "air-quality",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of the fetch gateway. Any one of these fails the whole load.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("{endpoint} request failed: {source}")]
    Request {
        endpoint: Endpoint,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} request timed out after {timeout_secs}s")]
    Timeout { endpoint: Endpoint, timeout_secs: u64 },

    #[error("{endpoint} request failed with status {status}: {body}")]
    Status {
        endpoint: Endpoint,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("{endpoint} returned malformed JSON: {source}")]
    Decode {
        endpoint: Endpoint,
        #[source]
        source: serde_json::Error,
    },
}

impl NetworkError {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            NetworkError::Request { endpoint, .. }
            | NetworkError::Timeout { endpoint, .. }
            | NetworkError::Status { endpoint, .. }
            | NetworkError::Decode { endpoint, .. } => *endpoint,
        }
    }
}

/// The payload arrived but does not have the shape derivation needs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataShapeError {
    #[error("{series} series is empty")]
    Empty { series: &'static str },

    #[error("{series}.{field} has {actual} entries, expected {expected}")]
    LengthMismatch {
        series: &'static str,
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid timestamp '{value}' in {series} series")]
    InvalidTimestamp { series: &'static str, value: String },

    #[error("{series} timestamps are not strictly increasing at index {index}")]
    NotMonotonic { series: &'static str, index: usize },

    #[error("{series}.{field} has no value at index {index}")]
    MissingValue { series: &'static str, field: &'static str, index: usize },

    #[error("utc offset of {0}s is out of range")]
    InvalidUtcOffset(i32),

    #[error("daily series has {actual} entries, at least {required} are required")]
    TooFewDays { required: usize, actual: usize },

    #[error("daily weather codes were not provided but forecast icons use them")]
    MissingDailyCodes,
}

/// Error of the combined fetch + derive pipeline.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    DataShape(#[from] DataShapeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_shape_messages_name_the_series() {
        let err = DataShapeError::LengthMismatch {
            series: "hourly",
            field: "visibility",
            expected: 24,
            actual: 23,
        };
        assert_eq!(err.to_string(), "hourly.visibility has 23 entries, expected 24");
    }

    #[test]
    fn weather_error_is_transparent() {
        let err: WeatherError = DataShapeError::TooFewDays { required: 4, actual: 3 }.into();
        assert!(matches!(err, WeatherError::DataShape(_)));
        assert_eq!(err.to_string(), "daily series has 3 entries, at least 4 are required");
    }

    #[test]
    fn timeout_names_endpoint() {
        let err = NetworkError::Timeout { endpoint: Endpoint::AirQuality, timeout_secs: 10 };
        assert_eq!(err.endpoint(), Endpoint::AirQuality);
        assert!(err.to_string().starts_with("air-quality request timed out"));
    }
}
