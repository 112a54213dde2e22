//! Fixed lookup tables for WMO weather codes and the European AQI.
//!
//! Description and icon are separate tables with separate fallbacks: an
//! unknown code reads "N/A" but still shows the clear-sky icon.

pub const UNKNOWN_DESCRIPTION: &str = "N/A";
pub const FALLBACK_ICON: &str = "01d";
pub const UNKNOWN_AQI: &str = "Unknown";

pub fn weather_description(code: i64) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        61 => "Light rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        71 => "Snow",
        80 => "Showers",
        95 => "Thunderstorm",
        99 => "Heavy thunderstorm",
        _ => UNKNOWN_DESCRIPTION,
    }
}

/// Icon asset name (OpenWeather-style day icons) for a weather code.
pub fn weather_icon(code: i64) -> &'static str {
    match code {
        0 => "01d",
        1 => "02d",
        2 => "03d",
        3 | 45 | 48 => "04d",
        51 | 61 => "09d",
        63 | 65 | 80 => "10d",
        71 => "13d",
        95 | 99 => "11d",
        _ => FALLBACK_ICON,
    }
}

/// Label for a European AQI category (1..=5).
pub fn aqi_category(value: Option<i64>) -> &'static str {
    match value {
        Some(1) => "Good",
        Some(2) => "Fair",
        Some(3) => "Moderate",
        Some(4) => "Poor",
        Some(5) => "Very Poor",
        _ => UNKNOWN_AQI,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KNOWN_CODES: [i64; 14] = [0, 1, 2, 3, 45, 48, 51, 61, 63, 65, 71, 80, 95, 99];

    #[test]
    fn every_known_code_has_a_description() {
        for code in KNOWN_CODES {
            assert_ne!(weather_description(code), UNKNOWN_DESCRIPTION, "code {code}");
        }
    }

    #[test]
    fn unknown_codes_fall_back_independently() {
        for code in [-1, 4, 53, 75, 96, 1000] {
            assert_eq!(weather_description(code), "N/A");
            assert_eq!(weather_icon(code), weather_icon(0));
        }
    }

    #[test]
    fn icons_follow_condition_groups() {
        assert_eq!(weather_icon(45), "04d");
        assert_eq!(weather_icon(51), "09d");
        assert_eq!(weather_icon(80), "10d");
        assert_eq!(weather_icon(71), "13d");
        assert_eq!(weather_icon(99), "11d");
    }

    #[test]
    fn aqi_labels() {
        let expected = ["Good", "Fair", "Moderate", "Poor", "Very Poor"];
        for (value, label) in (1..=5).zip(expected) {
            assert_eq!(aqi_category(Some(value)), label);
        }
    }

    #[test]
    fn aqi_out_of_range_is_unknown() {
        for value in [0, 6, -1, 42] {
            assert_eq!(aqi_category(Some(value)), "Unknown");
        }
        assert_eq!(aqi_category(None), "Unknown");
    }
}
