use std::fmt::Write;

use weather_core::{DashboardState, DisplayModel};

pub fn render_state(location: &str, state: &DashboardState) -> String {
    match state {
        DashboardState::Loading => "Loading...".to_string(),
        DashboardState::Ready(model) => render(location, model),
        DashboardState::Failed(msg) => format!("{location}: weather unavailable ({msg})\n"),
    }
}

pub fn render(location: &str, model: &DisplayModel) -> String {
    let mut out = String::new();
    let c = &model.current;

    // Writing to a String cannot fail.
    let _ = writeln!(out, "{location}");
    let _ = writeln!(out, "{}", model.date_label);
    let _ = writeln!(out);
    let _ = writeln!(out, "  {}°C  {}  [{}]", c.temperature, c.description, c.icon);
    let _ = writeln!(out);

    let rows = [
        (format!("Sunrise: {}", model.sunrise), format!("Sunset: {}", model.sunset)),
        (
            format!("Wind: {} km/h", c.wind_speed_kmh),
            format!("Humidity: {}%", model.relative_humidity),
        ),
        (
            format!("Pressure: {} hPa", model.pressure_hpa),
            format!("UV Index: {}", model.uv_index_max),
        ),
        (
            format!("Visibility: {} km", model.visibility_km),
            format!("Air Quality: {}", model.air_quality),
        ),
    ];
    for (left, right) in &rows {
        let _ = writeln!(out, "  {left:<24}{right}");
    }

    if !model.temperature_window.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Temperature around now");
        for point in &model.temperature_window {
            let _ = writeln!(out, "  {:>8}  {:.1}°C", point.label, point.temperature);
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Forecast for 3 days");
    for day in &model.forecast {
        let _ = writeln!(
            out,
            "  {}  [{}]  {}° / {}°",
            day.day_label, day.icon, day.temperature_min, day.temperature_max
        );
    }

    out
}
