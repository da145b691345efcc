use skycast_core::{CityTable, WeatherReport, model::utc_offset_label};

const RULE: &str = "────────────────────────────────";

/// Human-readable weather panel.
pub fn report_text(report: &WeatherReport) -> String {
    let humidity = format!("💧 Humidity {}%", report.humidity_pct);
    let pressure = format!("📊 Pressure {} hPa", report.pressure_hpa);

    [
        format!("{} {}", report.condition.icon(), report.location_name()),
        format!("  {:.1}°C  {}", report.temperature_c, report.description),
        format!("  Feels like: {:.1}°C", report.feels_like_c),
        format!("  {RULE}"),
        format!("  {humidity:<22}💨 Wind {:.1} km/h", report.wind_speed_kmh),
        format!("  {pressure:<22}🌡️ Feels {:.1}°C", report.feels_like_c),
        format!(
            "  🌅 {}   🌇 {}",
            report.sunrise.format("%H:%M"),
            report.sunset.format("%H:%M")
        ),
        format!(
            "  Season: {} • TZ: {}",
            report.season.title(),
            report.utc_offset_label()
        ),
        format!("  Updated: {}", report.observed_at.format("%H:%M:%S")),
    ]
    .join("\n")
}

pub fn report_json(report: &WeatherReport) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// One line per city: name, country, coordinates, offset.
pub fn city_list(table: &CityTable) -> String {
    table
        .records()
        .iter()
        .map(|c| {
            format!(
                "{:<12} {:<12} {:>9.4} {:>10.4}  {}",
                c.name,
                c.country,
                c.latitude,
                c.longitude,
                utc_offset_label(c.utc_offset_hours),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
