use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Calendar season, already corrected for hemisphere when it appears in a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl Season {
    /// Northern-hemisphere season for a 1-based month.
    pub fn from_month(month: u32) -> Self {
        match month {
            12 | 1 | 2 => Season::Winter,
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            _ => Season::Autumn,
        }
    }

    /// The season on the other side of the equator.
    pub fn flipped(self) -> Self {
        match self {
            Season::Winter => Season::Summer,
            Season::Summer => Season::Winter,
            Season::Spring => Season::Autumn,
            Season::Autumn => Season::Spring,
        }
    }

    /// Base temperature range in °C before geographic and diurnal adjustments.
    pub fn temperature_range(self) -> (f64, f64) {
        match self {
            Season::Winter => (-5.0, 10.0),
            Season::Spring => (10.0, 20.0),
            Season::Summer => (20.0, 35.0),
            Season::Autumn => (5.0, 18.0),
        }
    }

    /// Candidate conditions and their weights. Each set sums to 1.0.
    pub fn condition_weights(self) -> &'static [(Condition, f64)] {
        match self {
            Season::Winter => &[
                (Condition::Clear, 0.2),
                (Condition::Clouds, 0.4),
                (Condition::Snow, 0.3),
                (Condition::Mist, 0.1),
            ],
            Season::Spring => &[
                (Condition::Clear, 0.3),
                (Condition::Clouds, 0.4),
                (Condition::Rain, 0.2),
                (Condition::Drizzle, 0.1),
            ],
            Season::Summer => &[
                (Condition::Clear, 0.6),
                (Condition::Clouds, 0.3),
                (Condition::Thunderstorm, 0.1),
            ],
            Season::Autumn => &[
                (Condition::Clear, 0.3),
                (Condition::Clouds, 0.4),
                (Condition::Rain, 0.2),
                (Condition::Mist, 0.1),
            ],
        }
    }

    pub fn candidates(self) -> impl Iterator<Item = Condition> {
        self.condition_weights().iter().map(|(c, _)| *c)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Winter => "winter",
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
        }
    }

    /// Capitalized name for display, e.g. "Summer".
    pub fn title(&self) -> &'static str {
        match self {
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Autumn => "Autumn",
        }
    }

    pub const fn all() -> &'static [Season] {
        &[Season::Winter, Season::Spring, Season::Summer, Season::Autumn]
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse weather class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    Clear,
    Clouds,
    Rain,
    Snow,
    Thunderstorm,
    Drizzle,
    Mist,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Clear => "Clear",
            Condition::Clouds => "Clouds",
            Condition::Rain => "Rain",
            Condition::Snow => "Snow",
            Condition::Thunderstorm => "Thunderstorm",
            Condition::Drizzle => "Drizzle",
            Condition::Mist => "Mist",
        }
    }

    pub fn descriptions(&self) -> &'static [&'static str] {
        match self {
            Condition::Clear => &["Sunny", "Clear", "Bright"],
            Condition::Clouds => &["Partly Cloudy", "Cloudy", "Overcast"],
            Condition::Rain => &["Light Rain", "Rainy", "Heavy Rain"],
            Condition::Snow => &["Light Snow", "Snowy", "Blizzard"],
            Condition::Thunderstorm => &["Thunderstorm", "Stormy"],
            Condition::Drizzle => &["Drizzle", "Light Rain"],
            Condition::Mist => &["Misty", "Foggy", "Hazy"],
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Condition::Clear => "☀️",
            Condition::Clouds => "☁️",
            Condition::Rain => "🌧️",
            Condition::Snow => "❄️",
            Condition::Thunderstorm => "⛈️",
            Condition::Drizzle => "🌦️",
            Condition::Mist => "🌫️",
        }
    }

    /// Precipitating conditions: colder, more humid.
    pub fn is_wet(&self) -> bool {
        matches!(self, Condition::Rain | Condition::Snow | Condition::Thunderstorm)
    }

    pub const fn all() -> &'static [Condition] {
        &[
            Condition::Clear,
            Condition::Clouds,
            Condition::Rain,
            Condition::Snow,
            Condition::Thunderstorm,
            Condition::Drizzle,
            Condition::Mist,
        ]
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated user query.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherRequest {
    pub city: String,
    pub when: Option<NaiveDateTime>,
}

impl WeatherRequest {
    /// Trims the name and rejects blank input before it reaches the synthesizer.
    pub fn new(city: &str, when: Option<NaiveDateTime>) -> Result<Self> {
        let city = city.trim();
        if city.is_empty() {
            return Err(Error::EmptyCity);
        }

        Ok(Self {
            city: city.to_string(),
            when,
        })
    }

    /// Like [`WeatherRequest::new`], parsing `date` with [`parse_when`].
    pub fn parse(city: &str, date: Option<&str>) -> Result<Self> {
        let when = date.map(parse_when).transpose()?;
        Self::new(city, when)
    }

    /// Requested timestamp, or the local wall clock.
    pub fn when_or_now(&self) -> NaiveDateTime {
        self.when.unwrap_or_else(|| chrono::Local::now().naive_local())
    }
}

/// Parse a user-supplied local date/time. A bare date means midnight.
pub fn parse_when(input: &str) -> Result<NaiveDateTime> {
    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
    ];

    let trimmed = input.trim();

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
        .ok_or_else(|| Error::InvalidDate {
            input: input.to_string(),
        })
}

/// "UTC+3", "UTC-5", "UTC+0".
pub fn utc_offset_label(hours: i32) -> String {
    format!("UTC{}{hours}", if hours >= 0 { "+" } else { "" })
}

/// One synthesized report. A value object: built once, rendered, dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub city: String,
    pub country: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub pressure_hpa: u16,
    pub wind_speed_kmh: f64,
    pub condition: Condition,
    pub description: String,
    pub sunrise: NaiveTime,
    pub sunset: NaiveTime,
    pub season: Season,
    pub utc_offset_hours: i32,
    pub observed_at: NaiveDateTime,
}

impl WeatherReport {
    pub fn location_name(&self) -> String {
        format!("{}, {}", self.city, self.country)
    }

    pub fn utc_offset_label(&self) -> String {
        utc_offset_label(self.utc_offset_hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn season_from_month_boundaries() {
        let expected = [
            (1, Season::Winter),
            (2, Season::Winter),
            (3, Season::Spring),
            (5, Season::Spring),
            (6, Season::Summer),
            (8, Season::Summer),
            (9, Season::Autumn),
            (11, Season::Autumn),
            (12, Season::Winter),
        ];
        for (month, season) in expected {
            assert_eq!(Season::from_month(month), season, "month {month}");
        }
    }

    #[test]
    fn flipping_twice_is_identity() {
        for season in Season::all() {
            assert_eq!(season.flipped().flipped(), *season);
            assert_ne!(season.flipped(), *season);
        }
        assert_eq!(Season::Spring.flipped(), Season::Autumn);
    }

    #[test]
    fn condition_weights_sum_to_one() {
        for season in Season::all() {
            let total: f64 = season.condition_weights().iter().map(|(_, w)| w).sum();
            assert!((total - 1.0).abs() < 1e-9, "{season}: {total}");
        }
    }

    #[test]
    fn every_condition_has_descriptions() {
        for condition in Condition::all() {
            assert!(!condition.descriptions().is_empty());
            assert!(!condition.icon().is_empty());
        }
        assert!(Condition::Thunderstorm.is_wet());
        assert!(!Condition::Drizzle.is_wet());
    }

    #[test]
    fn request_rejects_blank_city() {
        assert_eq!(WeatherRequest::new("", None), Err(Error::EmptyCity));
        assert_eq!(WeatherRequest::new("  \t ", None), Err(Error::EmptyCity));

        let req = WeatherRequest::new("  Paris ", None).expect("valid city");
        assert_eq!(req.city, "Paris");
        assert_eq!(Error::EmptyCity.to_string(), "Please enter a city name!");
    }

    #[test]
    fn parse_when_accepts_supported_formats() {
        let dt = parse_when("2024-07-15 14:30").expect("space format");
        assert_eq!((dt.month(), dt.day(), dt.hour(), dt.minute()), (7, 15, 14, 30));

        let dt = parse_when("2024-07-15T09:05:07").expect("iso format");
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (9, 5, 7));

        let dt = parse_when("2024-01-02").expect("bare date");
        assert_eq!((dt.day(), dt.hour(), dt.minute()), (2, 0, 0));
    }

    #[test]
    fn parse_when_rejects_garbage() {
        let err = parse_when("next tuesday").unwrap_err();
        assert!(matches!(err, Error::InvalidDate { ref input } if input == "next tuesday"));

        let err = WeatherRequest::parse("Rome", Some("2024-13-01")).unwrap_err();
        assert!(err.to_string().contains("Invalid date"));
    }

    #[test]
    fn utc_offset_labels() {
        assert_eq!(utc_offset_label(3), "UTC+3");
        assert_eq!(utc_offset_label(0), "UTC+0");
        assert_eq!(utc_offset_label(-5), "UTC-5");
    }
}
