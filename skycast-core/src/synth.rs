//! Synthetic weather model.
//!
//! A report is assembled from four ingredients: the season (from the month,
//! flipped south of the equator), a latitude band, the hour of day and a
//! weighted condition draw. Every random number comes from the injected
//! [`RandomSource`], always in the same order, so a fixed source and a fixed
//! timestamp reproduce a report exactly.

use chrono::{Datelike, NaiveDateTime, NaiveTime, Timelike};
use tracing::debug;

use crate::{
    city::CityTable,
    model::{Condition, Season, WeatherReport, WeatherRequest},
    random::RandomSource,
};

const MINUTES_PER_DAY: i64 = 24 * 60;
const BASE_SUNRISE_HOUR: i64 = 6;
const BASE_SUNSET_HOUR: i64 = 18;

/// Season actually experienced at `latitude` in `month`.
pub fn season_for(month: u32, latitude: f64) -> Season {
    let season = Season::from_month(month);
    if latitude < 0.0 { season.flipped() } else { season }
}

/// Temperature offset by latitude band: cold high latitudes, warm low ones.
pub fn latitude_modifier(latitude: f64) -> f64 {
    let lat = latitude.abs();
    if lat > 50.0 {
        -5.0
    } else if lat > 35.0 {
        0.0
    } else {
        10.0
    }
}

/// Generates [`WeatherReport`]s against a fixed city table.
#[derive(Debug, Clone, Copy)]
pub struct Synthesizer<'a> {
    cities: &'a CityTable,
}

impl Default for Synthesizer<'static> {
    fn default() -> Self {
        Self::new(CityTable::builtin())
    }
}

impl<'a> Synthesizer<'a> {
    pub fn new(cities: &'a CityTable) -> Self {
        Self { cities }
    }

    pub fn cities(&self) -> &'a CityTable {
        self.cities
    }

    /// Synthesize for a validated request, using the wall clock when it carries no time.
    pub fn report<R>(&self, request: &WeatherRequest, rng: &mut R) -> WeatherReport
    where
        R: RandomSource + ?Sized,
    {
        self.synthesize(&request.city, request.when_or_now(), rng)
    }

    /// Build a report for `city` at local time `now`. Unknown cities use equator/UTC geography.
    pub fn synthesize<R>(&self, city: &str, now: NaiveDateTime, rng: &mut R) -> WeatherReport
    where
        R: RandomSource + ?Sized,
    {
        let record = self.cities.lookup(city);
        let season = season_for(now.month(), record.latitude);

        debug!(
            city,
            known = !record.is_unknown(),
            latitude = record.latitude,
            %season,
            "synthesizing weather"
        );

        let (min_temp, max_temp) = season.temperature_range();
        let mut temp = rng.uniform(min_temp, max_temp) + latitude_modifier(record.latitude);
        temp += diurnal_adjustment(now.hour(), rng);

        let condition = pick_condition(season, rng);
        temp += condition_adjustment(condition, rng);

        let descriptions = condition.descriptions();
        let description = descriptions[rng.choose_index(descriptions.len())];

        let feels_like = if temp > 0.0 {
            temp - rng.uniform(1.0, 3.0)
        } else {
            temp - rng.uniform(0.5, 1.5)
        };

        let humidity = if condition.is_wet() {
            rng.uniform_int(60, 95)
        } else {
            rng.uniform_int(40, 75)
        };
        let pressure = rng.uniform_int(1000, 1020);

        let wind_speed = match condition {
            Condition::Thunderstorm => rng.uniform(15.0, 35.0),
            Condition::Rain | Condition::Snow => rng.uniform(10.0, 25.0),
            _ => rng.uniform(0.0, 15.0),
        };

        let (sunrise, sunset) = sun_times(season, record.utc_offset_hours, rng);

        debug!(%condition, temp, "weather synthesized");

        WeatherReport {
            city: city.to_string(),
            country: record.country,
            temperature_c: round1(temp),
            feels_like_c: round1(feels_like),
            humidity_pct: humidity as u8,
            pressure_hpa: pressure as u16,
            wind_speed_kmh: round1(wind_speed),
            condition,
            description: description.to_string(),
            sunrise,
            sunset,
            season,
            utc_offset_hours: record.utc_offset_hours,
            observed_at: now,
        }
    }
}

fn diurnal_adjustment<R: RandomSource + ?Sized>(hour: u32, rng: &mut R) -> f64 {
    match hour {
        0..6 => -rng.uniform(3.0, 8.0),
        6..12 => -rng.uniform(0.0, 3.0),
        12..18 => rng.uniform(0.0, 5.0),
        _ => -rng.uniform(1.0, 4.0),
    }
}

fn pick_condition<R: RandomSource + ?Sized>(season: Season, rng: &mut R) -> Condition {
    let candidates = season.condition_weights();
    let weights: Vec<f64> = candidates.iter().map(|(_, w)| *w).collect();
    candidates[rng.weighted_index(&weights)].0
}

fn condition_adjustment<R: RandomSource + ?Sized>(condition: Condition, rng: &mut R) -> f64 {
    match condition {
        c if c.is_wet() => -rng.uniform(3.0, 8.0),
        Condition::Clouds => -rng.uniform(1.0, 3.0),
        _ => rng.uniform(0.0, 5.0),
    }
}

fn sun_times<R: RandomSource + ?Sized>(
    season: Season,
    utc_offset_hours: i32,
    rng: &mut R,
) -> (NaiveTime, NaiveTime) {
    let mut sunrise_hour = BASE_SUNRISE_HOUR + rng.uniform_int(-1, 1);
    let mut sunset_hour = BASE_SUNSET_HOUR + rng.uniform_int(-1, 1);

    match season {
        Season::Summer => {
            sunrise_hour -= 1;
            sunset_hour += 1;
        }
        Season::Winter => {
            sunrise_hour += 1;
            sunset_hour -= 1;
        }
        Season::Spring | Season::Autumn => {}
    }

    let sunrise_minute = rng.uniform_int(0, 59);
    let sunset_minute = rng.uniform_int(0, 59);

    (
        clock_time(sunrise_hour, sunrise_minute, utc_offset_hours),
        clock_time(sunset_hour, sunset_minute, utc_offset_hours),
    )
}

/// Time of day for `hour:minute` shifted by `offset_hours`, wrapping past midnight.
fn clock_time(hour: i64, minute: i64, offset_hours: i32) -> NaiveTime {
    let minutes = ((hour + i64::from(offset_hours)) * 60 + minute).rem_euclid(MINUTES_PER_DAY);
    NaiveTime::MIN
        .overflowing_add_signed(chrono::Duration::minutes(minutes))
        .0
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
