//! # Lighting, Plug-Load and Ceiling-Fan Shapers
//!
//! Interior lighting follows an astronomical day-length model: two built-in
//! near-solstice half-hour reference shapes are interpolated by each day's
//! computed day length. Exterior/holiday lighting, plug loads and ceiling
//! fans use plain hour-of-day x month multiplier tables. Every shaped series
//! is then pulled toward its daily minimum in proportion to the fraction of
//! occupants away or asleep, so an empty or sleeping house keeps its baseline
//! load but never adds activity on top of it.

use std::f64::consts::PI;

use itertools::izip;
use once_cell::sync::Lazy;

use crate::config::{HolidayLighting, ShapeTables};
use crate::domain::{SimYear, MINUTES_PER_DAY};

const HALF_HOURS: usize = 48;

/// Relative interior lighting demand near the winter solstice: long dark
/// mornings and evenings.
const WINTER_RAW: [f64; HALF_HOURS] = [
    0.12, 0.10, 0.08, 0.07, 0.06, 0.06, 0.06, 0.06, 0.07, 0.09, 0.16, 0.25, //  0h-6h
    0.38, 0.49, 0.52, 0.48, 0.40, 0.32, 0.26, 0.22, 0.20, 0.19, 0.19, 0.20, //  6h-12h
    0.21, 0.22, 0.23, 0.25, 0.28, 0.33, 0.42, 0.55, 0.70, 0.84, 0.94, 1.00, // 12h-18h
    0.98, 0.94, 0.88, 0.80, 0.70, 0.58, 0.46, 0.36, 0.28, 0.22, 0.17, 0.14, // 18h-24h
];

/// Relative interior lighting demand near the summer solstice: compressed
/// morning use, late evening peak.
const SUMMER_RAW: [f64; HALF_HOURS] = [
    0.10, 0.08, 0.07, 0.06, 0.05, 0.05, 0.05, 0.05, 0.05, 0.06, 0.07, 0.09, //  0h-6h
    0.12, 0.15, 0.16, 0.15, 0.13, 0.12, 0.11, 0.11, 0.11, 0.11, 0.11, 0.12, //  6h-12h
    0.12, 0.13, 0.13, 0.14, 0.15, 0.16, 0.18, 0.21, 0.26, 0.34, 0.46, 0.62, // 12h-18h
    0.78, 0.92, 1.00, 0.97, 0.88, 0.74, 0.58, 0.44, 0.32, 0.24, 0.18, 0.13, // 18h-24h
];

fn peak_normalized(raw: &[f64; HALF_HOURS]) -> Vec<f64> {
    let peak = raw.iter().cloned().fold(0.0, f64::max);
    raw.iter().map(|v| v / peak).collect()
}

static WINTER_SHAPE: Lazy<Vec<f64>> = Lazy::new(|| peak_normalized(&WINTER_RAW));
static SUMMER_SHAPE: Lazy<Vec<f64>> = Lazy::new(|| peak_normalized(&SUMMER_RAW));

/// Closed-form sunrise/sunset astronomy for the building's location.
/// Declination and hour-angle math as in standard clear-sky models.
pub struct SunModel {
    latitude_deg: f64,
    longitude_deg: f64,
    timezone_offset: i32,
}

impl SunModel {
    pub fn new(latitude_deg: f64, longitude_deg: f64, timezone_offset: i32) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
            timezone_offset,
        }
    }

    fn declination_rad(day_of_year: usize) -> f64 {
        let doy = day_of_year as f64 + 1.0;
        23.45 * (360.0 / 365.0 * (doy + 284.0) * PI / 180.0).sin() * PI / 180.0
    }

    /// Hours of daylight for a zero-based day-of-year. Polar edge cases clamp
    /// to 0 or 24.
    pub fn day_length_hours(&self, day_of_year: usize) -> f64 {
        let latitude_rad = self.latitude_deg * PI / 180.0;
        let declination_rad = Self::declination_rad(day_of_year);
        let cos_hour_angle = (-latitude_rad.tan() * declination_rad.tan()).clamp(-1.0, 1.0);
        2.0 * cos_hour_angle.acos() * 180.0 / PI / 15.0
    }

    /// Local clock hours of sunrise and sunset. Solar noon shifts with the
    /// longitude's offset from the timezone meridian.
    pub fn sunrise_sunset(&self, day_of_year: usize) -> (f64, f64) {
        let solar_noon = 12.0 - (self.longitude_deg / 15.0 - self.timezone_offset as f64);
        let half_day = self.day_length_hours(day_of_year) / 2.0;
        (solar_noon - half_day, solar_noon + half_day)
    }
}

/// Interior lighting minute shape for the full year.
pub fn interior_lighting(year: &SimYear, sun: &SunModel) -> Vec<f64> {
    let lengths: Vec<f64> = (0..year.days).map(|d| sun.day_length_hours(d)).collect();
    let min_len = lengths.iter().cloned().fold(f64::INFINITY, f64::min);
    let max_len = lengths.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let span = (max_len - min_len).max(1e-9);

    // Residual demand while the sun is up, relative to the dark-hours shape.
    const DAYLIGHT_FACTOR: f64 = 0.3;

    let mut minutes = Vec::with_capacity(year.total_minutes());
    for day in 0..year.days {
        // 0 at the shortest day (winter shape), 1 at the longest (summer).
        let weight = (lengths[day] - min_len) / span;
        let (sunrise, sunset) = sun.sunrise_sunset(day);
        for minute in 0..MINUTES_PER_DAY {
            let half_hour = minute / 30;
            let mut value =
                WINTER_SHAPE[half_hour] * (1.0 - weight) + SUMMER_SHAPE[half_hour] * weight;
            let hour = minute as f64 / 60.0;
            if hour > sunrise + 0.5 && hour < sunset - 0.5 {
                value *= DAYLIGHT_FACTOR;
            }
            minutes.push(value);
        }
    }
    minutes
}

fn in_holiday_window(holiday: &HolidayLighting, month: u32, day_of_month: u32) -> bool {
    let date = (month, day_of_month);
    let start = (holiday.start_month, holiday.start_day);
    let end = (holiday.end_month, holiday.end_day);
    if start <= end {
        date >= start && date <= end
    } else {
        // Window wraps the year end (e.g. late November through early January).
        date >= start || date <= end
    }
}

/// Hour-of-day x month multiplier shape, with an optional holiday evening
/// boost for exterior lighting.
pub fn table_shape(
    year: &SimYear,
    tables: &ShapeTables,
    holiday: Option<&HolidayLighting>,
) -> Vec<f64> {
    let mut minutes = Vec::with_capacity(year.total_minutes());
    for day in 0..year.days {
        let month = year.month(day);
        let monthly = tables.monthly[month as usize - 1];
        let day_of_month = day_of_month(year, day);
        for minute in 0..MINUTES_PER_DAY {
            let hour = minute / 60;
            let mut value = tables.hourly[hour] * monthly;
            if let Some(h) = holiday {
                if hour >= 17 && in_holiday_window(h, month, day_of_month) {
                    value *= h.evening_boost;
                }
            }
            minutes.push(value);
        }
    }
    minutes
}

fn day_of_month(year: &SimYear, day: usize) -> u32 {
    use chrono::{Datelike, NaiveDate};
    NaiveDate::from_yo_opt(year.year, day as u32 + 1)
        .map(|d| d.day())
        .unwrap_or(1)
}

/// Pull each day's shape toward its own minimum by the fraction of occupants
/// away or asleep at that minute. Full presence keeps the shape; an empty
/// house decays to the daily baseline, never to zero.
pub fn scale_by_presence(minutes: &mut [f64], inactive_fraction: &[f64], year: &SimYear) {
    for day in 0..year.days {
        let range = day * MINUTES_PER_DAY..(day + 1) * MINUTES_PER_DAY;
        let day_min = minutes[range.clone()]
            .iter()
            .cloned()
            .fold(f64::INFINITY, f64::min);
        for (value, inactive) in izip!(&mut minutes[range.clone()], &inactive_fraction[range]) {
            *value = day_min + (*value - day_min) * (1.0 - inactive);
        }
    }
}
