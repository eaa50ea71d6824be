//! Vacancy post-processing: a 0/1 series over the caller's timestep grid,
//! multiplied into the finished schedules after normalization. The
//! synthesizers themselves never see the window.

use chrono::Datelike;
use tracing::info;

use crate::config::VacancyWindow;
use crate::domain::{SimYear, MINUTES_PER_DAY};

/// Build the vacancy series: 1.0 for every timestep whose day falls inside
/// the window (inclusive on both ends), 0.0 elsewhere. Days outside the
/// simulated year are clipped.
pub fn vacancy_series(
    year: &SimYear,
    window: Option<&VacancyWindow>,
    timestep_minutes: usize,
) -> Vec<f64> {
    let steps_per_day = MINUTES_PER_DAY / timestep_minutes;
    let mut series = vec![0.0; year.days * steps_per_day];

    let Some(window) = window else {
        return series;
    };
    // Intersect the window with the simulated year; a window that misses the
    // year entirely marks nothing.
    if window.end.year() < year.year || window.start.year() > year.year {
        return series;
    }
    let first = year.day_of(window.start).unwrap_or(0);
    let last = year
        .day_of(window.end)
        .unwrap_or(year.days.saturating_sub(1));
    if first > last {
        return series;
    }
    for value in &mut series[first * steps_per_day..(last + 1) * steps_per_day] {
        *value = 1.0;
    }
    info!(%window.start, %window.end, "vacancy window applied");
    series
}
