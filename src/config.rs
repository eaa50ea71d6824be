use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;

use crate::error::ScheduleError;

/// Full generator configuration, layered from a TOML document and
/// `SCHEDGEN__`-prefixed environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub building: BuildingConfig,
    pub resources: ResourcesConfig,
    pub activities: ActivitiesConfig,
    pub shapers: ShapersConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BuildingConfig {
    /// Per-building seed; the whole run is deterministic in it.
    pub seed: u64,
    pub occupants: usize,
    /// Two-letter region code for the monthly shift lookup.
    pub state_code: String,
    pub year: i32,
    pub timestep_minutes: usize,
    pub latitude: f64,
    pub longitude: f64,
    /// Hours from UTC.
    pub timezone_offset: i32,
    pub vacancy: Option<VacancyWindow>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct VacancyWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResourcesConfig {
    /// Distribution Library directory (see `library::loader` for the layout).
    pub dir: PathBuf,
    /// Destination for the schedule export.
    pub output: PathBuf,
}

/// Gaussian flow/power parameters, sampled once per building.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct GaussianParams {
    pub mean: f64,
    pub std_dev: f64,
    pub floor: Option<f64>,
}

/// Sink: clusters placed from a fixed annual total.
#[derive(Debug, Clone, Deserialize)]
pub struct SinkConfig {
    pub hourly_onset: Vec<f64>,
    pub monthly_multiplier: Vec<f64>,
    pub inter_event_gap_minutes: usize,
    pub flow: GaussianParams,
    pub annual_clusters: usize,
}

/// Shower/bath: clusters driven by the showering state.
#[derive(Debug, Clone, Deserialize)]
pub struct ShowerConfig {
    pub hourly_onset: Vec<f64>,
    pub monthly_multiplier: Vec<f64>,
    pub inter_event_gap_minutes: usize,
    pub flow: GaussianParams,
    /// Probability that a showering block is a bath instead.
    pub bath_probability: f64,
    pub bath_flow: GaussianParams,
}

/// Dishwasher/clothes washer: water draw plus a power track.
#[derive(Debug, Clone, Deserialize)]
pub struct ApplianceConfig {
    pub hourly_onset: Vec<f64>,
    pub monthly_multiplier: Vec<f64>,
    pub inter_event_gap_minutes: usize,
    pub flow: GaussianParams,
    pub power: GaussianParams,
}

/// Clothes dryer/cooking range: power track only.
#[derive(Debug, Clone, Deserialize)]
pub struct PowerConfig {
    pub hourly_onset: Vec<f64>,
    pub monthly_multiplier: Vec<f64>,
    pub inter_event_gap_minutes: usize,
    pub power: GaussianParams,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActivitiesConfig {
    pub sink: SinkConfig,
    pub shower: ShowerConfig,
    pub dishwasher: ApplianceConfig,
    pub clothes_washer: ApplianceConfig,
    pub clothes_dryer: PowerConfig,
    pub cooking_range: PowerConfig,
}

/// Hour-of-day x month multiplier tables for the simple shapers.
#[derive(Debug, Clone, Deserialize)]
pub struct ShapeTables {
    pub hourly: Vec<f64>,
    pub monthly: Vec<f64>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct HolidayLighting {
    pub start_month: u32,
    pub start_day: u32,
    pub end_month: u32,
    pub end_day: u32,
    /// Multiplier applied to exterior lighting evenings inside the window.
    pub evening_boost: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShapersConfig {
    pub lighting_exterior: ShapeTables,
    pub plug_loads: ShapeTables,
    pub ceiling_fan: ShapeTables,
    pub holiday_lighting: Option<HolidayLighting>,
}

fn check_len(name: &str, values: &[f64], expected: usize) -> Result<(), ScheduleError> {
    if values.len() != expected {
        return Err(ScheduleError::InvalidLength {
            name: name.to_string(),
            expected,
            actual: values.len(),
        });
    }
    Ok(())
}

impl Config {
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Toml::file("config/default.toml"))
            .merge(Env::prefixed("SCHEDGEN__").split("__"));
        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(document: &str) -> Result<Self> {
        let config: Config = Figment::new().merge(Toml::string(document)).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Fixed-length and range validation. Runs before any generation, so a
    /// bad table aborts with no partial output.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        let b = &self.building;
        if b.occupants == 0 {
            return Err(ScheduleError::InvalidConfig("occupants must be >= 1".into()));
        }
        if b.state_code.len() != 2 {
            return Err(ScheduleError::InvalidConfig(format!(
                "state_code must be two letters, got {:?}",
                b.state_code
            )));
        }
        if b.timestep_minutes == 0 || 1440 % b.timestep_minutes != 0 {
            return Err(ScheduleError::InvalidConfig(format!(
                "timestep_minutes must divide 1440, got {}",
                b.timestep_minutes
            )));
        }
        if let Some(window) = &b.vacancy {
            if window.end < window.start {
                return Err(ScheduleError::InvalidConfig(
                    "vacancy end precedes start".into(),
                ));
            }
        }

        let a = &self.activities;
        for (name, hourly, monthly) in [
            ("sink", &a.sink.hourly_onset, &a.sink.monthly_multiplier),
            ("shower", &a.shower.hourly_onset, &a.shower.monthly_multiplier),
            ("dishwasher", &a.dishwasher.hourly_onset, &a.dishwasher.monthly_multiplier),
            ("clothes_washer", &a.clothes_washer.hourly_onset, &a.clothes_washer.monthly_multiplier),
            ("clothes_dryer", &a.clothes_dryer.hourly_onset, &a.clothes_dryer.monthly_multiplier),
            ("cooking_range", &a.cooking_range.hourly_onset, &a.cooking_range.monthly_multiplier),
        ] {
            check_len(&format!("{name}.hourly_onset"), hourly, 24)?;
            check_len(&format!("{name}.monthly_multiplier"), monthly, 12)?;
        }
        if !(0.0..=1.0).contains(&a.shower.bath_probability) {
            return Err(ScheduleError::InvalidConfig(format!(
                "shower.bath_probability must be in [0,1], got {}",
                a.shower.bath_probability
            )));
        }

        let s = &self.shapers;
        for (name, tables) in [
            ("lighting_exterior", &s.lighting_exterior),
            ("plug_loads", &s.plug_loads),
            ("ceiling_fan", &s.ceiling_fan),
        ] {
            check_len(&format!("{name}.hourly"), &tables.hourly, 24)?;
            check_len(&format!("{name}.monthly"), &tables.monthly, 12)?;
        }
        Ok(())
    }
}
