//! # occupant-schedules
//!
//! Synthetic occupant-behavior and end-use schedule generator for residential
//! building simulation. Given a building's occupant count, location and a
//! library of survey-derived probability tables, it produces a full year of
//! timestep-resolution, peak-normalized schedules: occupancy, sleep, water
//! fixtures, appliance power, lighting, plug loads and ceiling fans, plus a
//! 0/1 vacancy column. The whole run is deterministic in the building seed.

pub mod config;
pub mod domain;
pub mod error;
pub mod export;
pub mod library;
pub mod rng;
pub mod simulation;
pub mod telemetry;

#[doc(hidden)]
pub mod testing;

pub use config::Config;
pub use domain::{EndUse, GeneratorState, OccupantState, Schedule};
pub use error::ScheduleError;
pub use library::DistributionLibrary;
pub use simulation::ScheduleGenerator;
