use serde::{Deserialize, Serialize};

use super::types::EndUse;

/// One exported, peak-normalized series at the caller's timestep resolution.
///
/// Immutable once the run finishes; only the vacancy post-processor touches
/// exported values, via [`GeneratorState::apply_vacancy`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub end_use: EndUse,
    pub values: Vec<f64>,
}

impl Schedule {
    pub fn new(end_use: EndUse, values: Vec<f64>) -> Self {
        Self { end_use, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn peak(&self) -> f64 {
        self.values.iter().cloned().fold(0.0, f64::max)
    }
}

/// The owned result of one generator run.
///
/// There is no ambient global state anywhere in the crate: everything the run
/// produced lives here, in export column order, alongside the 0/1 vacancy
/// series.
#[derive(Debug, Clone)]
pub struct GeneratorState {
    pub timestep_minutes: usize,
    pub schedules: Vec<Schedule>,
    pub vacancy: Vec<f64>,
}

impl GeneratorState {
    pub fn new(timestep_minutes: usize, timesteps: usize) -> Self {
        Self {
            timestep_minutes,
            schedules: Vec::new(),
            vacancy: vec![0.0; timesteps],
        }
    }

    pub fn push(&mut self, schedule: Schedule) {
        self.schedules.push(schedule);
    }

    pub fn get(&self, end_use: EndUse) -> Option<&Schedule> {
        self.schedules.iter().find(|s| s.end_use == end_use)
    }

    /// Number of timesteps in the exported year.
    pub fn timesteps(&self) -> usize {
        self.vacancy.len()
    }

    /// Multiply every activity-driven schedule by `(1 - vacancy)`.
    ///
    /// Pure post-processing over the normalized output; the synthesizers
    /// themselves never see the vacancy window.
    pub fn apply_vacancy(&mut self) {
        for schedule in &mut self.schedules {
            for (value, vacant) in schedule.values.iter_mut().zip(&self.vacancy) {
                *value *= 1.0 - vacant;
            }
        }
    }
}
