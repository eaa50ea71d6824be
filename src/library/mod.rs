//! # Distribution Library
//!
//! The immutable probability tables behind the generator: behavior-cluster
//! weights, Markov initial/transition tables, activity-duration distributions,
//! per-end-use event distributions, and the monthly shift lookup. Loaded once
//! (from CSV files, see [`loader`]) and shared read-only across building runs.
//!
//! Lookups use typed composite keys, and every key combination the simulator
//! can ask for is validated present at load time, so a missing table fails at
//! startup rather than mid-simulation.

pub mod loader;
pub mod tables;

use std::collections::HashMap;

use strum::IntoEnumIterator;

use crate::domain::{DayType, EndUse, OccupantState, TimeBucket};
use crate::error::{Result, ScheduleError};

pub use tables::{DistributionTable, MarkovTables};

/// Key for activity-duration distributions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DurationKey {
    pub cluster: usize,
    pub activity: OccupantState,
    pub day_type: DayType,
    pub bucket: TimeBucket,
}

/// Key for the monthly lead/lag shift lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShiftKey {
    pub state_code: String,
    pub month: u32,
    pub day_type: DayType,
}

/// End uses that carry an event-duration distribution (values in minutes).
pub const EVENT_DURATION_USES: [EndUse; 5] = [
    EndUse::Sink,
    EndUse::Shower,
    EndUse::Bath,
    EndUse::HotWaterDishwasher,
    EndUse::HotWaterClothesWasher,
];

/// End uses that carry a cluster-size distribution.
pub const CLUSTER_SIZE_USES: [EndUse; 2] = [EndUse::Sink, EndUse::Shower];

/// End uses synthesized as power tracks with their own duration distribution.
pub const POWER_TRACK_USES: [EndUse; 4] = [
    EndUse::Dishwasher,
    EndUse::ClothesWasher,
    EndUse::ClothesDryer,
    EndUse::CookingRange,
];

#[derive(Debug, Clone, Default)]
pub struct DistributionLibrary {
    /// Weight of each behavior cluster; an occupant's cluster id is sampled
    /// from this once, at the start of a run.
    pub cluster_probabilities: Vec<f64>,
    pub markov: HashMap<(usize, DayType), MarkovTables>,
    pub activity_durations: HashMap<DurationKey, DistributionTable>,
    pub event_durations: HashMap<EndUse, DistributionTable>,
    pub cluster_sizes: HashMap<EndUse, DistributionTable>,
    pub power_durations: HashMap<EndUse, DistributionTable>,
    pub monthly_shifts: HashMap<ShiftKey, i32>,
}

impl DistributionLibrary {
    pub fn cluster_count(&self) -> usize {
        self.cluster_probabilities.len()
    }

    pub fn markov(&self, cluster: usize, day_type: DayType) -> Result<&MarkovTables> {
        self.markov
            .get(&(cluster, day_type))
            .ok_or_else(|| ScheduleError::MissingTable(format!("markov cluster {cluster} {day_type}")))
    }

    pub fn activity_duration(&self, key: DurationKey) -> Result<&DistributionTable> {
        self.activity_durations.get(&key).ok_or_else(|| {
            ScheduleError::MissingTable(format!(
                "duration cluster {} {} {} {}",
                key.cluster, key.activity, key.day_type, key.bucket
            ))
        })
    }

    pub fn event_duration(&self, end_use: EndUse) -> Result<&DistributionTable> {
        self.event_durations
            .get(&end_use)
            .ok_or_else(|| ScheduleError::MissingTable(format!("event duration {end_use}")))
    }

    pub fn cluster_size(&self, end_use: EndUse) -> Result<&DistributionTable> {
        self.cluster_sizes
            .get(&end_use)
            .ok_or_else(|| ScheduleError::MissingTable(format!("cluster size {end_use}")))
    }

    pub fn power_duration(&self, end_use: EndUse) -> Result<&DistributionTable> {
        self.power_durations
            .get(&end_use)
            .ok_or_else(|| ScheduleError::MissingTable(format!("power duration {end_use}")))
    }

    pub fn shift_minutes(&self, state_code: &str, month: u32, day_type: DayType) -> i32 {
        self.monthly_shifts
            .get(&ShiftKey {
                state_code: state_code.to_string(),
                month,
                day_type,
            })
            .copied()
            .unwrap_or(0)
    }

    /// Startup completeness check: every composite key the simulator can
    /// build must resolve. Also verifies the shift lookup knows the
    /// configured region.
    pub fn validate(&self, state_code: &str) -> Result<()> {
        if self.cluster_probabilities.is_empty() {
            return Err(ScheduleError::EmptyDistribution {
                name: "cluster probabilities".into(),
            });
        }
        for cluster in 0..self.cluster_count() {
            for day_type in DayType::iter() {
                self.markov(cluster, day_type)?;
                for activity in OccupantState::iter() {
                    for bucket in TimeBucket::iter() {
                        self.activity_duration(DurationKey {
                            cluster,
                            activity,
                            day_type,
                            bucket,
                        })?;
                    }
                }
            }
        }
        for end_use in EVENT_DURATION_USES {
            self.event_duration(end_use)?;
        }
        for end_use in CLUSTER_SIZE_USES {
            self.cluster_size(end_use)?;
        }
        for end_use in POWER_TRACK_USES {
            self.power_duration(end_use)?;
        }
        for month in 1..=12 {
            for day_type in DayType::iter() {
                let key = ShiftKey {
                    state_code: state_code.to_string(),
                    month,
                    day_type,
                };
                if !self.monthly_shifts.contains_key(&key) {
                    return Err(ScheduleError::MissingTable(format!(
                        "monthly shift {state_code} month {month} {day_type}"
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::synthetic_library;

    #[test]
    fn synthetic_library_validates() {
        let library = synthetic_library(2);
        assert!(library.validate("CO").is_ok());
    }

    #[test]
    fn missing_region_fails_validation() {
        let library = synthetic_library(1);
        let err = library.validate("ZZ").unwrap_err();
        assert!(matches!(err, ScheduleError::MissingTable(_)));
    }

    #[test]
    fn missing_duration_key_fails_validation() {
        let mut library = synthetic_library(1);
        let key = DurationKey {
            cluster: 0,
            activity: OccupantState::Cooking,
            day_type: DayType::Weekend,
            bucket: TimeBucket::Evening,
        };
        library.activity_durations.remove(&key);
        assert!(library.validate("CO").is_err());
    }

    #[test]
    fn unknown_shift_entry_defaults_to_zero() {
        let library = synthetic_library(1);
        assert_eq!(library.shift_minutes("XX", 1, DayType::Weekday), 0);
    }
}
