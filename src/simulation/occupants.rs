//! # Markov Chain Occupant Simulator
//!
//! Walks each occupant through the year in 15-minute slots. A state is
//! sampled, held for a sampled activity duration, and the chain then advances
//! through the transition row of the just-exited state. The survey data is
//! anchored at 4 a.m., so the finished year sequence is rotated by 16 slots
//! to midnight anchor.

use tracing::{debug, info};

use crate::domain::{
    OccupantState, SimYear, TimeBucket, DAY_ANCHOR_SLOTS, MINUTES_PER_SLOT, SLOTS_PER_DAY,
    STATE_COUNT,
};
use crate::error::Result;
use crate::library::{DistributionLibrary, DurationKey};
use crate::rng::BuildingRng;

/// Per-occupant state sequences for the simulated year.
pub struct OccupantModel {
    /// `sequences[occupant][year_slot]` = active state index.
    sequences: Vec<Vec<u8>>,
    clusters: Vec<usize>,
    total_slots: usize,
}

impl OccupantModel {
    pub fn simulate(
        library: &DistributionLibrary,
        year: &SimYear,
        occupants: usize,
        rng: &mut BuildingRng,
    ) -> Result<Self> {
        let total_slots = year.total_slots();
        let mut sequences = Vec::with_capacity(occupants);
        let mut clusters = Vec::with_capacity(occupants);

        for occupant in 0..occupants {
            let cluster = rng.weighted(&library.cluster_probabilities);
            clusters.push(cluster);
            debug!(occupant, cluster, "behavior cluster assigned");

            let mut sequence = Vec::with_capacity(total_slots);
            for day in 0..year.days {
                let day_type = year.day_type(day);
                let tables = library.markov(cluster, day_type)?;
                let mut probabilities = tables.initial().to_vec();
                let mut slot = 0usize;

                while slot < SLOTS_PER_DAY {
                    let state_index = rng.weighted(&probabilities);
                    let state = OccupantState::from_index(state_index)
                        .unwrap_or(OccupantState::NothingAtHome);

                    let key = DurationKey {
                        cluster,
                        activity: state,
                        day_type,
                        bucket: TimeBucket::from_slot(slot),
                    };
                    let duration_slots = library.activity_duration(key)?.sample_value(rng) as usize;

                    // Hold the state without re-sampling; the day budget caps it.
                    let held = duration_slots.max(1).min(SLOTS_PER_DAY - slot);
                    for _ in 0..held {
                        sequence.push(state_index as u8);
                    }
                    slot += held;

                    if slot < SLOTS_PER_DAY {
                        probabilities = tables.transition_row(slot, state_index).to_vec();
                    }
                }
            }

            // 4 a.m. anchor -> midnight anchor. Load-bearing constant.
            sequence.rotate_right(DAY_ANCHOR_SLOTS);
            sequences.push(sequence);
        }

        info!(occupants, slots = total_slots, "occupant state sequences simulated");
        Ok(Self {
            sequences,
            clusters,
            total_slots,
        })
    }

    pub fn occupants(&self) -> usize {
        self.sequences.len()
    }

    pub fn clusters(&self) -> &[usize] {
        &self.clusters
    }

    pub fn total_slots(&self) -> usize {
        self.total_slots
    }

    pub fn state_at(&self, occupant: usize, slot: usize) -> OccupantState {
        OccupantState::from_index(self.sequences[occupant][slot] as usize)
            .unwrap_or(OccupantState::NothingAtHome)
    }

    /// One-hot 7-vector for an occupant-slot. Exactly one entry is 1.
    pub fn one_hot(&self, occupant: usize, slot: usize) -> [f64; STATE_COUNT] {
        let mut vector = [0.0; STATE_COUNT];
        vector[self.sequences[occupant][slot] as usize] = 1.0;
        vector
    }

    /// Per-slot mask: true when at least one occupant is in `state`.
    pub fn any_in_state(&self, state: OccupantState) -> Vec<bool> {
        let target = state.index() as u8;
        let mut mask = vec![false; self.total_slots];
        for sequence in &self.sequences {
            for (slot, &s) in sequence.iter().enumerate() {
                if s == target {
                    mask[slot] = true;
                }
            }
        }
        mask
    }

    /// Minute-resolution fraction of occupants currently in any of `states`.
    pub fn fraction_in_states(&self, states: &[OccupantState]) -> Vec<f64> {
        let targets: Vec<u8> = states.iter().map(|s| s.index() as u8).collect();
        let occupants = self.sequences.len() as f64;
        let mut minutes = Vec::with_capacity(self.total_slots * MINUTES_PER_SLOT);
        for slot in 0..self.total_slots {
            let count = self
                .sequences
                .iter()
                .filter(|seq| targets.contains(&seq[slot]))
                .count() as f64;
            let fraction = count / occupants;
            for _ in 0..MINUTES_PER_SLOT {
                minutes.push(fraction);
            }
        }
        minutes
    }

    /// Minute-resolution fraction of occupants at home (not absent).
    pub fn presence_fraction(&self) -> Vec<f64> {
        let mut minutes = self.fraction_in_states(&[OccupantState::Absent]);
        for value in minutes.iter_mut() {
            *value = 1.0 - *value;
        }
        minutes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{pinned_library, synthetic_library};

    #[test]
    fn every_slot_has_exactly_one_active_state() {
        let library = synthetic_library(2);
        let year = SimYear::new(2019);
        let mut rng = BuildingRng::new(11);
        let model = OccupantModel::simulate(&library, &year, 3, &mut rng).unwrap();

        assert_eq!(model.total_slots(), 365 * SLOTS_PER_DAY);
        for occupant in 0..model.occupants() {
            for slot in 0..model.total_slots() {
                let sum: f64 = model.one_hot(occupant, slot).iter().sum();
                assert_eq!(sum, 1.0);
            }
        }
    }

    #[test]
    fn pinned_chain_stays_in_one_state() {
        let library = pinned_library(OccupantState::NothingAtHome);
        let year = SimYear::new(2019);
        let mut rng = BuildingRng::new(5);
        let model = OccupantModel::simulate(&library, &year, 1, &mut rng).unwrap();

        for slot in 0..model.total_slots() {
            assert_eq!(model.state_at(0, slot), OccupantState::NothingAtHome);
        }
        assert!(model.any_in_state(OccupantState::NothingAtHome).iter().all(|&m| m));
        assert!(model.any_in_state(OccupantState::Cooking).iter().all(|&m| !m));
    }

    #[test]
    fn leap_year_sequences_are_longer() {
        let library = synthetic_library(1);
        let mut rng = BuildingRng::new(1);
        let model =
            OccupantModel::simulate(&library, &SimYear::new(2020), 1, &mut rng).unwrap();
        assert_eq!(model.total_slots(), 366 * SLOTS_PER_DAY);
    }

    #[test]
    fn simulation_is_deterministic_per_seed() {
        let library = synthetic_library(3);
        let year = SimYear::new(2019);
        let mut rng_a = BuildingRng::new(99);
        let mut rng_b = BuildingRng::new(99);
        let a = OccupantModel::simulate(&library, &year, 2, &mut rng_a).unwrap();
        let b = OccupantModel::simulate(&library, &year, 2, &mut rng_b).unwrap();
        assert_eq!(a.sequences, b.sequences);
        assert_eq!(a.clusters(), b.clusters());
    }

    #[test]
    fn presence_complements_absence() {
        let library = pinned_library(OccupantState::Absent);
        let year = SimYear::new(2019);
        let mut rng = BuildingRng::new(3);
        let model = OccupantModel::simulate(&library, &year, 2, &mut rng).unwrap();
        assert!(model.presence_fraction().iter().all(|&v| v == 0.0));
    }
}
