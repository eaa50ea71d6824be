use crate::error::{Result, ScheduleError};
use crate::rng::BuildingRng;

/// An immutable (values, probabilities) pair.
///
/// For rank-indexed tables the values are implied by position
/// (see [`DistributionTable::from_probabilities`]). Probabilities are
/// validated non-negative at construction but are NOT required to sum to 1:
/// the survey-derived tables sometimes under-sum, and sampling falls back to
/// the last index when the draw exceeds the cumulative total.
#[derive(Debug, Clone)]
pub struct DistributionTable {
    name: String,
    values: Vec<f64>,
    probabilities: Vec<f64>,
}

impl DistributionTable {
    pub fn new(name: impl Into<String>, values: Vec<f64>, probabilities: Vec<f64>) -> Result<Self> {
        let name = name.into();
        if values.len() != probabilities.len() {
            return Err(ScheduleError::InvalidLength {
                name,
                expected: values.len(),
                actual: probabilities.len(),
            });
        }
        Self::check(&name, &probabilities)?;
        Ok(Self {
            name,
            values,
            probabilities,
        })
    }

    /// Rank-indexed table: outcome `i` has value `i + 1` (e.g. "1 event",
    /// "2 slots").
    pub fn from_probabilities(name: impl Into<String>, probabilities: Vec<f64>) -> Result<Self> {
        let values = (1..=probabilities.len()).map(|v| v as f64).collect();
        Self::new(name, values, probabilities)
    }

    fn check(name: &str, probabilities: &[f64]) -> Result<()> {
        if probabilities.is_empty() {
            return Err(ScheduleError::EmptyDistribution {
                name: name.to_string(),
            });
        }
        for (index, &value) in probabilities.iter().enumerate() {
            if value < 0.0 || !value.is_finite() {
                return Err(ScheduleError::InvalidProbability {
                    name: name.to_string(),
                    index,
                    value,
                });
            }
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    pub fn sample_index(&self, rng: &mut BuildingRng) -> usize {
        rng.weighted(&self.probabilities)
    }

    pub fn sample_value(&self, rng: &mut BuildingRng) -> f64 {
        self.values[self.sample_index(rng)]
    }
}

/// One behavior cluster's Markov data for one day type: the initial-state
/// vector and one 7x7 stochastic matrix per 15-minute slot.
#[derive(Debug, Clone)]
pub struct MarkovTables {
    initial: Vec<f64>,
    /// `transitions[slot][from_state]` is a 7-entry probability row.
    transitions: Vec<Vec<Vec<f64>>>,
}

impl MarkovTables {
    pub fn new(name: &str, initial: Vec<f64>, transitions: Vec<Vec<Vec<f64>>>) -> Result<Self> {
        use crate::domain::{SLOTS_PER_DAY, STATE_COUNT};

        if initial.len() != STATE_COUNT {
            return Err(ScheduleError::InvalidLength {
                name: format!("{name} initial-state vector"),
                expected: STATE_COUNT,
                actual: initial.len(),
            });
        }
        if transitions.len() != SLOTS_PER_DAY {
            return Err(ScheduleError::InvalidLength {
                name: format!("{name} transition slots"),
                expected: SLOTS_PER_DAY,
                actual: transitions.len(),
            });
        }
        for (slot, matrix) in transitions.iter().enumerate() {
            if matrix.len() != STATE_COUNT {
                return Err(ScheduleError::InvalidLength {
                    name: format!("{name} slot {slot} matrix"),
                    expected: STATE_COUNT,
                    actual: matrix.len(),
                });
            }
            for (from, row) in matrix.iter().enumerate() {
                if row.len() != STATE_COUNT {
                    return Err(ScheduleError::InvalidLength {
                        name: format!("{name} slot {slot} row {from}"),
                        expected: STATE_COUNT,
                        actual: row.len(),
                    });
                }
                let sum: f64 = row.iter().sum();
                if (sum - 1.0).abs() > 1e-3 {
                    return Err(ScheduleError::InvalidProbability {
                        name: format!("{name} slot {slot} row {from} (sum {sum})"),
                        index: from,
                        value: sum,
                    });
                }
            }
        }
        Ok(Self {
            initial,
            transitions,
        })
    }

    pub fn initial(&self) -> &[f64] {
        &self.initial
    }

    /// The transition row for the just-exited state at a slot. Exactly one
    /// occupant state is active at a time, so the one-hot-vector x matrix
    /// multiply reduces to this row lookup.
    pub fn transition_row(&self, slot_of_day: usize, from_state: usize) -> &[f64] {
        &self.transitions[slot_of_day][from_state]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SLOTS_PER_DAY, STATE_COUNT};

    fn uniform_matrix() -> Vec<Vec<f64>> {
        vec![vec![1.0 / STATE_COUNT as f64; STATE_COUNT]; STATE_COUNT]
    }

    #[test]
    fn negative_probability_rejected() {
        let err = DistributionTable::from_probabilities("bad", vec![0.5, -0.1]);
        assert!(matches!(err, Err(ScheduleError::InvalidProbability { index: 1, .. })));
    }

    #[test]
    fn empty_distribution_rejected() {
        assert!(matches!(
            DistributionTable::from_probabilities("empty", vec![]),
            Err(ScheduleError::EmptyDistribution { .. })
        ));
    }

    #[test]
    fn rank_indexed_values_start_at_one() {
        let table = DistributionTable::from_probabilities("ranks", vec![0.3, 0.7]).unwrap();
        let mut rng = BuildingRng::new(1);
        for _ in 0..50 {
            let value = table.sample_value(&mut rng);
            assert!(value == 1.0 || value == 2.0);
        }
    }

    #[test]
    fn markov_shape_is_enforced() {
        let bad = MarkovTables::new(
            "short",
            vec![1.0; STATE_COUNT],
            vec![uniform_matrix(); SLOTS_PER_DAY - 1],
        );
        assert!(bad.is_err());

        let ok = MarkovTables::new(
            "full",
            vec![1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            vec![uniform_matrix(); SLOTS_PER_DAY],
        );
        assert!(ok.is_ok());
    }

    #[test]
    fn non_stochastic_row_rejected() {
        let mut matrix = uniform_matrix();
        matrix[3] = vec![0.5; STATE_COUNT]; // sums to 3.5
        let mut transitions = vec![uniform_matrix(); SLOTS_PER_DAY];
        transitions[10] = matrix;
        let err = MarkovTables::new("bad", vec![1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0], transitions);
        assert!(err.is_err());
    }
}
