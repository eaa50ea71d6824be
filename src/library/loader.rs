//! CSV loading for the Distribution Library.
//!
//! Expected layout under the resource directory:
//!
//! ```text
//! cluster_probabilities.csv                          one probability per row
//! markov/cluster{c}_{day_type}_initial.csv           7 rows, one value each
//! markov/cluster{c}_{day_type}_transitions.csv       672 rows x 7 columns
//!                                                    (row = slot*7 + from-state)
//! durations/cluster{c}_{activity}_{day_type}_{bucket}.csv
//!                                                    one probability per row,
//!                                                    outcome rank = slot count
//! events/{end_use}_duration_probability.csv          seconds,probability
//! events/{end_use}_cluster_size_probability.csv      one probability per row
//! power/{end_use}_duration_probability.csv           minutes,probability
//! monthly_shifts.csv                                 state_code,month,day_type,
//!                                                    shift_minutes (with header)
//! ```
//!
//! Any absent or unparsable file aborts the load; there is no partial library.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use strum::IntoEnumIterator;
use tracing::info;

use crate::domain::{DayType, OccupantState, TimeBucket, SLOTS_PER_DAY, STATE_COUNT};
use crate::error::{Result, ScheduleError};

use super::{
    DistributionLibrary, DistributionTable, DurationKey, MarkovTables, ShiftKey,
    CLUSTER_SIZE_USES, EVENT_DURATION_USES, POWER_TRACK_USES,
};

fn resource_error(path: &Path, message: impl Into<String>) -> ScheduleError {
    ScheduleError::Resource {
        path: path.display().to_string(),
        message: message.into(),
    }
}

fn open(path: &Path) -> Result<csv::Reader<std::fs::File>> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(false)
        .from_path(path)
        .map_err(|e| resource_error(path, e.to_string()))
}

fn parse_field(path: &Path, field: &str) -> Result<f64> {
    field
        .trim()
        .parse::<f64>()
        .map_err(|e| resource_error(path, format!("bad number {field:?}: {e}")))
}

/// Single-column file of floats.
fn read_column(path: &Path) -> Result<Vec<f64>> {
    let mut reader = open(path)?;
    let mut values = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| ScheduleError::Csv {
            path: path.display().to_string(),
            source,
        })?;
        let field = record
            .get(0)
            .ok_or_else(|| resource_error(path, "empty row"))?;
        values.push(parse_field(path, field)?);
    }
    Ok(values)
}

/// Fixed-width file of float rows.
fn read_rows(path: &Path, columns: usize) -> Result<Vec<Vec<f64>>> {
    let mut reader = open(path)?;
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| ScheduleError::Csv {
            path: path.display().to_string(),
            source,
        })?;
        if record.len() != columns {
            return Err(ScheduleError::InvalidLength {
                name: path.display().to_string(),
                expected: columns,
                actual: record.len(),
            });
        }
        let mut row = Vec::with_capacity(columns);
        for field in record.iter() {
            row.push(parse_field(path, field)?);
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Two-column (value, probability) file.
fn read_pairs(path: &Path) -> Result<(Vec<f64>, Vec<f64>)> {
    let rows = read_rows(path, 2)?;
    let values = rows.iter().map(|r| r[0]).collect();
    let probabilities = rows.iter().map(|r| r[1]).collect();
    Ok((values, probabilities))
}

fn markov_tables(dir: &Path, cluster: usize, day_type: DayType) -> Result<MarkovTables> {
    let initial_path = dir.join(format!("markov/cluster{cluster}_{day_type}_initial.csv"));
    let initial = read_column(&initial_path)?;

    let transition_path = dir.join(format!("markov/cluster{cluster}_{day_type}_transitions.csv"));
    let rows = read_rows(&transition_path, STATE_COUNT)?;
    if rows.len() != SLOTS_PER_DAY * STATE_COUNT {
        return Err(ScheduleError::InvalidLength {
            name: transition_path.display().to_string(),
            expected: SLOTS_PER_DAY * STATE_COUNT,
            actual: rows.len(),
        });
    }
    let transitions: Vec<Vec<Vec<f64>>> = rows
        .chunks(STATE_COUNT)
        .map(|chunk| chunk.to_vec())
        .collect();

    MarkovTables::new(
        &format!("cluster {cluster} {day_type}"),
        initial,
        transitions,
    )
}

#[derive(Debug, Deserialize)]
struct ShiftRecord {
    state_code: String,
    month: u32,
    day_type: DayType,
    shift_minutes: i32,
}

fn monthly_shifts(path: &Path) -> Result<std::collections::HashMap<ShiftKey, i32>> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| resource_error(path, e.to_string()))?;
    let mut shifts = std::collections::HashMap::new();
    for record in reader.deserialize::<ShiftRecord>() {
        let record = record.map_err(|source| ScheduleError::Csv {
            path: path.display().to_string(),
            source,
        })?;
        if !(1..=12).contains(&record.month) {
            return Err(resource_error(path, format!("month {} out of range", record.month)));
        }
        shifts.insert(
            ShiftKey {
                state_code: record.state_code,
                month: record.month,
                day_type: record.day_type,
            },
            record.shift_minutes,
        );
    }
    Ok(shifts)
}

/// Event-duration values are recorded in seconds in the survey data; the
/// synthesizers stamp whole minutes.
fn seconds_to_minutes(values: Vec<f64>) -> Vec<f64> {
    values
        .into_iter()
        .map(|s| (s / 60.0).round().max(1.0))
        .collect()
}

impl DistributionLibrary {
    /// Load and validate the full library from a resource directory.
    pub fn load(dir: impl AsRef<Path>, state_code: &str) -> Result<Self> {
        let dir: PathBuf = dir.as_ref().to_path_buf();

        let cluster_probabilities = read_column(&dir.join("cluster_probabilities.csv"))?;
        let clusters = cluster_probabilities.len();

        let mut library = DistributionLibrary {
            cluster_probabilities,
            ..Default::default()
        };

        for cluster in 0..clusters {
            for day_type in DayType::iter() {
                let tables = markov_tables(&dir, cluster, day_type)?;
                library.markov.insert((cluster, day_type), tables);

                for activity in OccupantState::iter() {
                    for bucket in TimeBucket::iter() {
                        let path = dir.join(format!(
                            "durations/cluster{cluster}_{activity}_{day_type}_{bucket}.csv"
                        ));
                        let probabilities = read_column(&path)?;
                        let table = DistributionTable::from_probabilities(
                            path.display().to_string(),
                            probabilities,
                        )?;
                        library.activity_durations.insert(
                            DurationKey {
                                cluster,
                                activity,
                                day_type,
                                bucket,
                            },
                            table,
                        );
                    }
                }
            }
        }

        for end_use in EVENT_DURATION_USES {
            let path = dir.join(format!("events/{}_duration_probability.csv", end_use.name()));
            let (seconds, probabilities) = read_pairs(&path)?;
            let table = DistributionTable::new(
                path.display().to_string(),
                seconds_to_minutes(seconds),
                probabilities,
            )?;
            library.event_durations.insert(end_use, table);
        }

        for end_use in CLUSTER_SIZE_USES {
            let path = dir.join(format!(
                "events/{}_cluster_size_probability.csv",
                end_use.name()
            ));
            let probabilities = read_column(&path)?;
            let table =
                DistributionTable::from_probabilities(path.display().to_string(), probabilities)?;
            library.cluster_sizes.insert(end_use, table);
        }

        for end_use in POWER_TRACK_USES {
            let path = dir.join(format!("power/{}_duration_probability.csv", end_use.name()));
            let (minutes, probabilities) = read_pairs(&path)?;
            let table =
                DistributionTable::new(path.display().to_string(), minutes, probabilities)?;
            library.power_durations.insert(end_use, table);
        }

        library.monthly_shifts = monthly_shifts(&dir.join("monthly_shifts.csv"))?;

        library.validate(state_code)?;
        info!(
            clusters,
            duration_tables = library.activity_durations.len(),
            "distribution library loaded"
        );
        Ok(library)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds_round_to_whole_minutes_with_floor_of_one() {
        assert_eq!(seconds_to_minutes(vec![30.0, 60.0, 89.0, 91.0]), vec![1.0, 1.0, 1.0, 2.0]);
    }

    #[test]
    fn missing_directory_is_fatal() {
        let err = DistributionLibrary::load("/nonexistent/resources", "CO").unwrap_err();
        assert!(matches!(err, ScheduleError::Resource { .. }));
    }
}
