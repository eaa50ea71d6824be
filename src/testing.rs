//! Test-support builders: small synthetic distribution libraries so unit and
//! integration tests never depend on resource files on disk.

use std::collections::HashMap;

use strum::IntoEnumIterator;

use crate::domain::{DayType, OccupantState, TimeBucket, SLOTS_PER_DAY, STATE_COUNT};
use crate::library::{
    DistributionLibrary, DistributionTable, DurationKey, MarkovTables, ShiftKey,
    CLUSTER_SIZE_USES, EVENT_DURATION_USES, POWER_TRACK_USES,
};

fn uniform_row() -> Vec<f64> {
    vec![1.0 / STATE_COUNT as f64; STATE_COUNT]
}

fn one_hot(state: OccupantState) -> Vec<f64> {
    let mut row = vec![0.0; STATE_COUNT];
    row[state.index()] = 1.0;
    row
}

fn fill_common(library: &mut DistributionLibrary, clusters: usize) {
    for cluster in 0..clusters {
        for day_type in DayType::iter() {
            for activity in OccupantState::iter() {
                for bucket in TimeBucket::iter() {
                    let key = DurationKey {
                        cluster,
                        activity,
                        day_type,
                        bucket,
                    };
                    let table =
                        DistributionTable::from_probabilities("duration", vec![1.0]).unwrap();
                    library.activity_durations.insert(key, table);
                }
            }
        }
    }
    for end_use in EVENT_DURATION_USES {
        let table = DistributionTable::new(
            format!("{end_use} event duration"),
            vec![1.0, 2.0],
            vec![0.5, 0.5],
        )
        .unwrap();
        library.event_durations.insert(end_use, table);
    }
    for end_use in CLUSTER_SIZE_USES {
        let table = DistributionTable::from_probabilities(
            format!("{end_use} cluster size"),
            vec![1.0],
        )
        .unwrap();
        library.cluster_sizes.insert(end_use, table);
    }
    for end_use in POWER_TRACK_USES {
        let table = DistributionTable::new(
            format!("{end_use} power duration"),
            vec![30.0, 60.0],
            vec![0.5, 0.5],
        )
        .unwrap();
        library.power_durations.insert(end_use, table);
    }
    let mut shifts = HashMap::new();
    for month in 1..=12 {
        for day_type in DayType::iter() {
            shifts.insert(
                ShiftKey {
                    state_code: "CO".into(),
                    month,
                    day_type,
                },
                0,
            );
        }
    }
    library.monthly_shifts = shifts;
}

/// Library with uniform transition rows: any state can follow any state.
pub fn synthetic_library(clusters: usize) -> DistributionLibrary {
    let mut library = DistributionLibrary {
        cluster_probabilities: vec![1.0 / clusters as f64; clusters],
        ..Default::default()
    };
    for cluster in 0..clusters {
        for day_type in DayType::iter() {
            let matrix = vec![vec![uniform_row(); STATE_COUNT]; SLOTS_PER_DAY];
            let tables = MarkovTables::new("synthetic", uniform_row(), matrix).unwrap();
            library.markov.insert((cluster, day_type), tables);
        }
    }
    fill_common(&mut library, clusters);
    library
}

/// A complete, valid configuration document for tests.
pub fn sample_config_toml() -> String {
    let ones24 = "[1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0]";
    let ones12 = "[1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0]";
    format!(
        r#"
[building]
seed = 42
occupants = 2
state_code = "CO"
year = 2019
timestep_minutes = 15
latitude = 39.74
longitude = -104.99
timezone_offset = -7
# vacancy placeholder

[resources]
dir = "resources/schedules"
output = "out/schedules.csv"

[activities.sink]
hourly_onset = {ones24} # sink
monthly_multiplier = {ones12}
inter_event_gap_minutes = 2
flow = {{ mean = 1.14, std_dev = 0.32, floor = 0.1 }}
annual_clusters = 365

[activities.shower]
hourly_onset = {ones24}
monthly_multiplier = {ones12}
inter_event_gap_minutes = 5
flow = {{ mean = 2.25, std_dev = 0.68, floor = 0.2 }}
bath_probability = 0.2
bath_flow = {{ mean = 4.0, std_dev = 1.0, floor = 0.5 }}

[activities.dishwasher]
hourly_onset = {ones24}
monthly_multiplier = {ones12}
inter_event_gap_minutes = 30
flow = {{ mean = 1.0, std_dev = 0.2, floor = 0.1 }}
power = {{ mean = 1.2, std_dev = 0.25, floor = 0.3 }}

[activities.clothes_washer]
hourly_onset = {ones24}
monthly_multiplier = {ones12}
inter_event_gap_minutes = 30
flow = {{ mean = 1.1, std_dev = 0.25, floor = 0.1 }}
power = {{ mean = 0.9, std_dev = 0.2, floor = 0.2 }}

[activities.clothes_dryer]
hourly_onset = {ones24}
monthly_multiplier = {ones12}
inter_event_gap_minutes = 30
power = {{ mean = 3.0, std_dev = 0.5, floor = 0.5 }}

[activities.cooking_range]
hourly_onset = {ones24}
monthly_multiplier = {ones12}
inter_event_gap_minutes = 60
power = {{ mean = 2.4, std_dev = 0.4, floor = 0.4 }}

[shapers.lighting_exterior]
hourly = {ones24}
monthly = {ones12}

[shapers.plug_loads]
hourly = {ones24}
monthly = {ones12}

[shapers.ceiling_fan]
hourly = {ones24}
monthly = {ones12}

[shapers.holiday_lighting]
start_month = 11
start_day = 24
end_month = 1
end_day = 6
evening_boost = 1.5
"#
    )
}

/// Single-cluster library whose chain is pinned: the initial vector and every
/// transition row select `state` with probability 1, so every simulated slot
/// lands in `state`.
pub fn pinned_library(state: OccupantState) -> DistributionLibrary {
    let mut library = DistributionLibrary {
        cluster_probabilities: vec![1.0],
        ..Default::default()
    };
    for day_type in DayType::iter() {
        let matrix = vec![vec![one_hot(state); STATE_COUNT]; SLOTS_PER_DAY];
        let tables = MarkovTables::new("pinned", one_hot(state), matrix).unwrap();
        library.markov.insert((0, day_type), tables);
    }
    fill_common(&mut library, 1);
    library
}
