//! # Water Fixture Synthesizers
//!
//! Sink, shower and bath flow tracks. Sinks place a fixed annual cluster
//! budget spread evenly across days whenever someone is idle at home; showers
//! and baths follow the showering state directly, with each showering block
//! resolving to either a shower cluster or a single bath draw. Sampled event
//! durations scale with the month's multiplier, as for the appliances.

use tracing::debug;

use crate::config::{ShowerConfig, SinkConfig};
use crate::domain::{EndUse, OccupantState, SimYear, MINUTES_PER_DAY, MINUTES_PER_SLOT, SLOTS_PER_DAY};
use crate::error::Result;
use crate::library::DistributionLibrary;
use crate::rng::BuildingRng;
use crate::simulation::events::{blocks, place_cluster, stamp};
use crate::simulation::occupants::OccupantModel;

/// Clusters allocated to one day from a fixed annual total. The remainder is
/// front-loaded so the annual count is met exactly.
fn clusters_for_day(annual: usize, days: usize, day: usize) -> usize {
    annual / days + usize::from(day < annual % days)
}

pub fn synthesize_sink(
    config: &SinkConfig,
    library: &DistributionLibrary,
    model: &OccupantModel,
    year: &SimYear,
    rng: &mut BuildingRng,
) -> Result<Vec<f64>> {
    let mut buffer = vec![0.0; year.total_minutes()];
    let flow = rng.gaussian(config.flow.mean, config.flow.std_dev, config.flow.floor);

    let size_table = library.cluster_size(EndUse::Sink)?;
    let duration_table = library.event_duration(EndUse::Sink)?;
    let mut mask = model.any_in_state(OccupantState::NothingAtHome);

    for day in 0..year.days {
        let day_mask = &mut mask[day * SLOTS_PER_DAY..(day + 1) * SLOTS_PER_DAY];
        let clusters = clusters_for_day(config.annual_clusters, year.days, day);
        let multiplier = config.monthly_multiplier[year.month(day) as usize - 1];

        for _ in 0..clusters {
            let Some(slot) = place_cluster(rng, day_mask, &config.hourly_onset) else {
                debug!(day, "sink cluster dropped, no availability left");
                continue;
            };
            let mut minute = day * MINUTES_PER_DAY + slot * MINUTES_PER_SLOT;
            let events = size_table.sample_value(rng) as usize;
            for _ in 0..events {
                let duration =
                    ((duration_table.sample_value(rng) * multiplier).round() as usize).max(1);
                minute = stamp(&mut buffer, minute, duration, flow);
                minute += config.inter_event_gap_minutes;
                if minute >= buffer.len() {
                    break;
                }
            }
        }
    }
    Ok(buffer)
}

/// Shower and bath flow tracks, synthesized together because both consume the
/// same showering blocks: one draw per block decides which it is.
pub fn synthesize_shower_bath(
    config: &ShowerConfig,
    library: &DistributionLibrary,
    model: &OccupantModel,
    year: &SimYear,
    rng: &mut BuildingRng,
) -> Result<(Vec<f64>, Vec<f64>)> {
    let mut shower = vec![0.0; year.total_minutes()];
    let mut bath = vec![0.0; year.total_minutes()];
    let shower_flow = rng.gaussian(config.flow.mean, config.flow.std_dev, config.flow.floor);
    let bath_flow = rng.gaussian(
        config.bath_flow.mean,
        config.bath_flow.std_dev,
        config.bath_flow.floor,
    );

    let size_table = library.cluster_size(EndUse::Shower)?;
    let shower_durations = library.event_duration(EndUse::Shower)?;
    let bath_durations = library.event_duration(EndUse::Bath)?;
    let mut mask = model.any_in_state(OccupantState::Showering);

    for day in 0..year.days {
        let day_mask = &mut mask[day * SLOTS_PER_DAY..(day + 1) * SLOTS_PER_DAY];
        let clusters = blocks(day_mask).len();
        let multiplier = config.monthly_multiplier[year.month(day) as usize - 1];

        for _ in 0..clusters {
            let Some(slot) = place_cluster(rng, day_mask, &config.hourly_onset) else {
                continue;
            };
            let start = day * MINUTES_PER_DAY + slot * MINUTES_PER_SLOT;

            if rng.uniform() < config.bath_probability {
                let duration =
                    ((bath_durations.sample_value(rng) * multiplier).round() as usize).max(1);
                stamp(&mut bath, start, duration, bath_flow);
                continue;
            }

            let mut minute = start;
            let events = size_table.sample_value(rng) as usize;
            for _ in 0..events {
                let duration =
                    ((shower_durations.sample_value(rng) * multiplier).round() as usize).max(1);
                minute = stamp(&mut shower, minute, duration, shower_flow);
                minute += config.inter_event_gap_minutes;
                if minute >= shower.len() {
                    break;
                }
            }
        }
    }
    Ok((shower, bath))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{pinned_library, sample_config_toml};
    use crate::config::Config;

    fn sink_config() -> SinkConfig {
        Config::from_toml(&sample_config_toml()).unwrap().activities.sink
    }

    fn shower_config() -> ShowerConfig {
        Config::from_toml(&sample_config_toml()).unwrap().activities.shower
    }

    #[test]
    fn cluster_budget_is_met_exactly() {
        let total: usize = (0..365).map(|d| clusters_for_day(400, 365, d)).sum();
        assert_eq!(total, 400);
        assert_eq!(clusters_for_day(365, 365, 120), 1);
    }

    #[test]
    fn one_sink_cluster_per_day_when_always_available() {
        // Occupant pinned to idle-at-home: the sink mask is all-true, and an
        // annual budget of 365 places exactly one cluster each day.
        let library = pinned_library(OccupantState::NothingAtHome);
        let year = SimYear::new(2019);
        let mut rng = BuildingRng::new(42);
        let model = OccupantModel::simulate(&library, &year, 1, &mut rng).unwrap();
        assert!(model.any_in_state(OccupantState::NothingAtHome).iter().all(|&m| m));

        let config = sink_config();
        assert_eq!(config.annual_clusters, 365);
        let buffer = synthesize_sink(&config, &library, &model, &year, &mut rng).unwrap();

        for day in 0..year.days {
            let slice = &buffer[day * MINUTES_PER_DAY..(day + 1) * MINUTES_PER_DAY];
            let runs = blocks(&slice.iter().map(|&v| v > 0.0).collect::<Vec<_>>());
            assert_eq!(runs.len(), 1, "day {day} should hold exactly one sink cluster");
        }
    }

    #[test]
    fn no_shower_without_showering_state() {
        let library = pinned_library(OccupantState::Sleeping);
        let year = SimYear::new(2019);
        let mut rng = BuildingRng::new(7);
        let model = OccupantModel::simulate(&library, &year, 2, &mut rng).unwrap();

        let (shower, bath) =
            synthesize_shower_bath(&shower_config(), &library, &model, &year, &mut rng).unwrap();
        assert!(shower.iter().all(|&v| v == 0.0));
        assert!(bath.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn showering_blocks_produce_flow() {
        let library = pinned_library(OccupantState::Showering);
        let year = SimYear::new(2019);
        let mut rng = BuildingRng::new(9);
        let model = OccupantModel::simulate(&library, &year, 1, &mut rng).unwrap();

        let (shower, bath) =
            synthesize_shower_bath(&shower_config(), &library, &model, &year, &mut rng).unwrap();
        let total: f64 = shower.iter().chain(bath.iter()).sum();
        assert!(total > 0.0);
    }

    #[test]
    fn monthly_multiplier_lengthens_sink_events() {
        let library = pinned_library(OccupantState::NothingAtHome);
        let year = SimYear::new(2019);
        let mut rng = BuildingRng::new(3);
        let model = OccupantModel::simulate(&library, &year, 1, &mut rng).unwrap();

        let mut base_cfg = sink_config();
        base_cfg.monthly_multiplier = vec![1.0; 12];
        let mut tripled_cfg = base_cfg.clone();
        tripled_cfg.monthly_multiplier = vec![3.0; 12];

        let mut rng_a = BuildingRng::new(500);
        let base = synthesize_sink(&base_cfg, &library, &model, &year, &mut rng_a).unwrap();
        let mut rng_b = BuildingRng::new(500);
        let tripled = synthesize_sink(&tripled_cfg, &library, &model, &year, &mut rng_b).unwrap();

        let base_minutes = base.iter().filter(|&&v| v > 0.0).count();
        let tripled_minutes = tripled.iter().filter(|&&v| v > 0.0).count();
        assert!(tripled_minutes > base_minutes);
    }

    #[test]
    fn flow_respects_configured_floor() {
        let library = pinned_library(OccupantState::NothingAtHome);
        let year = SimYear::new(2019);
        let mut rng = BuildingRng::new(1);
        let model = OccupantModel::simulate(&library, &year, 1, &mut rng).unwrap();
        let config = sink_config();
        let buffer = synthesize_sink(&config, &library, &model, &year, &mut rng).unwrap();
        let floor = config.flow.floor.unwrap();
        assert!(buffer.iter().filter(|&&v| v > 0.0).all(|&v| v >= floor));
    }
}
