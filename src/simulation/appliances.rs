//! # Appliance Synthesizers
//!
//! Power tracks for the dishwasher, clothes washer, clothes dryer and cooking
//! range, each driven by its dedicated occupant state. Dishwasher and clothes
//! washer additionally stamp a hot-water draw at the start of each run. Power
//! pulses carry a refractory/gap condition so two runs of the same appliance
//! never start back to back, and the sampled run length is scaled by the
//! month's multiplier before stamping.

use tracing::debug;

use crate::config::{ApplianceConfig, PowerConfig};
use crate::domain::{EndUse, OccupantState, SimYear, MINUTES_PER_DAY, MINUTES_PER_SLOT, SLOTS_PER_DAY};
use crate::error::Result;
use crate::library::DistributionLibrary;
use crate::rng::BuildingRng;
use crate::simulation::events::{blocks, can_place, place_cluster, stamp};
use crate::simulation::occupants::OccupantModel;

/// A wet appliance: power track plus hot-water draws.
pub struct WetApplianceOutput {
    pub power: Vec<f64>,
    pub water: Vec<f64>,
}

struct TrackParams<'a> {
    state: OccupantState,
    power_use: EndUse,
    hourly_onset: &'a [f64],
    monthly_multiplier: &'a [f64],
    gap_minutes: usize,
    power_value: f64,
}

/// The common power-track pass: one cluster per contiguous activity block,
/// onset-weighted start, duration scaled by the month's multiplier.
fn power_track(
    params: &TrackParams<'_>,
    library: &DistributionLibrary,
    model: &OccupantModel,
    year: &SimYear,
    rng: &mut BuildingRng,
    mut on_start: impl FnMut(&mut BuildingRng, usize),
) -> Result<Vec<f64>> {
    let mut buffer = vec![0.0; year.total_minutes()];

    let duration_table = library.power_duration(params.power_use)?;
    let mut mask = model.any_in_state(params.state);

    for day in 0..year.days {
        let day_mask = &mut mask[day * SLOTS_PER_DAY..(day + 1) * SLOTS_PER_DAY];
        let clusters = blocks(day_mask).len();
        let multiplier = params.monthly_multiplier[year.month(day) as usize - 1];

        for _ in 0..clusters {
            let Some(slot) = place_cluster(rng, day_mask, params.hourly_onset) else {
                continue;
            };
            let minute = day * MINUTES_PER_DAY + slot * MINUTES_PER_SLOT;
            let duration = ((duration_table.sample_value(rng) * multiplier).round() as usize).max(1);
            if !can_place(&buffer, minute, duration, params.gap_minutes) {
                debug!(end_use = %params.power_use, minute, "pulse suppressed by inter-event gap");
                continue;
            }
            stamp(&mut buffer, minute, duration, params.power_value);
            on_start(rng, minute);
        }
    }
    Ok(buffer)
}

/// Dishwasher or clothes washer: power plus a hot-water draw per run.
pub fn synthesize_wet_appliance(
    config: &ApplianceConfig,
    state: OccupantState,
    power_use: EndUse,
    water_use: EndUse,
    library: &DistributionLibrary,
    model: &OccupantModel,
    year: &SimYear,
    rng: &mut BuildingRng,
) -> Result<WetApplianceOutput> {
    let power_value = rng.gaussian(config.power.mean, config.power.std_dev, config.power.floor);
    let flow_value = rng.gaussian(config.flow.mean, config.flow.std_dev, config.flow.floor);

    let water_durations = library.event_duration(water_use)?;
    let mut water = vec![0.0; year.total_minutes()];

    let params = TrackParams {
        state,
        power_use,
        hourly_onset: &config.hourly_onset,
        monthly_multiplier: &config.monthly_multiplier,
        gap_minutes: config.inter_event_gap_minutes,
        power_value,
    };
    let power = power_track(&params, library, model, year, rng, |rng, minute| {
        let duration = water_durations.sample_value(rng) as usize;
        stamp(&mut water, minute, duration, flow_value);
    })?;

    Ok(WetApplianceOutput { power, water })
}

/// Clothes dryer or cooking range: power only.
pub fn synthesize_power_appliance(
    config: &PowerConfig,
    state: OccupantState,
    power_use: EndUse,
    library: &DistributionLibrary,
    model: &OccupantModel,
    year: &SimYear,
    rng: &mut BuildingRng,
) -> Result<Vec<f64>> {
    let power_value = rng.gaussian(config.power.mean, config.power.std_dev, config.power.floor);
    let params = TrackParams {
        state,
        power_use,
        hourly_onset: &config.hourly_onset,
        monthly_multiplier: &config.monthly_multiplier,
        gap_minutes: config.inter_event_gap_minutes,
        power_value,
    };
    power_track(&params, library, model, year, rng, |_, _| {})
}
