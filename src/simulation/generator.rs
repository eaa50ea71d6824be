//! # Generator Orchestrator
//!
//! Wires the per-building RNG stream, the Distribution Library, the occupant
//! simulator, the event synthesizers and the shapers into one run, finishing
//! each end use through the shift/aggregation pipeline as soon as its minute
//! buffer is complete so at most a handful of minute buffers are alive at
//! once.

use tracing::info;

use crate::config::Config;
use crate::domain::{
    EndUse, GeneratorState, OccupantState, Schedule, SimYear, MINUTES_PER_DAY,
};
use crate::error::Result;
use crate::library::DistributionLibrary;
use crate::rng::BuildingRng;

use super::appliances::{synthesize_power_appliance, synthesize_wet_appliance};
use super::fixtures::{synthesize_shower_bath, synthesize_sink};
use super::lighting::{interior_lighting, scale_by_presence, table_shape, SunModel};
use super::occupants::OccupantModel;
use super::pipeline::{aggregate, apply_offset, normalize_to_peak, shift_days};
use super::vacancy::vacancy_series;

/// Bound of the per-end-use desynchronization offset, in minutes. Tuned
/// against the source survey data's conventions; keep as is.
const DESYNC_BOUND_MINUTES: i64 = 30;

pub struct ScheduleGenerator<'a> {
    config: &'a Config,
    library: &'a DistributionLibrary,
}

impl<'a> ScheduleGenerator<'a> {
    pub fn new(config: &'a Config, library: &'a DistributionLibrary) -> Self {
        Self { config, library }
    }

    /// Run the full synthesis for one building. Deterministic in the building
    /// seed and all inputs; either every schedule is produced or none is.
    pub fn run(&self) -> Result<GeneratorState> {
        let building = &self.config.building;
        let year = SimYear::new(building.year);
        let timestep = building.timestep_minutes;
        let timesteps = year.days * MINUTES_PER_DAY / timestep;
        let mut rng = BuildingRng::new(building.seed);

        info!(
            seed = building.seed,
            occupants = building.occupants,
            year = building.year,
            timestep,
            "starting schedule generation"
        );

        let model = OccupantModel::simulate(self.library, &year, building.occupants, &mut rng)?;

        let mut state = GeneratorState::new(timestep, timesteps);

        // Occupancy and sleep come straight from the state sequences.
        self.finish(
            &mut state,
            EndUse::Occupants,
            model.presence_fraction(),
            &year,
            &mut rng,
            false,
        );
        self.finish(
            &mut state,
            EndUse::Sleep,
            model.fraction_in_states(&[OccupantState::Sleeping]),
            &year,
            &mut rng,
            false,
        );

        // Water fixtures.
        let activities = &self.config.activities;
        let sink = synthesize_sink(&activities.sink, self.library, &model, &year, &mut rng)?;
        self.finish(&mut state, EndUse::Sink, sink, &year, &mut rng, true);

        let (shower, bath) =
            synthesize_shower_bath(&activities.shower, self.library, &model, &year, &mut rng)?;
        self.finish(&mut state, EndUse::Shower, shower, &year, &mut rng, true);
        self.finish(&mut state, EndUse::Bath, bath, &year, &mut rng, true);

        // Wet appliances: hot water plus power.
        let dishwasher = synthesize_wet_appliance(
            &activities.dishwasher,
            OccupantState::Dishwashing,
            EndUse::Dishwasher,
            EndUse::HotWaterDishwasher,
            self.library,
            &model,
            &year,
            &mut rng,
        )?;
        self.finish(
            &mut state,
            EndUse::HotWaterDishwasher,
            dishwasher.water,
            &year,
            &mut rng,
            true,
        );
        self.finish(&mut state, EndUse::Dishwasher, dishwasher.power, &year, &mut rng, true);

        let washer = synthesize_wet_appliance(
            &activities.clothes_washer,
            OccupantState::Laundering,
            EndUse::ClothesWasher,
            EndUse::HotWaterClothesWasher,
            self.library,
            &model,
            &year,
            &mut rng,
        )?;
        self.finish(
            &mut state,
            EndUse::HotWaterClothesWasher,
            washer.water,
            &year,
            &mut rng,
            true,
        );
        self.finish(&mut state, EndUse::ClothesWasher, washer.power, &year, &mut rng, true);

        // Power-only appliances.
        let dryer = synthesize_power_appliance(
            &activities.clothes_dryer,
            OccupantState::Laundering,
            EndUse::ClothesDryer,
            self.library,
            &model,
            &year,
            &mut rng,
        )?;
        self.finish(&mut state, EndUse::ClothesDryer, dryer, &year, &mut rng, true);

        let cooking = synthesize_power_appliance(
            &activities.cooking_range,
            OccupantState::Cooking,
            EndUse::CookingRange,
            self.library,
            &model,
            &year,
            &mut rng,
        )?;
        self.finish(&mut state, EndUse::CookingRange, cooking, &year, &mut rng, true);

        // Shaped loads, suppressed toward baseline while occupants are away
        // or asleep.
        let inactive =
            model.fraction_in_states(&[OccupantState::Absent, OccupantState::Sleeping]);
        let sun = SunModel::new(building.latitude, building.longitude, building.timezone_offset);
        let shapers = &self.config.shapers;

        let mut interior = interior_lighting(&year, &sun);
        scale_by_presence(&mut interior, &inactive, &year);
        self.finish(&mut state, EndUse::LightingInterior, interior, &year, &mut rng, false);

        let mut exterior = table_shape(&year, &shapers.lighting_exterior, shapers.holiday_lighting.as_ref());
        scale_by_presence(&mut exterior, &inactive, &year);
        self.finish(&mut state, EndUse::LightingExterior, exterior, &year, &mut rng, false);

        let mut plugs = table_shape(&year, &shapers.plug_loads, None);
        scale_by_presence(&mut plugs, &inactive, &year);
        self.finish(&mut state, EndUse::PlugLoads, plugs, &year, &mut rng, false);

        let mut fan = table_shape(&year, &shapers.ceiling_fan, None);
        scale_by_presence(&mut fan, &inactive, &year);
        self.finish(&mut state, EndUse::CeilingFan, fan, &year, &mut rng, false);

        // Vacancy marks last, multiplied over the normalized output.
        state.vacancy = vacancy_series(&year, building.vacancy.as_ref(), timestep);
        state.apply_vacancy();

        info!(schedules = state.schedules.len(), timesteps, "schedule generation complete");
        Ok(state)
    }

    /// Finish one end use: desynchronization offset, optional day-type/month
    /// shift, aggregation to the caller's timestep, peak normalization. The
    /// minute buffer is consumed here and freed on return.
    fn finish(
        &self,
        state: &mut GeneratorState,
        end_use: EndUse,
        mut minutes: Vec<f64>,
        year: &SimYear,
        rng: &mut BuildingRng,
        monthly_shift: bool,
    ) {
        let offset = rng.int_range(-DESYNC_BOUND_MINUTES, DESYNC_BOUND_MINUTES);
        apply_offset(&mut minutes, offset);

        if monthly_shift {
            let code = &self.config.building.state_code;
            shift_days(&mut minutes, year, |day| {
                self.library
                    .shift_minutes(code, year.month(day), year.day_type(day))
            });
        }

        let mut values = aggregate(&minutes, state.timestep_minutes);
        normalize_to_peak(&mut values);
        state.push(Schedule::new(end_use, values));
    }
}
