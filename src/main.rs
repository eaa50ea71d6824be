use anyhow::Result;
use occupant_schedules::{config, export, library, simulation, telemetry};

use config::Config;
use library::DistributionLibrary;
use simulation::ScheduleGenerator;
use telemetry::init_tracing;
use tracing::info;

fn main() -> Result<()> {
    init_tracing();

    let cfg = Config::load()?;
    info!(
        seed = cfg.building.seed,
        occupants = cfg.building.occupants,
        state_code = %cfg.building.state_code,
        "configuration loaded"
    );

    let library = DistributionLibrary::load(&cfg.resources.dir, &cfg.building.state_code)?;

    let state = ScheduleGenerator::new(&cfg, &library).run()?;

    export::write_csv_file(&state, &cfg.resources.output)?;
    info!(path = %cfg.resources.output.display(), "done");
    Ok(())
}
