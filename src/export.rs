//! Tabular export: header row of schedule names plus the vacancy column, one
//! row per timestep for the full year.

use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::domain::GeneratorState;
use crate::error::{Result, ScheduleError};

pub fn write_csv<W: Write>(state: &GeneratorState, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header: Vec<&str> = state.schedules.iter().map(|s| s.end_use.name()).collect();
    header.push("vacancy");
    csv_writer
        .write_record(&header)
        .map_err(|source| ScheduleError::Csv {
            path: "<export>".into(),
            source,
        })?;

    for step in 0..state.timesteps() {
        let mut record: Vec<String> = state
            .schedules
            .iter()
            .map(|s| s.values[step].to_string())
            .collect();
        record.push(state.vacancy[step].to_string());
        csv_writer
            .write_record(&record)
            .map_err(|source| ScheduleError::Csv {
                path: "<export>".into(),
                source,
            })?;
    }
    csv_writer.flush().map_err(|e| ScheduleError::Resource {
        path: "<export>".into(),
        message: e.to_string(),
    })?;
    Ok(())
}

pub fn write_csv_file(state: &GeneratorState, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ScheduleError::Resource {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
    }
    let file = std::fs::File::create(path).map_err(|e| ScheduleError::Resource {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    write_csv(state, file)?;
    info!(path = %path.display(), rows = state.timesteps(), "schedule export written");
    Ok(())
}
