use thiserror::Error;

/// Errors surfaced by schedule generation.
///
/// Generation is all-or-nothing: any of these aborts the run before an
/// export is produced. Soft sampling fallbacks (an under-summing probability
/// vector) are deliberately NOT errors; see [`crate::rng::weighted_index`].
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("{name}: expected {expected} values, got {actual}")]
    InvalidLength {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("{name}: probability at index {index} is negative ({value})")]
    InvalidProbability {
        name: String,
        index: usize,
        value: f64,
    },

    #[error("{name}: distribution has no entries")]
    EmptyDistribution { name: String },

    #[error("missing distribution table for {0}")]
    MissingTable(String),

    #[error("resource {path}: {message}")]
    Resource { path: String, message: String },

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
