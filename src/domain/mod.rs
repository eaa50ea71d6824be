pub mod calendar;
pub mod schedule;
pub mod types;

pub use calendar::*;
pub use schedule::*;
pub use types::*;
