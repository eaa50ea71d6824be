//! # Schedule Synthesis
//!
//! The generation pipeline, leaf-first:
//!
//! - **occupants**: the Markov-chain occupant simulator (per-occupant state
//!   sequences for the year)
//! - **events / fixtures / appliances**: cluster-based minute-pulse
//!   synthesizers for water fixtures and appliance power tracks
//! - **lighting**: astronomical interior lighting plus table-driven
//!   exterior/plug/fan shapes, presence-scaled
//! - **pipeline**: shift, aggregation and peak normalization
//! - **vacancy**: the 0/1 vacancy series and post-multiplication
//! - **generator**: the per-building orchestrator

pub mod appliances;
pub mod events;
pub mod fixtures;
pub mod generator;
pub mod lighting;
pub mod occupants;
pub mod pipeline;
pub mod vacancy;

pub use generator::ScheduleGenerator;
pub use occupants::OccupantModel;
