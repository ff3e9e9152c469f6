//! Audio engine - signal flow, metering and control
//!
//! - SignalEngine: per-block orchestration of trim, crossover, compressors and mix
//! - MixBus: trim stages and the solo/mute recombination rules
//! - BandMeters: lock-free meter readings for the UI
//! - EngineCommand: lock-free queue for between-block operations

mod command;
mod engine;
mod meters;
mod mix_bus;
mod setup;

pub use command::*;
pub use engine::*;
pub use meters::*;
pub use mix_bus::*;
pub use setup::*;
