//! Triband Core - three-band crossover compressor engine
//!
//! Splits stereo audio into low / mid / high bands with Linkwitz-Riley
//! filters, compresses each band independently and recombines them under
//! solo/mute rules, with smoothed input and output trim.

pub mod config;
pub mod dsp;
pub mod engine;
pub mod error;
pub mod params;
pub mod types;

pub use error::{EngineError, EngineResult};
pub use types::*;
