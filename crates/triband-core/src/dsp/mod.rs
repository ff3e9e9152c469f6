//! DSP building blocks
//!
//! - [`crossover`]: Linkwitz-Riley filters and the three-band split network
//! - [`compressor`]: per-band feed-forward compressor with level metering
//! - [`trim`]: smoothed input/output gain stages

pub mod compressor;
pub mod crossover;
pub mod trim;

pub use compressor::{BandCompressor, BandLevels};
pub use crossover::{CrossoverNetwork, FilterType, LinkwitzRileyFilter};
pub use trim::{LinearRamp, TrimStage, DEFAULT_RAMP_SECS};

/// Meter reading for silence (and anything quieter)
pub const METER_FLOOR_DB: f32 = -72.0;

/// Linear gain to decibels, floored at [`METER_FLOOR_DB`]
#[inline]
pub fn gain_to_db(gain: f32) -> f32 {
    if gain > 0.0 {
        (20.0 * gain.log10()).max(METER_FLOOR_DB)
    } else {
        METER_FLOOR_DB
    }
}

/// Decibels to linear gain
#[inline]
pub fn db_to_gain(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}
