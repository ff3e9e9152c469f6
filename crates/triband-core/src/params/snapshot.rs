//! Per-block parameter snapshot
//!
//! The engine reads every parameter exactly once at the start of a block and
//! works from this plain-data copy for the rest of the block. Fields are
//! individually atomic in the store; the snapshot as a whole is not.

use super::id::{ParamId, DEFAULT_RATIO_INDEX, RATIO_CHOICES};
use crate::types::{Band, NUM_BANDS};

/// Settings for one band's compressor and mix-bus routing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandSettings {
    pub attack_ms: f32,
    pub release_ms: f32,
    pub threshold_db: f32,
    /// Compression ratio (N:1), taken from [`RATIO_CHOICES`]
    pub ratio: f32,
    pub bypassed: bool,
    pub muted: bool,
    pub soloed: bool,
}

impl Default for BandSettings {
    fn default() -> Self {
        Self {
            attack_ms: ParamId::Attack(Band::Low).spec().default,
            release_ms: ParamId::Release(Band::Low).spec().default,
            threshold_db: ParamId::Threshold(Band::Low).spec().default,
            ratio: RATIO_CHOICES[DEFAULT_RATIO_INDEX],
            bypassed: false,
            muted: false,
            soloed: false,
        }
    }
}

/// All parameter values for one processing block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSnapshot {
    pub low_mid_hz: f32,
    pub mid_high_hz: f32,
    pub bands: [BandSettings; NUM_BANDS],
    pub gain_in_db: f32,
    pub gain_out_db: f32,
}

impl ParamSnapshot {
    #[inline]
    pub fn band(&self, band: Band) -> &BandSettings {
        &self.bands[band.index()]
    }

    #[inline]
    pub fn band_mut(&mut self, band: Band) -> &mut BandSettings {
        &mut self.bands[band.index()]
    }

    /// True if any band is soloed
    pub fn any_solo(&self) -> bool {
        self.bands.iter().any(|b| b.soloed)
    }
}

impl Default for ParamSnapshot {
    fn default() -> Self {
        Self {
            low_mid_hz: ParamId::LowMidCrossover.spec().default,
            mid_high_hz: ParamId::MidHighCrossover.spec().default,
            bands: [BandSettings::default(); NUM_BANDS],
            gain_in_db: 0.0,
            gain_out_db: 0.0,
        }
    }
}
