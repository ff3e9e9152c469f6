//! Band meters - lock-free level readings for the UI
//!
//! The audio thread publishes each band's pre/post compression RMS level
//! once per block; the UI reads them at its own rate without locking.

use crate::dsp::{BandLevels, METER_FLOOR_DB};
use crate::params::AtomicF32;
use crate::types::{Band, NUM_BANDS};

/// Receiver of per-band meter values, called once per band per block
///
/// Implementations run on the audio thread and must not block or allocate.
pub trait MeterSink: Send + Sync {
    fn publish(&self, band: Band, input_db: f32, output_db: f32);
}

/// Atomic meter storage shared between the audio and UI threads
#[derive(Debug)]
pub struct BandMeters {
    input_db: [AtomicF32; NUM_BANDS],
    output_db: [AtomicF32; NUM_BANDS],
}

impl BandMeters {
    /// Create meters reading the floor level
    pub fn new() -> Self {
        Self {
            input_db: std::array::from_fn(|_| AtomicF32::new(METER_FLOOR_DB)),
            output_db: std::array::from_fn(|_| AtomicF32::new(METER_FLOOR_DB)),
        }
    }

    /// Latest RMS level entering a band's compressor, in dB
    pub fn input_db(&self, band: Band) -> f32 {
        self.input_db[band.index()].load()
    }

    /// Latest RMS level leaving a band's compressor, in dB
    pub fn output_db(&self, band: Band) -> f32 {
        self.output_db[band.index()].load()
    }

    pub fn levels(&self, band: Band) -> BandLevels {
        BandLevels {
            input_rms_db: self.input_db(band),
            output_rms_db: self.output_db(band),
        }
    }

    /// Drop every reading back to the floor
    pub fn reset(&self) {
        for band in Band::ALL {
            self.publish(band, METER_FLOOR_DB, METER_FLOOR_DB);
        }
    }
}

impl Default for BandMeters {
    fn default() -> Self {
        Self::new()
    }
}

impl MeterSink for BandMeters {
    fn publish(&self, band: Band, input_db: f32, output_db: f32) {
        self.input_db[band.index()].store(input_db);
        self.output_db[band.index()].store(output_db);
    }
}
