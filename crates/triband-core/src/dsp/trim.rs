//! Trim stages - smoothed input/output gain
//!
//! Gain changes are ramped linearly on the linear-gain scale so automation
//! and knob moves never click. A ramp always lands exactly on its target at
//! the last step and then holds.

use super::db_to_gain;
use crate::types::StereoSample;

/// Default ramp duration for gain changes, in seconds
pub const DEFAULT_RAMP_SECS: f32 = 0.05;

/// Linear countdown ramp toward a target value
#[derive(Debug, Clone)]
pub struct LinearRamp {
    current: f32,
    target: f32,
    step: f32,
    countdown: u32,
    steps_to_target: u32,
}

impl LinearRamp {
    /// Create a ramp resting at `value`
    pub fn new(value: f32) -> Self {
        Self {
            current: value,
            target: value,
            step: 0.0,
            countdown: 0,
            steps_to_target: 0,
        }
    }

    /// Set the ramp length for a sample rate and jump to the target
    pub fn reset(&mut self, sample_rate: f32, ramp_secs: f32) {
        self.steps_to_target = (ramp_secs.max(0.0) * sample_rate).floor() as u32;
        self.set_current_and_target(self.target);
    }

    /// Jump to `value` with no ramp
    pub fn set_current_and_target(&mut self, value: f32) {
        self.current = value;
        self.target = value;
        self.countdown = 0;
        self.step = 0.0;
    }

    /// Start ramping from the current value toward `value`
    ///
    /// Setting the same target again does not restart the ramp.
    pub fn set_target(&mut self, value: f32) {
        if value == self.target {
            return;
        }
        if self.steps_to_target == 0 {
            self.set_current_and_target(value);
            return;
        }
        self.target = value;
        self.countdown = self.steps_to_target;
        self.step = (self.target - self.current) / self.countdown as f32;
    }

    /// Advance one sample and return the new value
    #[inline]
    pub fn next_value(&mut self) -> f32 {
        if self.countdown == 0 {
            return self.target;
        }
        self.countdown -= 1;
        if self.countdown > 0 {
            self.current += self.step;
        } else {
            self.current = self.target;
        }
        self.current
    }

    #[inline]
    pub fn is_smoothing(&self) -> bool {
        self.countdown > 0
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    /// Multiply a block by the ramped value
    pub fn apply(&mut self, samples: &mut [StereoSample]) {
        if self.is_smoothing() {
            for sample in samples.iter_mut() {
                *sample *= self.next_value();
            }
        } else if self.target != 1.0 {
            let gain = self.target;
            for sample in samples.iter_mut() {
                *sample *= gain;
            }
        }
    }
}

/// Smoothed gain stage driven by a dB value
#[derive(Debug, Clone)]
pub struct TrimStage {
    ramp: LinearRamp,
    gain_db: f32,
}

impl TrimStage {
    /// Create a trim stage resting at `gain_db`
    pub fn new(gain_db: f32, sample_rate: f32, ramp_secs: f32) -> Self {
        let mut ramp = LinearRamp::new(db_to_gain(gain_db));
        ramp.reset(sample_rate, ramp_secs);
        Self { ramp, gain_db }
    }

    /// Recompute the ramp length and snap to the current target
    pub fn prepare(&mut self, sample_rate: f32, ramp_secs: f32) {
        self.ramp.reset(sample_rate, ramp_secs);
    }

    /// Ramp toward a new gain
    pub fn set_gain_db(&mut self, gain_db: f32) {
        if gain_db != self.gain_db {
            self.gain_db = gain_db;
            self.ramp.set_target(db_to_gain(gain_db));
        }
    }

    /// Jump to a gain with no ramp
    pub fn snap_to(&mut self, gain_db: f32) {
        self.gain_db = gain_db;
        self.ramp.set_current_and_target(db_to_gain(gain_db));
    }

    pub fn gain_db(&self) -> f32 {
        self.gain_db
    }

    /// Current linear gain (mid-ramp value while smoothing)
    pub fn current_gain(&self) -> f32 {
        self.ramp.current()
    }

    pub fn is_smoothing(&self) -> bool {
        self.ramp.is_smoothing()
    }

    #[inline]
    pub fn process(&mut self, samples: &mut [StereoSample]) {
        self.ramp.apply(samples);
    }
}
