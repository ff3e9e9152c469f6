//! Band compressor - feed-forward peak compressor with level metering
//!
//! One instance per band. Each block it measures the band's RMS level,
//! compresses (unless bypassed) and measures again, keeping both readings
//! for the meters.
//!
//! # Algorithm
//!
//! 1. A peak envelope follower tracks `|x|` per channel:
//!    `env = |x| + cte · (env − |x|)`, using the attack coefficient while the
//!    signal rises above the envelope and the release coefficient otherwise.
//!    `cte = exp(−2π · 1000 / (fs · ms))`.
//! 2. Below the threshold the gain is 1. Above it the gain is
//!    `(env / threshold)^(1/ratio − 1)`, so a steady level `L` dB settles at
//!    `T + (L − T) / R` dB.
//! 3. The sample is multiplied by that gain.

use super::{db_to_gain, gain_to_db, METER_FLOOR_DB};
use crate::params::BandSettings;
use crate::types::StereoBuffer;

/// Latest pre/post compression levels of a band, in dB
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandLevels {
    /// RMS level entering the compressor
    pub input_rms_db: f32,
    /// RMS level leaving the compressor
    pub output_rms_db: f32,
}

impl Default for BandLevels {
    fn default() -> Self {
        Self {
            input_rms_db: METER_FLOOR_DB,
            output_rms_db: METER_FLOOR_DB,
        }
    }
}

/// Envelope coefficient for a time constant in ms (0 = instant)
#[inline]
fn time_constant(ms: f32, sample_rate: f32) -> f32 {
    if ms < 1.0e-3 {
        0.0
    } else {
        (-2.0 * std::f32::consts::PI * 1000.0 / (sample_rate * ms)).exp()
    }
}

/// Feed-forward compressor for a single band
pub struct BandCompressor {
    sample_rate: f32,

    // Settings, refreshed once per block

    attack_ms: f32,
    release_ms: f32,
    /// Threshold as linear amplitude
    threshold: f32,
    /// 1 / threshold, cached for the gain computation
    threshold_inv: f32,
    /// 1 / ratio
    ratio_inv: f32,
    bypassed: bool,

    // Envelope follower

    attack_coeff: f32,
    release_coeff: f32,
    /// Peak envelope per channel (left/right)
    envelope: [f32; 2],

    levels: BandLevels,
}

impl BandCompressor {
    pub fn new(sample_rate: f32) -> Self {
        let mut compressor = Self {
            sample_rate,
            attack_ms: 0.0,
            release_ms: 0.0,
            threshold: 1.0,
            threshold_inv: 1.0,
            ratio_inv: 1.0,
            bypassed: false,
            attack_coeff: 0.0,
            release_coeff: 0.0,
            envelope: [0.0; 2],
            levels: BandLevels::default(),
        };
        compressor.update(&BandSettings::default());
        compressor
    }

    /// Apply a band's settings for the next block
    pub fn update(&mut self, settings: &BandSettings) {
        if settings.attack_ms != self.attack_ms {
            self.attack_ms = settings.attack_ms;
            self.attack_coeff = time_constant(self.attack_ms, self.sample_rate);
        }
        if settings.release_ms != self.release_ms {
            self.release_ms = settings.release_ms;
            self.release_coeff = time_constant(self.release_ms, self.sample_rate);
        }

        self.threshold = db_to_gain(settings.threshold_db).max(f32::MIN_POSITIVE);
        self.threshold_inv = 1.0 / self.threshold;

        let ratio = if settings.ratio.is_nan() { 1.0 } else { settings.ratio.max(1.0) };
        self.ratio_inv = 1.0 / ratio;

        self.bypassed = settings.bypassed;
    }

    /// Change the sample rate. Clears the envelope.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.attack_coeff = time_constant(self.attack_ms, sample_rate);
        self.release_coeff = time_constant(self.release_ms, sample_rate);
        self.reset();
    }

    pub fn is_bypassed(&self) -> bool {
        self.bypassed
    }

    /// Process a band buffer in place and refresh the level readings
    ///
    /// When bypassed the audio passes untouched and the envelope holds, but
    /// both levels are still measured.
    pub fn process(&mut self, buffer: &mut StereoBuffer) {
        let input_rms_db = gain_to_db(buffer.rms());

        if !self.bypassed {
            for sample in buffer.iter_mut() {
                sample.left *= self.gain_for(0, sample.left);
                sample.right *= self.gain_for(1, sample.right);
            }
        }

        self.levels = BandLevels {
            input_rms_db,
            output_rms_db: gain_to_db(buffer.rms()),
        };
    }

    /// Advance the envelope for one channel and return the gain to apply
    #[inline]
    fn gain_for(&mut self, channel: usize, input: f32) -> f32 {
        let x = input.abs();
        let prev = self.envelope[channel];
        let coeff = if x > prev { self.attack_coeff } else { self.release_coeff };
        let env = x + coeff * (prev - x);
        self.envelope[channel] = env;

        if env < self.threshold {
            1.0
        } else {
            (env * self.threshold_inv).powf(self.ratio_inv - 1.0)
        }
    }

    /// Latest pre/post levels
    pub fn levels(&self) -> BandLevels {
        self.levels
    }

    /// Clear the envelope and the level readings
    pub fn reset(&mut self) {
        self.envelope = [0.0; 2];
        self.levels = BandLevels::default();
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StereoSample;

    const SR: f32 = 48000.0;

    fn settings(threshold_db: f32, ratio: f32) -> BandSettings {
        BandSettings {
            attack_ms: 5.0,
            release_ms: 50.0,
            threshold_db,
            ratio,
            ..BandSettings::default()
        }
    }

    /// Run `blocks` blocks of constant DC through the compressor
    fn run_dc(comp: &mut BandCompressor, level: f32, blocks: usize) -> StereoBuffer {
        let mut buffer = StereoBuffer::silence(512);
        for _ in 0..blocks {
            buffer.as_mut_slice().fill(StereoSample::mono(level));
            comp.process(&mut buffer);
        }
        buffer
    }

    #[test]
    fn test_below_threshold_is_transparent() {
        let mut comp = BandCompressor::new(SR);
        comp.update(&settings(-6.0, 4.0));

        // Sine peaking at -12 dBFS, well under the -6 dB threshold
        let input: Vec<StereoSample> = (0..4096)
            .map(|n| StereoSample::mono(0.25 * (n as f32 * 0.05).sin()))
            .collect();
        let mut buffer = StereoBuffer::from_vec(input.clone());
        comp.process(&mut buffer);

        assert_eq!(buffer.as_slice(), input.as_slice());
        let levels = comp.levels();
        assert_eq!(levels.input_rms_db, levels.output_rms_db);
    }

    #[test]
    fn test_steady_state_level() {
        // 0.5 = -6.02 dB into -20 dB threshold at 4:1 → -20 + 13.98 / 4
        let mut comp = BandCompressor::new(SR);
        comp.update(&settings(-20.0, 4.0));
        run_dc(&mut comp, 0.5, 200);

        let expected = -20.0 + (gain_to_db(0.5) + 20.0) / 4.0;
        let levels = comp.levels();
        assert!(
            (levels.output_rms_db - expected).abs() < 0.05,
            "expected {:.3} dB, got {:.3} dB",
            expected,
            levels.output_rms_db
        );
        assert!((levels.input_rms_db - gain_to_db(0.5)).abs() < 1e-4);
    }

    #[test]
    fn test_limiter_ratio_holds_threshold() {
        let mut comp = BandCompressor::new(SR);
        comp.update(&settings(-12.0, 100.0));
        run_dc(&mut comp, 1.0, 200);

        let out = comp.levels().output_rms_db;
        assert!((out - -11.88).abs() < 0.05, "limiter output {:.3} dB", out);
    }

    #[test]
    fn test_unity_ratio_never_reduces() {
        let mut comp = BandCompressor::new(SR);
        comp.update(&settings(-40.0, 1.0));
        let buffer = run_dc(&mut comp, 0.8, 10);

        assert!(buffer.iter().all(|s| (s.left - 0.8).abs() < 1e-6));
    }

    #[test]
    fn test_ratio_below_one_is_clamped() {
        let mut comp = BandCompressor::new(SR);
        comp.update(&settings(-40.0, 0.25));
        let buffer = run_dc(&mut comp, 0.8, 10);

        // Behaves as 1:1, never expands
        assert!(buffer.iter().all(|s| (s.left - 0.8).abs() < 1e-6));
    }

    #[test]
    fn test_bypass_passes_audio_and_still_meters() {
        let mut comp = BandCompressor::new(SR);
        comp.update(&BandSettings {
            bypassed: true,
            ..settings(-30.0, 10.0)
        });
        assert!(comp.is_bypassed());

        let buffer = run_dc(&mut comp, 0.5, 4);
        assert!(buffer.iter().all(|s| s.left == 0.5 && s.right == 0.5));

        let levels = comp.levels();
        assert!((levels.input_rms_db - gain_to_db(0.5)).abs() < 1e-4);
        assert_eq!(levels.input_rms_db, levels.output_rms_db);

        // Envelope did not move while bypassed
        assert_eq!(comp.envelope, [0.0; 2]);
    }

    #[test]
    fn test_silence_meters_at_floor() {
        let mut comp = BandCompressor::new(SR);
        let mut buffer = StereoBuffer::silence(256);
        comp.process(&mut buffer);

        assert_eq!(comp.levels(), BandLevels::default());
        assert_eq!(comp.levels().input_rms_db, METER_FLOOR_DB);
    }

    #[test]
    fn test_attack_is_gradual() {
        let mut comp = BandCompressor::new(SR);
        comp.update(&BandSettings {
            attack_ms: 50.0,
            ..settings(-20.0, 10.0)
        });

        let mut buffer = StereoBuffer::from_vec(vec![StereoSample::mono(0.5); 4800]);
        comp.process(&mut buffer);

        // Gain reduction grows over the attack: later samples are quieter
        assert!(buffer[10].left > buffer[1000].left);
        assert!(buffer[1000].left > buffer[4799].left);
    }

    #[test]
    fn test_reset_clears_envelope_and_levels() {
        let mut comp = BandCompressor::new(SR);
        comp.update(&settings(-20.0, 4.0));
        run_dc(&mut comp, 0.5, 4);

        comp.reset();
        assert_eq!(comp.envelope, [0.0; 2]);
        assert_eq!(comp.levels(), BandLevels::default());
    }

    #[test]
    fn test_time_constant() {
        assert_eq!(time_constant(0.0, SR), 0.0);
        let c = time_constant(10.0, SR);
        assert!(c > 0.0 && c < 1.0);
        // Longer times decay more slowly
        assert!(time_constant(100.0, SR) > c);
    }

    #[test]
    fn test_repeated_update_is_bit_identical() {
        let band = settings(-24.0, 8.0);

        let mut once = BandCompressor::new(SR);
        once.update(&band);

        let mut every_block = BandCompressor::new(SR);
        every_block.update(&band);

        for block in 0..40 {
            let samples: Vec<StereoSample> = (0..512)
                .map(|i| {
                    let n = (block * 512 + i) as f32;
                    StereoSample::new(0.9 * (n * 0.031).sin(), 0.6 * (n * 0.017).cos())
                })
                .collect();
            let mut a = StereoBuffer::from_vec(samples.clone());
            let mut b = StereoBuffer::from_vec(samples);

            once.process(&mut a);
            every_block.update(&band);
            every_block.update(&band);
            every_block.process(&mut b);

            assert_eq!(a.as_slice(), b.as_slice(), "block {}", block);
            assert_eq!(once.levels(), every_block.levels());
        }
        assert_eq!(once.envelope, every_block.envelope);
    }
}
