//! Mix bus - trim stages and band recombination
//!
//! Recombination rules:
//! - If any band is soloed, only soloed bands are summed. A soloed band is
//!   heard even if it is also muted.
//! - Otherwise every band that is not muted is summed.
//! - Bypass never removes a band from the sum; it only skips compression.
//!
//! The sum is a plain per-sample addition into a cleared output, with no
//! normalization. Clipping is allowed.

use crate::dsp::TrimStage;
use crate::params::{BandSettings, ParamSnapshot};
use crate::types::{StereoBuffer, StereoSample, NUM_BANDS};

/// Which bands reach the output under the solo/mute rules
pub fn audible_bands(bands: &[BandSettings; NUM_BANDS]) -> [bool; NUM_BANDS] {
    let any_solo = bands.iter().any(|b| b.soloed);
    bands.map(|b| if any_solo { b.soloed } else { !b.muted })
}

/// Input/output trim plus band summing
pub struct MixBus {
    input_trim: TrimStage,
    output_trim: TrimStage,
}

impl MixBus {
    /// Create a mix bus with both trims resting at the given gains
    pub fn new(sample_rate: f32, ramp_secs: f32, gain_in_db: f32, gain_out_db: f32) -> Self {
        Self {
            input_trim: TrimStage::new(gain_in_db, sample_rate, ramp_secs),
            output_trim: TrimStage::new(gain_out_db, sample_rate, ramp_secs),
        }
    }

    /// Recompute ramp lengths; both trims snap to their targets
    pub fn prepare(&mut self, sample_rate: f32, ramp_secs: f32) {
        self.input_trim.prepare(sample_rate, ramp_secs);
        self.output_trim.prepare(sample_rate, ramp_secs);
    }

    /// Start ramping toward the snapshot's trim gains
    pub fn set_trims(&mut self, snapshot: &ParamSnapshot) {
        self.input_trim.set_gain_db(snapshot.gain_in_db);
        self.output_trim.set_gain_db(snapshot.gain_out_db);
    }

    /// Jump straight to the given trim gains
    pub fn snap_trims(&mut self, gain_in_db: f32, gain_out_db: f32) {
        self.input_trim.snap_to(gain_in_db);
        self.output_trim.snap_to(gain_out_db);
    }

    pub fn apply_input_trim(&mut self, samples: &mut [StereoSample]) {
        self.input_trim.process(samples);
    }

    pub fn apply_output_trim(&mut self, samples: &mut [StereoSample]) {
        self.output_trim.process(samples);
    }

    pub fn input_trim(&self) -> &TrimStage {
        &self.input_trim
    }

    pub fn output_trim(&self) -> &TrimStage {
        &self.output_trim
    }

    /// Sum the audible bands into `output`
    ///
    /// `output` is cleared first; band buffers must be at least as long.
    pub fn mix(
        &self,
        bands: &[StereoBuffer; NUM_BANDS],
        settings: &[BandSettings; NUM_BANDS],
        output: &mut [StereoSample],
    ) {
        output.fill(StereoSample::silence());

        for (band, audible) in bands.iter().zip(audible_bands(settings)) {
            if !audible {
                continue;
            }
            for (dst, src) in output.iter_mut().zip(band.iter()) {
                *dst += *src;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Band;

    const SR: f32 = 48000.0;

    /// Band buffers holding 1.0 / 10.0 / 100.0 so every subset sums uniquely
    fn bands() -> [StereoBuffer; NUM_BANDS] {
        [1.0, 10.0, 100.0].map(|v| StereoBuffer::from_vec(vec![StereoSample::mono(v); 8]))
    }

    fn mixed(settings: &[BandSettings; NUM_BANDS]) -> f32 {
        let bus = MixBus::new(SR, 0.05, 0.0, 0.0);
        let mut out = vec![StereoSample::mono(-5.0); 8];
        bus.mix(&bands(), settings, &mut out);
        assert!(out.iter().all(|s| s.left == out[0].left && s.right == out[0].left));
        out[0].left
    }

    fn with(f: impl Fn(&mut ParamSnapshot)) -> [BandSettings; NUM_BANDS] {
        let mut snap = ParamSnapshot::default();
        f(&mut snap);
        snap.bands
    }

    #[test]
    fn test_all_bands_by_default() {
        assert_eq!(mixed(&with(|_| {})), 111.0);
    }

    #[test]
    fn test_mute_removes_band() {
        assert_eq!(mixed(&with(|s| s.band_mut(Band::Mid).muted = true)), 101.0);
        assert_eq!(
            mixed(&with(|s| {
                for b in Band::ALL {
                    s.band_mut(b).muted = true;
                }
            })),
            0.0
        );
    }

    #[test]
    fn test_solo_takes_precedence() {
        // Solo Mid, mute Low: only Mid
        let settings = with(|s| {
            s.band_mut(Band::Mid).soloed = true;
            s.band_mut(Band::Low).muted = true;
        });
        assert_eq!(mixed(&settings), 10.0);

        // Soloed and muted together: still heard
        let settings = with(|s| {
            s.band_mut(Band::High).soloed = true;
            s.band_mut(Band::High).muted = true;
        });
        assert_eq!(mixed(&settings), 100.0);

        // Two solos
        let settings = with(|s| {
            s.band_mut(Band::Low).soloed = true;
            s.band_mut(Band::High).soloed = true;
        });
        assert_eq!(mixed(&settings), 101.0);
    }

    #[test]
    fn test_soloed_muted_mid_is_the_only_band() {
        let settings = with(|s| {
            s.band_mut(Band::Mid).soloed = true;
            s.band_mut(Band::Mid).muted = true;
        });
        assert_eq!(audible_bands(&settings), [false, true, false]);
        assert_eq!(mixed(&settings), 10.0);
    }

    #[test]
    fn test_muted_mid_keeps_low_and_high_whatever_bypass() {
        for bypass in 0..8 {
            let settings = with(|s| {
                s.band_mut(Band::Mid).muted = true;
                for b in Band::ALL {
                    s.band_mut(b).bypassed = bypass & (1 << b.index()) != 0;
                }
            });
            assert_eq!(mixed(&settings), 101.0, "bypass mask {:03b}", bypass);
        }
    }

    #[test]
    fn test_bypass_never_excludes() {
        let settings = with(|s| {
            for b in Band::ALL {
                s.band_mut(b).bypassed = true;
            }
        });
        assert_eq!(mixed(&settings), 111.0);
    }

    #[test]
    fn test_trims_ramp_to_snapshot() {
        let mut bus = MixBus::new(SR, 0.01, 0.0, 0.0);
        let mut snap = ParamSnapshot::default();
        snap.gain_out_db = -6.0;
        bus.set_trims(&snap);

        assert!(!bus.input_trim().is_smoothing());
        assert!(bus.output_trim().is_smoothing());

        let mut block = vec![StereoSample::mono(1.0); 1024];
        bus.apply_output_trim(&mut block);
        assert!(!bus.output_trim().is_smoothing());
        assert!((block[1023].left - 0.501_187).abs() < 1e-5);

        bus.snap_trims(6.0, 0.0);
        assert!((bus.input_trim().current_gain() - 1.995_262).abs() < 1e-5);
        assert_eq!(bus.output_trim().current_gain(), 1.0);
    }
}
