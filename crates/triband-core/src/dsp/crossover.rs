//! Linkwitz-Riley Crossover Network
//!
//! Splits audio into three bands (low / mid / high) with Linkwitz-Riley
//! 24dB/oct filters. The three bands sum back to a signal with flat
//! magnitude response; only the phase is rotated.
//!
//! ## How it works
//!
//! A Linkwitz-Riley filter is two cascaded 2-pole Butterworth sections
//! (damping R2 = √2). Each section is a trapezoidal (TPT) state-variable
//! filter, which stays stable under fast cutoff changes.
//!
//! The network uses five filters:
//!
//! ```text
//! input ─┬─ LP1(f1) ── AP2(f2) ──────────── low
//!        └─ HP1(f1) ─┬─ LP2(f2) ─────────── mid
//!                    └─ HP2(f2) ─────────── high
//! ```
//!
//! LP4 + HP4 at the same cutoff equals the 2nd-order all-pass at that
//! cutoff, so `mid + high = AP2(HP1(x))`. Passing the low band through AP2
//! puts all three bands on the same phase curve and the sum becomes
//! `AP(f1) · AP(f2) · x`, which has unity magnitude at every frequency.

use crate::types::{StereoBuffer, StereoSample, NUM_BANDS};

/// Damping of each Butterworth section (√2)
const R2: f64 = std::f64::consts::SQRT_2;

/// Lowest cutoff the filter will accept
const MIN_CUTOFF: f32 = 20.0;

/// Highest cutoff as a fraction of the sample rate (keeps tan() finite)
const MAX_CUTOFF_RATIO: f32 = 0.49;

/// Filter response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    /// 24 dB/oct low-pass
    Lowpass,
    /// 24 dB/oct high-pass
    Highpass,
    /// 2nd-order all-pass (phase match of an LP4/HP4 pair)
    Allpass,
}

/// Linkwitz-Riley filter with independent state per channel
#[derive(Debug, Clone)]
pub struct LinkwitzRileyFilter {
    filter_type: FilterType,
    cutoff: f32,
    sample_rate: f32,
    // Coefficients
    g: f32,
    r2: f32,
    h: f32,
    // Integrator state per channel (left/right), first section
    s1: [f32; 2],
    s2: [f32; 2],
    // Second section (unused by the all-pass)
    s3: [f32; 2],
    s4: [f32; 2],
}

impl LinkwitzRileyFilter {
    pub fn new(filter_type: FilterType, cutoff: f32, sample_rate: f32) -> Self {
        let mut filter = Self {
            filter_type,
            cutoff,
            sample_rate,
            g: 0.0,
            r2: R2 as f32,
            h: 0.0,
            s1: [0.0; 2],
            s2: [0.0; 2],
            s3: [0.0; 2],
            s4: [0.0; 2],
        };
        filter.update_coefficients();
        filter
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff
    }

    /// Set the cutoff frequency in Hz
    ///
    /// A value equal to the current cutoff is a no-op: coefficients and
    /// state are left exactly as they were.
    pub fn set_cutoff(&mut self, cutoff: f32) {
        if cutoff == self.cutoff {
            return;
        }
        self.cutoff = cutoff;
        self.update_coefficients();
    }

    /// Change the sample rate. Clears all filter state.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.update_coefficients();
        self.reset();
    }

    fn update_coefficients(&mut self) {
        let fc = self
            .cutoff
            .max(MIN_CUTOFF)
            .min(self.sample_rate * MAX_CUTOFF_RATIO) as f64;
        let g = (std::f64::consts::PI * fc / self.sample_rate as f64).tan();
        let h = 1.0 / (1.0 + R2 * g + g * g);
        self.g = g as f32;
        self.h = h as f32;
    }

    /// Process one sample on one channel (0 = left, 1 = right)
    #[inline]
    fn process_sample(&mut self, channel: usize, input: f32) -> f32 {
        let (g, r2, h) = (self.g, self.r2, self.h);

        let y_h = (input - (r2 + g) * self.s1[channel] - self.s2[channel]) * h;
        let y_b = g * y_h + self.s1[channel];
        self.s1[channel] = g * y_h + y_b;
        let y_l = g * y_b + self.s2[channel];
        self.s2[channel] = g * y_b + y_l;

        if self.filter_type == FilterType::Allpass {
            return y_l - r2 * y_b + y_h;
        }

        let x2 = match self.filter_type {
            FilterType::Lowpass => y_l,
            _ => y_h,
        };
        let y_h2 = (x2 - (r2 + g) * self.s3[channel] - self.s4[channel]) * h;
        let y_b2 = g * y_h2 + self.s3[channel];
        self.s3[channel] = g * y_h2 + y_b2;
        let y_l2 = g * y_b2 + self.s4[channel];
        self.s4[channel] = g * y_b2 + y_l2;

        match self.filter_type {
            FilterType::Lowpass => y_l2,
            _ => y_h2,
        }
    }

    /// Filter a block in place
    pub fn process(&mut self, samples: &mut [StereoSample]) {
        for sample in samples.iter_mut() {
            sample.left = self.process_sample(0, sample.left);
            sample.right = self.process_sample(1, sample.right);
        }
    }

    /// Clear all filter state
    pub fn reset(&mut self) {
        self.s1 = [0.0; 2];
        self.s2 = [0.0; 2];
        self.s3 = [0.0; 2];
        self.s4 = [0.0; 2];
    }
}

/// Three-band Linkwitz-Riley crossover
///
/// ## Usage
///
/// ```ignore
/// let mut crossover = CrossoverNetwork::new(48000.0);
/// crossover.set_frequencies(400.0, 2000.0);
///
/// // bands[0] = low, bands[1] = mid, bands[2] = high
/// crossover.split(input.as_slice(), &mut bands);
/// ```
#[derive(Debug, Clone)]
pub struct CrossoverNetwork {
    lp1: LinkwitzRileyFilter,
    hp1: LinkwitzRileyFilter,
    ap2: LinkwitzRileyFilter,
    lp2: LinkwitzRileyFilter,
    hp2: LinkwitzRileyFilter,
}

impl CrossoverNetwork {
    /// Default Low/Mid split in Hz
    pub const DEFAULT_LOW_MID: f32 = 400.0;
    /// Default Mid/High split in Hz
    pub const DEFAULT_MID_HIGH: f32 = 2000.0;

    pub fn new(sample_rate: f32) -> Self {
        let f1 = Self::DEFAULT_LOW_MID;
        let f2 = Self::DEFAULT_MID_HIGH;
        Self {
            lp1: LinkwitzRileyFilter::new(FilterType::Lowpass, f1, sample_rate),
            hp1: LinkwitzRileyFilter::new(FilterType::Highpass, f1, sample_rate),
            ap2: LinkwitzRileyFilter::new(FilterType::Allpass, f2, sample_rate),
            lp2: LinkwitzRileyFilter::new(FilterType::Lowpass, f2, sample_rate),
            hp2: LinkwitzRileyFilter::new(FilterType::Highpass, f2, sample_rate),
        }
    }

    /// Set both crossover points
    ///
    /// Filters only recompute coefficients for a frequency that changed.
    /// `low_mid < mid_high` is expected but not checked.
    pub fn set_frequencies(&mut self, low_mid: f32, mid_high: f32) {
        self.lp1.set_cutoff(low_mid);
        self.hp1.set_cutoff(low_mid);
        self.ap2.set_cutoff(mid_high);
        self.lp2.set_cutoff(mid_high);
        self.hp2.set_cutoff(mid_high);
    }

    /// Current (low_mid, mid_high) crossover frequencies
    pub fn frequencies(&self) -> (f32, f32) {
        (self.lp1.cutoff(), self.lp2.cutoff())
    }

    /// Change the sample rate. Clears all filter state.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        for filter in self.filters_mut() {
            filter.set_sample_rate(sample_rate);
        }
    }

    /// Split `input` into the three band buffers
    ///
    /// Each band buffer takes the length of `input`; its capacity must
    /// already cover it.
    pub fn split(&mut self, input: &[StereoSample], bands: &mut [StereoBuffer; NUM_BANDS]) {
        let [low, mid, high] = bands;

        low.copy_from_slice(input);
        mid.copy_from_slice(input);

        // Path A: low band, phase-matched to the f2 split
        self.lp1.process(low.as_mut_slice());
        self.ap2.process(low.as_mut_slice());

        // Path B/C: everything above f1, split again at f2
        self.hp1.process(mid.as_mut_slice());
        high.copy_from(mid);
        self.lp2.process(mid.as_mut_slice());
        self.hp2.process(high.as_mut_slice());
    }

    /// Clear all filter state
    pub fn reset(&mut self) {
        for filter in self.filters_mut() {
            filter.reset();
        }
    }

    fn filters_mut(&mut self) -> [&mut LinkwitzRileyFilter; 5] {
        [
            &mut self.lp1,
            &mut self.hp1,
            &mut self.ap2,
            &mut self.lp2,
            &mut self.hp2,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 48000.0;

    fn sine(freq: f32, len: usize) -> Vec<StereoSample> {
        (0..len)
            .map(|n| {
                let v = (2.0 * std::f64::consts::PI * freq as f64 * n as f64 / SR as f64).sin() as f32;
                StereoSample::mono(v * 0.5)
            })
            .collect()
    }

    fn band_buffers(len: usize) -> [StereoBuffer; NUM_BANDS] {
        std::array::from_fn(|_| StereoBuffer::with_capacity(len))
    }

    fn rms(samples: &[f32]) -> f64 {
        let sum: f64 = samples.iter().map(|&s| (s as f64).powi(2)).sum();
        (sum / samples.len() as f64).sqrt()
    }

    /// Split a signal and return the per-sample band sum (left channel)
    fn split_and_sum(network: &mut CrossoverNetwork, input: &[StereoSample]) -> Vec<f32> {
        let mut bands = band_buffers(input.len());
        network.split(input, &mut bands);
        (0..input.len())
            .map(|i| bands[0][i].left + bands[1][i].left + bands[2][i].left)
            .collect()
    }

    #[test]
    fn test_dc_sums_to_unity() {
        let mut network = CrossoverNetwork::new(SR);
        let input = vec![StereoSample::new(1.0, 1.0); 20000];
        let sum = split_and_sum(&mut network, &input);

        let last = sum[sum.len() - 1];
        assert!(
            (last - 1.0).abs() < 0.001,
            "LR24 bands should sum to unity after settling, got {}",
            last
        );
    }

    #[test]
    fn test_flat_reconstruction_across_spectrum() {
        // Every test tone completes a whole number of cycles in the window
        let len = 48000;
        let window = 24000..48000;

        for freq in [50.0, 200.0, 400.0, 1000.0, 2000.0, 5000.0, 12000.0] {
            let mut network = CrossoverNetwork::new(SR);
            network.set_frequencies(400.0, 2000.0);

            let input = sine(freq, len);
            let sum = split_and_sum(&mut network, &input);

            let input_left: Vec<f32> = input.iter().map(|s| s.left).collect();
            let ratio_db = 20.0
                * (rms(&sum[window.clone()]) / rms(&input_left[window.clone()])).log10();

            assert!(
                ratio_db.abs() < 0.1,
                "band sum at {} Hz deviates by {:.4} dB",
                freq,
                ratio_db
            );
        }
    }

    #[test]
    fn test_flat_reconstruction_at_range_edges() {
        // One second to settle, then one second (whole cycles) measured
        let pairs = [(20.0, 1000.0), (999.0, 1000.0), (999.0, 20000.0), (20.0, 20000.0)];

        for sr in [8000.0_f32, 44100.0, 48000.0] {
            let len = 2 * sr as usize;
            let window = sr as usize..len;

            for (low_mid, mid_high) in pairs {
                for freq in [30.0, 300.0, 1000.0, 3000.0] {
                    let mut network = CrossoverNetwork::new(sr);
                    network.set_frequencies(low_mid, mid_high);

                    let input: Vec<StereoSample> = (0..len)
                        .map(|n| {
                            let phase = 2.0 * std::f64::consts::PI * freq * n as f64 / sr as f64;
                            StereoSample::mono(0.5 * phase.sin() as f32)
                        })
                        .collect();
                    let sum = split_and_sum(&mut network, &input);

                    let input_left: Vec<f32> = input.iter().map(|s| s.left).collect();
                    let ratio_db = 20.0
                        * (rms(&sum[window.clone()]) / rms(&input_left[window.clone()])).log10();

                    assert!(
                        ratio_db.abs() < 0.1,
                        "{}/{} Hz at {} Hz: {} Hz tone deviates by {:.4} dB",
                        low_mid,
                        mid_high,
                        sr,
                        freq,
                        ratio_db
                    );
                }
            }
        }
    }

    #[test]
    fn test_bands_carry_their_range() {
        let len = 48000;
        let energy = |freq: f32| {
            let mut network = CrossoverNetwork::new(SR);
            let mut bands = band_buffers(len);
            network.split(&sine(freq, len), &mut bands);
            bands.map(|b| {
                let left: Vec<f32> = b.as_slice()[24000..].iter().map(|s| s.left).collect();
                rms(&left)
            })
        };

        let e = energy(60.0);
        assert!(e[0] > e[1] * 10.0 && e[0] > e[2] * 10.0, "60 Hz: {:?}", e);

        let e = energy(1000.0);
        assert!(e[1] > e[0] && e[1] > e[2], "1 kHz: {:?}", e);

        let e = energy(10000.0);
        assert!(e[2] > e[0] * 10.0 && e[2] > e[1] * 10.0, "10 kHz: {:?}", e);
    }

    #[test]
    fn test_unchanged_frequency_is_bit_identical() {
        let input = sine(1000.0, 4096);
        let mut steady = CrossoverNetwork::new(SR);
        let mut refreshed = CrossoverNetwork::new(SR);
        steady.set_frequencies(300.0, 3000.0);
        refreshed.set_frequencies(300.0, 3000.0);

        let mut a = band_buffers(512);
        let mut b = band_buffers(512);

        for block in input.chunks(512) {
            refreshed.set_frequencies(300.0, 3000.0);
            steady.split(block, &mut a);
            refreshed.split(block, &mut b);
            for band in 0..NUM_BANDS {
                assert_eq!(a[band].as_slice(), b[band].as_slice());
            }
        }
    }

    #[test]
    fn test_frequencies_and_reset() {
        let mut network = CrossoverNetwork::new(SR);
        assert_eq!(network.frequencies(), (400.0, 2000.0));

        network.set_frequencies(120.0, 8000.0);
        assert_eq!(network.frequencies(), (120.0, 8000.0));

        // After a reset the network behaves like a fresh one
        let input = sine(500.0, 1024);
        let mut fresh = network.clone();
        let mut bands = band_buffers(1024);
        network.split(&input, &mut bands);
        network.reset();
        fresh.reset();

        let mut a = band_buffers(1024);
        let mut b = band_buffers(1024);
        network.split(&input, &mut a);
        fresh.split(&input, &mut b);
        assert_eq!(a[1].as_slice(), b[1].as_slice());
    }

    #[test]
    fn test_cutoff_near_nyquist_stays_finite() {
        let mut filter = LinkwitzRileyFilter::new(FilterType::Highpass, 30000.0, 44100.0);
        let mut block = sine(1000.0, 256);
        filter.process(&mut block);
        assert!(block.iter().all(|s| s.left.is_finite() && s.right.is_finite()));
        assert_eq!(filter.cutoff(), 30000.0);
    }
}
