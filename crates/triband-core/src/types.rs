//! Common types for Triband
//!
//! Fundamental audio types shared by the DSP stages and the engine: stereo
//! samples and buffers, plus the fixed band enumeration.

use std::ops::{Index, IndexMut};

/// Number of frequency bands produced by the crossover
pub const NUM_BANDS: usize = 3;

/// Audio sample type (32-bit float throughout the processing path)
pub type Sample = f32;

/// Frequency band identifiers, ordered from low to high
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum Band {
    Low = 0,
    Mid = 1,
    High = 2,
}

impl Band {
    /// All bands in ascending frequency order
    pub const ALL: [Band; NUM_BANDS] = [Band::Low, Band::Mid, Band::High];

    /// Array index for per-band tables
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Display name used in parameter names ("Low", "Mid", "High")
    pub fn name(&self) -> &'static str {
        match self {
            Band::Low => "Low",
            Band::Mid => "Mid",
            Band::High => "High",
        }
    }
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} Band", self.name())
    }
}

/// A single stereo sample (left and right channels)
///
/// `#[repr(C)]` keeps the layout `[left, right]`, so a `&[StereoSample]` can
/// be viewed as interleaved `&[f32]` through bytemuck without copying.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct StereoSample {
    pub left: Sample,
    pub right: Sample,
}

impl StereoSample {
    #[inline]
    pub fn new(left: Sample, right: Sample) -> Self {
        Self { left, right }
    }

    #[inline]
    pub fn silence() -> Self {
        Self::default()
    }

    /// Same value in both channels (mono sources are duplicated this way)
    #[inline]
    pub fn mono(value: Sample) -> Self {
        Self { left: value, right: value }
    }

    /// Peak amplitude (max of abs(left), abs(right))
    #[inline]
    pub fn peak(&self) -> Sample {
        self.left.abs().max(self.right.abs())
    }
}

impl std::ops::AddAssign for StereoSample {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.left += other.left;
        self.right += other.right;
    }
}

impl std::ops::MulAssign<Sample> for StereoSample {
    #[inline]
    fn mul_assign(&mut self, factor: Sample) {
        self.left *= factor;
        self.right *= factor;
    }
}

/// A buffer of stereo samples
///
/// The engine pre-allocates these at the maximum block size and then only
/// moves the working length around with [`StereoBuffer::set_len_from_capacity`],
/// so the audio path never allocates.
#[derive(Debug, Clone, Default)]
pub struct StereoBuffer {
    samples: Vec<StereoSample>,
}

impl StereoBuffer {
    /// Create an empty buffer with the specified capacity (in stereo samples)
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
        }
    }

    /// Create a buffer filled with silence
    pub fn silence(len: usize) -> Self {
        Self {
            samples: vec![StereoSample::silence(); len],
        }
    }

    /// Create a buffer from interleaved samples [L, R, L, R, ...]
    ///
    /// A trailing odd sample is dropped.
    pub fn from_interleaved(interleaved: &[Sample]) -> Self {
        let samples = interleaved
            .chunks_exact(2)
            .map(|chunk| StereoSample::new(chunk[0], chunk[1]))
            .collect();
        Self { samples }
    }

    /// Create a buffer holding the same signal in both channels
    pub fn from_mono(mono: &[Sample]) -> Self {
        Self {
            samples: mono.iter().map(|&s| StereoSample::mono(s)).collect(),
        }
    }

    pub fn from_vec(samples: Vec<StereoSample>) -> Self {
        Self { samples }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.samples.capacity()
    }

    /// Set the working length of a pre-allocated buffer (real-time safe)
    ///
    /// Newly exposed elements are filled with silence. Must not exceed the
    /// capacity reserved at construction.
    #[inline]
    pub fn set_len_from_capacity(&mut self, new_len: usize) {
        if new_len > self.samples.len() {
            debug_assert!(
                new_len <= self.samples.capacity(),
                "set_len_from_capacity called with len > capacity"
            );
            self.samples.resize(new_len, StereoSample::silence());
        } else {
            self.samples.truncate(new_len);
        }
    }

    #[inline]
    pub fn as_slice(&self) -> &[StereoSample] {
        &self.samples
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [StereoSample] {
        &mut self.samples
    }

    /// Zero-copy view of the samples as interleaved f32 [L, R, L, R, ...]
    #[inline]
    pub fn as_interleaved(&self) -> &[Sample] {
        bytemuck::cast_slice(&self.samples)
    }

    /// Copy from a slice, taking its length (real-time safe if pre-allocated)
    ///
    /// Does not allocate when `self.capacity() >= src.len()`.
    pub fn copy_from_slice(&mut self, src: &[StereoSample]) {
        debug_assert!(
            src.len() <= self.samples.capacity(),
            "copy_from_slice: insufficient capacity ({} < {})",
            self.samples.capacity(),
            src.len()
        );
        self.set_len_from_capacity(src.len());
        self.samples.copy_from_slice(src);
    }

    /// Copy from another buffer (real-time safe if pre-allocated)
    pub fn copy_from(&mut self, other: &StereoBuffer) {
        self.copy_from_slice(&other.samples);
    }

    #[inline]
    pub fn push(&mut self, sample: StereoSample) {
        self.samples.push(sample);
    }

    pub fn iter(&self) -> impl Iterator<Item = &StereoSample> {
        self.samples.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut StereoSample> {
        self.samples.iter_mut()
    }

    /// Peak amplitude across the buffer
    pub fn peak(&self) -> Sample {
        self.samples.iter().map(|s| s.peak()).fold(0.0, Sample::max)
    }

    /// Level of the buffer: the mean of the left and right channel RMS values
    ///
    /// An empty buffer reads as silence.
    pub fn rms(&self) -> Sample {
        if self.samples.is_empty() {
            return 0.0;
        }
        let (sum_l, sum_r) = self
            .samples
            .iter()
            .fold((0.0_f64, 0.0_f64), |(l, r), s| {
                (l + (s.left as f64).powi(2), r + (s.right as f64).powi(2))
            });
        let n = self.samples.len() as f64;
        (((sum_l / n).sqrt() + (sum_r / n).sqrt()) * 0.5) as Sample
    }
}

impl Index<usize> for StereoBuffer {
    type Output = StereoSample;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.samples[index]
    }
}

impl IndexMut<usize> for StereoBuffer {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.samples[index]
    }
}
