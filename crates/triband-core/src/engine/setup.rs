//! Processing setup - sample rate and block size limits

use crate::error::{EngineError, EngineResult};

/// Maximum block size to pre-allocate (covers typical host configurations)
/// Common values: 64, 128, 256, 512, 1024, 2048, 4096 frames
pub const MAX_BUFFER_SIZE: usize = 8192;

/// Default block size when none is configured (frames)
pub const DEFAULT_BUFFER_SIZE: usize = 512;

/// Default sample rate (48kHz)
pub const DEFAULT_SAMPLE_RATE: u32 = 48000;

/// Supported sample rate range in Hz
pub const MIN_SAMPLE_RATE: u32 = 8000;
pub const MAX_SAMPLE_RATE: u32 = 384_000;

/// Sample rate and block size for a processing session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessSetup {
    pub sample_rate: u32,
    /// Largest block the host will pass; scratch buffers are sized to this
    pub max_block_size: usize,
}

impl ProcessSetup {
    pub fn new(sample_rate: u32, max_block_size: usize) -> Self {
        Self {
            sample_rate,
            max_block_size,
        }
    }

    /// Check that the engine can run with this setup
    pub fn validate(&self) -> EngineResult<()> {
        if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&self.sample_rate) {
            return Err(EngineError::InvalidSampleRate(self.sample_rate));
        }
        validate_block_size(self.max_block_size)
    }

    /// Block duration in milliseconds
    pub fn block_ms(&self) -> f32 {
        self.max_block_size as f32 / self.sample_rate as f32 * 1000.0
    }
}

impl Default for ProcessSetup {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE, DEFAULT_BUFFER_SIZE)
    }
}

pub(crate) fn validate_block_size(size: usize) -> EngineResult<()> {
    if size == 0 || size > MAX_BUFFER_SIZE {
        return Err(EngineError::InvalidBlockSize {
            size,
            max: MAX_BUFFER_SIZE,
        });
    }
    Ok(())
}
