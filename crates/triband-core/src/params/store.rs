//! Lock-free parameter store
//!
//! One [`AtomicF32`] per parameter, shared between the control thread (UI,
//! automation, CLI) and the audio thread via `Arc<ParameterStore>`. Writes
//! are sanitized against the parameter's declared spec before they land, so
//! the audio thread never sees an out-of-range value.
//!
//! # Usage
//!
//! ```ignore
//! let store = Arc::new(ParameterStore::new());
//!
//! // Control thread
//! store.set(ParamId::Threshold(Band::Low), -18.0);
//! store.set_global_bypass(true);
//!
//! // Audio thread, once per block
//! let snapshot = store.snapshot();
//! ```

use super::atomic::AtomicF32;
use super::id::{ParamId, ParamKind, NUM_PARAMS, RATIO_CHOICES};
use super::snapshot::{BandSettings, ParamSnapshot};
use crate::error::{EngineError, EngineResult};
use crate::types::Band;

/// Per-band routing flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BandFlag {
    Bypassed,
    Mute,
    Solo,
}

impl BandFlag {
    pub const ALL: [BandFlag; 3] = [BandFlag::Bypassed, BandFlag::Mute, BandFlag::Solo];

    /// Parameter holding this flag for a band
    pub fn param(self, band: Band) -> ParamId {
        match self {
            BandFlag::Bypassed => ParamId::Bypassed(band),
            BandFlag::Mute => ParamId::Mute(band),
            BandFlag::Solo => ParamId::Solo(band),
        }
    }
}

/// Current value of every parameter
pub struct ParameterStore {
    values: [AtomicF32; NUM_PARAMS],
}

impl ParameterStore {
    /// Create a store holding every parameter's default
    pub fn new() -> Self {
        Self {
            values: std::array::from_fn(|i| AtomicF32::new(ParamId::ALL[i].spec().default)),
        }
    }

    /// Raw value: Hz, dB, ms, choice index or 0/1
    #[inline]
    pub fn get(&self, id: ParamId) -> f32 {
        self.values[id.index()].load()
    }

    /// Write a raw value, clamped and snapped to the parameter's domain
    ///
    /// Returns the value actually stored.
    pub fn set(&self, id: ParamId, value: f32) -> f32 {
        let sanitized = id.spec().sanitize(value);
        self.values[id.index()].store(sanitized);
        sanitized
    }

    #[inline]
    pub fn get_bool(&self, id: ParamId) -> bool {
        self.get(id) >= 0.5
    }

    pub fn set_bool(&self, id: ParamId, on: bool) {
        self.set(id, if on { 1.0 } else { 0.0 });
    }

    /// Choice index of a choice parameter (0 for other kinds)
    pub fn choice_index(&self, id: ParamId) -> usize {
        match id.spec().kind {
            ParamKind::Choice { .. } => self.get(id).max(0.0) as usize,
            _ => 0,
        }
    }

    /// Compression ratio selected for a band
    pub fn ratio(&self, band: Band) -> f32 {
        let idx = self.choice_index(ParamId::Ratio(band));
        RATIO_CHOICES[idx.min(RATIO_CHOICES.len() - 1)]
    }

    /// Select the listed ratio closest to `ratio`
    pub fn set_ratio(&self, band: Band, ratio: f32) {
        let idx = nearest_ratio_index(ratio);
        self.set(ParamId::Ratio(band), idx as f32);
    }

    /// Bypass or un-bypass all three bands together
    pub fn set_global_bypass(&self, bypassed: bool) {
        for band in Band::ALL {
            self.set_bool(ParamId::Bypassed(band), bypassed);
        }
    }

    /// True when every band is bypassed
    pub fn is_global_bypass(&self) -> bool {
        Band::ALL.iter().all(|&b| self.get_bool(ParamId::Bypassed(b)))
    }

    /// Toggle a band flag the way the band buttons do
    ///
    /// Turning a flag on clears the band's other two flags. Turning it off
    /// leaves the others alone. Use [`ParameterStore::set_bool`] to set any
    /// combination directly.
    pub fn set_band_flag_exclusive(&self, band: Band, flag: BandFlag, on: bool) {
        if on {
            for other in BandFlag::ALL.iter().filter(|&&f| f != flag) {
                self.set_bool(other.param(band), false);
            }
        }
        self.set_bool(flag.param(band), on);
    }

    /// Write a parameter by display name
    ///
    /// Ratio parameters take the ratio itself (4 for 4:1) and select the
    /// nearest listed ratio. Returns the raw value stored.
    pub fn set_by_name(&self, name: &str, value: f32) -> EngineResult<(ParamId, f32)> {
        let id = ParamId::from_name(name)
            .ok_or_else(|| EngineError::UnknownParameter(name.trim().to_string()))?;
        match id {
            ParamId::Ratio(band) => self.set_ratio(band, value),
            _ => {
                self.set(id, value);
            }
        }
        Ok((id, self.get(id)))
    }

    /// Apply a `"Name=value"` assignment
    ///
    /// Flags also accept `on`/`off`/`true`/`false`.
    pub fn apply_assignment(&self, assignment: &str) -> EngineResult<(ParamId, f32)> {
        let (name, raw) = assignment
            .split_once('=')
            .ok_or_else(|| EngineError::InvalidAssignment(assignment.to_string()))?;
        let raw = raw.trim();
        let value = match raw.to_ascii_lowercase().as_str() {
            "on" | "true" => 1.0,
            "off" | "false" => 0.0,
            _ => raw
                .parse::<f32>()
                .map_err(|_| EngineError::InvalidAssignment(assignment.to_string()))?,
        };
        self.set_by_name(name, value)
    }

    /// Restore every parameter to its default
    pub fn reset_to_defaults(&self) {
        for id in ParamId::ALL {
            self.values[id.index()].store(id.spec().default);
        }
    }

    /// Read every parameter once into a plain-data snapshot
    pub fn snapshot(&self) -> ParamSnapshot {
        let bands = Band::ALL.map(|band| BandSettings {
            attack_ms: self.get(ParamId::Attack(band)),
            release_ms: self.get(ParamId::Release(band)),
            threshold_db: self.get(ParamId::Threshold(band)),
            ratio: self.ratio(band),
            bypassed: self.get_bool(ParamId::Bypassed(band)),
            muted: self.get_bool(ParamId::Mute(band)),
            soloed: self.get_bool(ParamId::Solo(band)),
        });

        ParamSnapshot {
            low_mid_hz: self.get(ParamId::LowMidCrossover),
            mid_high_hz: self.get(ParamId::MidHighCrossover),
            bands,
            gain_in_db: self.get(ParamId::GainIn),
            gain_out_db: self.get(ParamId::GainOut),
        }
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Index of the listed ratio closest to `ratio` (ratios below 1 map to 1:1)
pub fn nearest_ratio_index(ratio: f32) -> usize {
    let ratio = if ratio.is_nan() { 1.0 } else { ratio.max(1.0) };
    RATIO_CHOICES
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| (*a - ratio).abs().total_cmp(&(*b - ratio).abs()))
        .map(|(i, _)| i)
        .unwrap_or(0)
}
