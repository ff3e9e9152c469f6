//! Engine configuration
//!
//! Block size, trim ramp and an optional set of start-up parameter values,
//! keyed by parameter display name:
//!
//! ```yaml
//! block_size: 512
//! trim_ramp_secs: 0.05
//! params:
//!   Threshold Low Band: -18
//!   Ratio Low Band: 4        # ratio, not list index
//!   Mute High Band: 1
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dsp::DEFAULT_RAMP_SECS;
use crate::engine::{ProcessSetup, DEFAULT_BUFFER_SIZE};
use crate::error::EngineResult;
use crate::params::{ParamId, ParameterStore};

/// Engine configuration, loaded from YAML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Frames per processing block
    /// Default: 512
    pub block_size: usize,

    /// Duration of input/output trim ramps in seconds
    /// Default: 0.05
    pub trim_ramp_secs: f32,

    /// Start-up parameter values by display name
    /// Ratios are given as the ratio itself (e.g. 4 for 4:1).
    /// Default: empty (every parameter at its default)
    pub params: BTreeMap<String, f32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BUFFER_SIZE,
            trim_ramp_secs: DEFAULT_RAMP_SECS,
            params: BTreeMap::new(),
        }
    }
}

impl EngineConfig {
    /// Processing setup for this configuration at a sample rate
    pub fn process_setup(&self, sample_rate: u32) -> ProcessSetup {
        ProcessSetup::new(sample_rate, self.block_size)
    }

    /// Write the configured parameter values into a store
    ///
    /// Values are clamped like any other write. Fails on the first unknown
    /// parameter name, leaving earlier values applied. Returns the number of
    /// values applied.
    pub fn apply_params(&self, store: &ParameterStore) -> EngineResult<usize> {
        for (name, &value) in &self.params {
            let (id, stored) = store.set_by_name(name, value)?;
            log::debug!("EngineConfig: {} = {}", id, id.spec().display(stored));
        }
        Ok(self.params.len())
    }

    /// Record every current store value into `params`
    pub fn capture_params(&mut self, store: &ParameterStore) {
        self.params = ParamId::ALL
            .iter()
            .map(|&id| {
                let value = match id {
                    ParamId::Ratio(band) => store.ratio(band),
                    _ => store.get(id),
                };
                (id.name().to_string(), value)
            })
            .collect();
    }
}
