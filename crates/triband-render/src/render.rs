//! Offline rendering: WAV in → engine → WAV out

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use triband_core::config::EngineConfig;
use triband_core::dsp::BandLevels;
use triband_core::engine::SignalEngine;
use triband_core::params::ParameterStore;
use triband_core::{Band, StereoBuffer, NUM_BANDS};

use crate::wav::{read_wav, write_wav};

/// Options for one render
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub config: EngineConfig,
    /// `"Name=value"` assignments applied after the config's parameters
    pub assignments: Vec<String>,
    /// Bypass compression on all bands
    pub bypass_all: bool,
}

/// What a render produced
#[derive(Debug, Clone)]
pub struct RenderSummary {
    pub frames: usize,
    pub sample_rate: u32,
    pub blocks: usize,
    /// Band levels of the final block
    pub levels: [BandLevels; NUM_BANDS],
    pub input_peak: f32,
    pub output_peak: f32,
}

/// Build a parameter store from render options
pub fn build_store(options: &RenderOptions) -> Result<Arc<ParameterStore>> {
    let store = Arc::new(ParameterStore::new());
    options
        .config
        .apply_params(&store)
        .context("Invalid parameter in config")?;

    for assignment in &options.assignments {
        let (id, value) = store
            .apply_assignment(assignment)
            .with_context(|| format!("Invalid --set {:?}", assignment))?;
        log::info!("{} = {}", id, id.spec().display(value));
    }

    if options.bypass_all {
        store.set_global_bypass(true);
        log::info!("All bands bypassed");
    }
    Ok(store)
}

/// Render `input` through the engine into `output`
pub fn render_file(input: &Path, output: &Path, options: &RenderOptions) -> Result<RenderSummary> {
    let audio = read_wav(input)?;
    let store = build_store(options)?;

    let setup = options.config.process_setup(audio.sample_rate);
    let mut engine = SignalEngine::with_trim_ramp(setup, store, options.config.trim_ramp_secs)
        .context("Failed to set up engine")?;

    let mut rendered = StereoBuffer::with_capacity(audio.buffer.len());
    let mut block = StereoBuffer::with_capacity(setup.max_block_size);
    let mut blocks = 0;

    for chunk in audio.buffer.as_slice().chunks(setup.max_block_size) {
        block.copy_from_slice(chunk);
        engine.process(&mut block);
        for sample in block.iter() {
            rendered.push(*sample);
        }
        blocks += 1;

        if blocks % 100 == 0 {
            log::debug!(
                "block {}: low {:.1} dB, mid {:.1} dB, high {:.1} dB",
                blocks,
                engine.band_levels(Band::Low).output_rms_db,
                engine.band_levels(Band::Mid).output_rms_db,
                engine.band_levels(Band::High).output_rms_db
            );
        }
    }

    write_wav(output, &rendered, audio.sample_rate, audio.channels)?;

    Ok(RenderSummary {
        frames: rendered.len(),
        sample_rate: audio.sample_rate,
        blocks,
        levels: Band::ALL.map(|b| engine.band_levels(b)),
        input_peak: audio.buffer.peak(),
        output_peak: rendered.peak(),
    })
}
