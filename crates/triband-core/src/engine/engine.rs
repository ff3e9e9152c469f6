//! Signal engine - ties together trim, crossover, compressors and mix bus
//!
//! Per block, strictly in this order:
//!
//! 1. snapshot every parameter once
//! 2. refresh crossover frequencies and trim targets
//! 3. input trim
//! 4. split into low / mid / high
//! 5. compress each band with its settings
//! 6. recombine under the solo/mute rules
//! 7. output trim
//! 8. publish the six meter values
//!
//! All scratch memory is allocated in [`SignalEngine::new`] and
//! [`SignalEngine::prepare`]; processing never allocates, locks or logs.

use std::sync::Arc;

use crate::dsp::{BandCompressor, BandLevels, CrossoverNetwork, DEFAULT_RAMP_SECS};
use crate::error::EngineResult;
use crate::params::ParameterStore;
use crate::types::{Band, StereoBuffer, StereoSample, NUM_BANDS};

use super::command::EngineCommand;
use super::meters::{BandMeters, MeterSink};
use super::mix_bus::MixBus;
use super::setup::{ProcessSetup, MAX_SAMPLE_RATE, MIN_SAMPLE_RATE};

/// The three-band compressor engine
///
/// Owned by the audio thread. Parameters come from a shared
/// [`ParameterStore`]; meter readings go out through [`BandMeters`].
pub struct SignalEngine {
    setup: ProcessSetup,
    store: Arc<ParameterStore>,
    crossover: CrossoverNetwork,
    compressors: [BandCompressor; NUM_BANDS],
    mix_bus: MixBus,
    trim_ramp_secs: f32,
    /// Pre-allocated band buffers (capacity = max block size)
    band_buffers: [StereoBuffer; NUM_BANDS],
    /// Pre-allocated copy of the input block
    input_buffer: StereoBuffer,
    meters: Arc<BandMeters>,
    /// Additional meter receiver, called after `meters`
    meter_sink: Option<Arc<dyn MeterSink>>,
}

impl SignalEngine {
    /// Create an engine for a sample rate and maximum block size
    ///
    /// Trims start at the store's current gains with no ramp.
    pub fn new(setup: ProcessSetup, store: Arc<ParameterStore>) -> EngineResult<Self> {
        Self::with_trim_ramp(setup, store, DEFAULT_RAMP_SECS)
    }

    /// Like [`SignalEngine::new`] with a custom trim ramp duration
    pub fn with_trim_ramp(
        setup: ProcessSetup,
        store: Arc<ParameterStore>,
        trim_ramp_secs: f32,
    ) -> EngineResult<Self> {
        setup.validate()?;

        let sample_rate = setup.sample_rate as f32;
        let trim_ramp_secs = trim_ramp_secs.max(0.0);
        let snapshot = store.snapshot();

        let mut crossover = CrossoverNetwork::new(sample_rate);
        crossover.set_frequencies(snapshot.low_mid_hz, snapshot.mid_high_hz);

        log::info!(
            "SignalEngine: {} Hz, max block {} frames ({:.1} ms), trim ramp {} s",
            setup.sample_rate,
            setup.max_block_size,
            setup.block_ms(),
            trim_ramp_secs
        );

        Ok(Self {
            setup,
            crossover,
            compressors: std::array::from_fn(|_| BandCompressor::new(sample_rate)),
            mix_bus: MixBus::new(
                sample_rate,
                trim_ramp_secs,
                snapshot.gain_in_db,
                snapshot.gain_out_db,
            ),
            trim_ramp_secs,
            band_buffers: std::array::from_fn(|_| StereoBuffer::with_capacity(setup.max_block_size)),
            input_buffer: StereoBuffer::with_capacity(setup.max_block_size),
            meters: Arc::new(BandMeters::new()),
            meter_sink: None,
            store,
        })
    }

    /// Reconfigure for a new sample rate / block size
    ///
    /// Grows the scratch buffers if needed and resets all state. Not real-time
    /// safe when the block size grows.
    pub fn prepare(&mut self, setup: ProcessSetup) -> EngineResult<()> {
        setup.validate()?;

        if setup.max_block_size > self.setup.max_block_size {
            for buffer in self.band_buffers.iter_mut() {
                *buffer = StereoBuffer::with_capacity(setup.max_block_size);
            }
            self.input_buffer = StereoBuffer::with_capacity(setup.max_block_size);
        }
        self.setup = setup;
        self.apply_sample_rate(setup.sample_rate);

        log::info!(
            "SignalEngine: prepared for {} Hz, max block {} frames",
            setup.sample_rate,
            setup.max_block_size
        );
        Ok(())
    }

    /// Clear filter, envelope and ramp state and drop the meters to the floor
    pub fn reset(&mut self) {
        self.crossover.reset();
        for compressor in self.compressors.iter_mut() {
            compressor.reset();
        }
        let snapshot = self.store.snapshot();
        self.mix_bus.snap_trims(snapshot.gain_in_db, snapshot.gain_out_db);
        self.meters.reset();
    }

    pub fn setup(&self) -> ProcessSetup {
        self.setup
    }

    pub fn sample_rate(&self) -> u32 {
        self.setup.sample_rate
    }

    /// Shared parameter store
    pub fn store(&self) -> Arc<ParameterStore> {
        Arc::clone(&self.store)
    }

    /// Lock-free meter handle for the UI
    pub fn meters(&self) -> Arc<BandMeters> {
        Arc::clone(&self.meters)
    }

    /// Also publish meter values to `sink`
    pub fn set_meter_sink(&mut self, sink: Option<Arc<dyn MeterSink>>) {
        self.meter_sink = sink;
    }

    /// Latest pre/post levels of a band's compressor
    pub fn band_levels(&self, band: Band) -> BandLevels {
        self.compressors[band.index()].levels()
    }

    pub fn crossover(&self) -> &CrossoverNetwork {
        &self.crossover
    }

    pub fn mix_bus(&self) -> &MixBus {
        &self.mix_bus
    }

    /// Apply pending commands (call from the audio thread between blocks)
    pub fn process_commands(&mut self, rx: &mut rtrb::Consumer<EngineCommand>) {
        while let Ok(cmd) = rx.pop() {
            self.handle_command(cmd);
        }
    }

    fn handle_command(&mut self, cmd: EngineCommand) {
        match cmd {
            EngineCommand::Reset => self.reset(),
            EngineCommand::SetSampleRate(rate) => {
                if (MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&rate) {
                    self.setup.sample_rate = rate;
                    self.apply_sample_rate(rate);
                } else {
                    log::warn!("SignalEngine: ignoring unsupported sample rate {} Hz", rate);
                }
            }
            EngineCommand::SetTrimRamp(secs) => {
                self.trim_ramp_secs = secs.max(0.0);
                self.mix_bus
                    .prepare(self.setup.sample_rate as f32, self.trim_ramp_secs);
            }
        }
    }

    /// Push a sample rate into every stage and clear state
    fn apply_sample_rate(&mut self, rate: u32) {
        let sample_rate = rate as f32;
        self.crossover.set_sample_rate(sample_rate);
        for compressor in self.compressors.iter_mut() {
            compressor.set_sample_rate(sample_rate);
        }
        self.mix_bus.prepare(sample_rate, self.trim_ramp_secs);
        self.reset();
    }

    /// Process a buffer in place
    ///
    /// Buffers longer than the maximum block size are processed as
    /// consecutive sub-blocks.
    pub fn process(&mut self, buffer: &mut StereoBuffer) {
        let max = self.setup.max_block_size;
        for block in buffer.as_mut_slice().chunks_mut(max) {
            self.input_buffer.copy_from_slice(block);
            self.process_block(block);
        }
    }

    /// Process `input` into `output`
    ///
    /// Never grows `output`: only as many frames as its capacity allows are
    /// processed, and `output` takes that length. Returns the number of
    /// frames written.
    pub fn process_into(&mut self, input: &StereoBuffer, output: &mut StereoBuffer) -> usize {
        let frames = input.len().min(output.capacity());
        output.set_len_from_capacity(frames);
        let max = self.setup.max_block_size;
        for (src, dst) in input.as_slice()[..frames]
            .chunks(max)
            .zip(output.as_mut_slice().chunks_mut(max))
        {
            self.input_buffer.copy_from_slice(src);
            self.process_block(dst);
        }
        frames
    }

    /// Run one block: `self.input_buffer` holds the input, `out` receives
    /// the result (same length)
    fn process_block(&mut self, out: &mut [StereoSample]) {
        // 1-2. One snapshot per block
        let snapshot = self.store.snapshot();
        self.crossover
            .set_frequencies(snapshot.low_mid_hz, snapshot.mid_high_hz);
        self.mix_bus.set_trims(&snapshot);

        // 3. Input trim
        self.mix_bus.apply_input_trim(self.input_buffer.as_mut_slice());

        // 4. Split
        self.crossover
            .split(self.input_buffer.as_slice(), &mut self.band_buffers);

        // 5. Compress
        for band in Band::ALL {
            let i = band.index();
            self.compressors[i].update(snapshot.band(band));
            self.compressors[i].process(&mut self.band_buffers[i]);
        }

        // 6. Recombine
        self.mix_bus.mix(&self.band_buffers, &snapshot.bands, out);

        // 7. Output trim
        self.mix_bus.apply_output_trim(out);

        // 8. Meters
        for band in Band::ALL {
            let levels = self.compressors[band.index()].levels();
            self.meters
                .publish(band, levels.input_rms_db, levels.output_rms_db);
            if let Some(sink) = &self.meter_sink {
                sink.publish(band, levels.input_rms_db, levels.output_rms_db);
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
