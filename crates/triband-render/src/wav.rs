//! WAV file I/O
//!
//! Reads 8/16/24/32-bit integer or 32-bit float WAV files into a
//! [`StereoBuffer`] (mono is duplicated into both channels) and writes
//! 32-bit float WAV files.

use std::path::Path;

use anyhow::{bail, Context, Result};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use triband_core::StereoBuffer;

/// Decoded audio file
#[derive(Debug, Clone)]
pub struct WavAudio {
    pub buffer: StereoBuffer,
    pub sample_rate: u32,
    /// Channel count of the source file (1 or 2)
    pub channels: u16,
}

/// Read a mono or stereo WAV file
pub fn read_wav(path: &Path) -> Result<WavAudio> {
    let reader = WavReader::open(path).with_context(|| format!("Failed to open WAV file: {:?}", path))?;
    let spec = reader.spec();

    if spec.channels == 0 || spec.channels > 2 {
        bail!(
            "{:?}: {}-channel audio is not supported (mono or stereo only)",
            path,
            spec.channels
        );
    }

    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<_, _>>()
            .with_context(|| format!("Failed to decode {:?}", path))?,
        SampleFormat::Int => {
            let scale = 1.0 / (1_i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<Result<_, _>>()
                .with_context(|| format!("Failed to decode {:?}", path))?
        }
    };

    let buffer = if spec.channels == 1 {
        StereoBuffer::from_mono(&samples)
    } else {
        StereoBuffer::from_interleaved(&samples)
    };

    log::info!(
        "read_wav: {:?} ({} Hz, {} ch, {}-bit {:?}, {} frames)",
        path,
        spec.sample_rate,
        spec.channels,
        spec.bits_per_sample,
        spec.sample_format,
        buffer.len()
    );

    Ok(WavAudio {
        buffer,
        sample_rate: spec.sample_rate,
        channels: spec.channels,
    })
}

/// Write a 32-bit float WAV file with 1 (left channel only) or 2 channels
pub fn write_wav(path: &Path, buffer: &StereoBuffer, sample_rate: u32, channels: u16) -> Result<()> {
    let spec = WavSpec {
        channels: channels.clamp(1, 2),
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer =
        WavWriter::create(path, spec).with_context(|| format!("Failed to create WAV file: {:?}", path))?;

    if spec.channels == 1 {
        for sample in buffer.iter() {
            writer.write_sample(sample.left)?;
        }
    } else {
        for &value in buffer.as_interleaved() {
            writer.write_sample(value)?;
        }
    }

    writer
        .finalize()
        .with_context(|| format!("Failed to finalize WAV file: {:?}", path))?;
    log::info!("write_wav: {:?} ({} frames)", path, buffer.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use triband_core::StereoSample;

    #[test]
    fn test_stereo_float_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");

        let buffer = StereoBuffer::from_interleaved(&[0.5, -0.5, 0.25, -0.25, 1.0, 0.0]);
        write_wav(&path, &buffer, 44100, 2).unwrap();

        let audio = read_wav(&path).unwrap();
        assert_eq!(audio.sample_rate, 44100);
        assert_eq!(audio.channels, 2);
        assert_eq!(audio.buffer.as_slice(), buffer.as_slice());
    }

    #[test]
    fn test_mono_int16_is_duplicated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mono16.wav");

        let spec = WavSpec {
            channels: 1,
            sample_rate: 48000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        writer.write_sample(16384_i16).unwrap();
        writer.write_sample(-32768_i16).unwrap();
        writer.finalize().unwrap();

        let audio = read_wav(&path).unwrap();
        assert_eq!(audio.channels, 1);
        assert_eq!(audio.buffer.as_slice(), &[StereoSample::mono(0.5), StereoSample::mono(-1.0)]);
    }

    #[test]
    fn test_multichannel_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quad.wav");

        let spec = WavSpec {
            channels: 4,
            sample_rate: 48000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        for _ in 0..8 {
            writer.write_sample(0_i16).unwrap();
        }
        writer.finalize().unwrap();

        assert!(read_wav(&path).is_err());
    }
}
