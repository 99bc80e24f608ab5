//! PCM post-processing and WAV encoding for captured notes
//!
//! Device audio arrives interleaved at whatever rate the device runs at.
//! It is mixed down to mono, resampled to the preset rate, and written as
//! 16-bit PCM WAV.

use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};
use rubato::{FftFixedIn, Resampler};

use crate::application::ports::CaptureError;
use crate::domain::capture::CapturePreset;

/// Frames fed to the resampler per call
const RESAMPLE_CHUNK: usize = 1024;

/// Mix interleaved multi-channel audio down to mono
pub fn mix_to_mono(samples: &[i16], channels: u16) -> Vec<i16> {
    if channels <= 1 {
        return samples.to_vec();
    }

    samples
        .chunks(channels as usize)
        .map(|frame| {
            let sum: i32 = frame.iter().map(|&s| s as i32).sum();
            (sum / frame.len() as i32) as i16
        })
        .collect()
}

/// Convert a float sample in [-1, 1] to i16
pub fn f32_to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}

/// Resample mono audio from `source_rate` to `target_rate`
pub fn resample(samples: &[i16], source_rate: u32, target_rate: u32) -> Result<Vec<i16>, CaptureError> {
    if source_rate == target_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    let samples_f32: Vec<f32> = samples.iter().map(|&s| s as f32 / 32768.0).collect();

    let ratio = target_rate as f64 / source_rate as f64;
    let output_len = (samples_f32.len() as f64 * ratio).ceil() as usize;

    let mut resampler = FftFixedIn::<f32>::new(
        source_rate as usize,
        target_rate as usize,
        RESAMPLE_CHUNK,
        2, // Sub-chunks
        1, // Mono
    )
    .map_err(|e| CaptureError::RecordingFailed(format!("Resampler init failed: {}", e)))?;

    let mut output = Vec::with_capacity(output_len);
    let mut input_pos = 0;

    while input_pos < samples_f32.len() {
        let frames_needed = resampler.input_frames_next();
        let end_pos = (input_pos + frames_needed).min(samples_f32.len());

        let mut chunk = samples_f32[input_pos..end_pos].to_vec();
        chunk.resize(frames_needed, 0.0);

        let resampled = resampler
            .process(&[chunk], None)
            .map_err(|e| CaptureError::RecordingFailed(format!("Resampling failed: {}", e)))?;

        output.extend(resampled[0].iter().map(|&s| f32_to_i16(s)));
        input_pos = end_pos;
    }

    output.truncate(output_len);
    Ok(output)
}

/// Write mono samples to `path` using the preset's format
pub fn write_wav(path: &Path, samples: &[i16], preset: &CapturePreset) -> Result<(), CaptureError> {
    let spec = WavSpec {
        channels: preset.channels,
        sample_rate: preset.sample_rate,
        bits_per_sample: preset.bits_per_sample,
        sample_format: SampleFormat::Int,
    };

    let write_err = |e: hound::Error| CaptureError::WriteFailed(format!("{}: {}", path.display(), e));

    let mut writer = WavWriter::create(path, spec).map_err(write_err)?;
    for &sample in samples {
        writer.write_sample(sample).map_err(write_err)?;
    }
    writer.finalize().map_err(write_err)?;

    Ok(())
}

/// Turn raw device audio into a finished capture file
pub fn encode_capture(
    path: &Path,
    samples: &[i16],
    device_rate: u32,
    preset: &CapturePreset,
) -> Result<(), CaptureError> {
    if samples.is_empty() {
        return Err(CaptureError::NoAudio);
    }
    let resampled = resample(samples, device_rate, preset.sample_rate)?;
    write_wav(path, &resampled, preset)
}
