//! Cross-platform microphone capture using cpal
//!
//! The input stream runs on its own thread for the length of a capture.
//! Samples are collected in memory (mono, i16, device rate) and written to
//! a WAV file in the capture directory when the capture stops.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex as StdMutex, MutexGuard};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SampleRate, StreamConfig};
use tokio::sync::oneshot;
use tracing::{debug, warn};

use super::wav_encoder::{encode_capture, f32_to_i16, mix_to_mono};
use crate::application::ports::{AudioCapture, CaptureError};
use crate::domain::capture::CapturePreset;

/// How often the capture thread checks for a stop request
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// The capture in progress
struct ActiveCapture {
    path: PathBuf,
    preset: CapturePreset,
    thread: JoinHandle<()>,
}

/// Microphone capture backed by the default cpal input device
pub struct CpalCapture {
    capture_dir: PathBuf,
    /// Recorded audio samples (mono, i16, at device sample rate)
    audio_buffer: Arc<StdMutex<Vec<i16>>>,
    device_sample_rate: Arc<AtomicU32>,
    is_recording: Arc<AtomicBool>,
    started: StdMutex<Option<Instant>>,
    active: StdMutex<Option<ActiveCapture>>,
}

fn lock<T>(mutex: &StdMutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl CpalCapture {
    /// Create a capture adapter writing temporary files into `capture_dir`
    pub fn new(capture_dir: impl Into<PathBuf>) -> Self {
        Self {
            capture_dir: capture_dir.into(),
            audio_buffer: Arc::new(StdMutex::new(Vec::new())),
            device_sample_rate: Arc::new(AtomicU32::new(0)),
            is_recording: Arc::new(AtomicBool::new(false)),
            started: StdMutex::new(None),
            active: StdMutex::new(None),
        }
    }

    /// Get the default input device
    pub(crate) fn input_device() -> Result<cpal::Device, CaptureError> {
        cpal::default_host()
            .default_input_device()
            .ok_or(CaptureError::NoAudioDevice)
    }

    /// Pick an input configuration, preferring mono and the preset rate
    fn input_config(
        device: &cpal::Device,
        preferred_rate: u32,
    ) -> Result<(StreamConfig, SampleFormat), CaptureError> {
        let supported_configs = device
            .supported_input_configs()
            .map_err(|e| CaptureError::StartFailed(format!("Failed to get configs: {}", e)))?;

        let includes = |c: &cpal::SupportedStreamConfigRange| {
            c.min_sample_rate().0 <= preferred_rate && c.max_sample_rate().0 >= preferred_rate
        };

        let mut best: Option<cpal::SupportedStreamConfigRange> = None;
        for config in supported_configs {
            if config.sample_format() != SampleFormat::I16
                && config.sample_format() != SampleFormat::F32
            {
                continue;
            }

            let is_better = match &best {
                None => true,
                Some(current) => {
                    let better_rate = includes(&config) && !includes(current);
                    let same_rate_fit = includes(&config) == includes(current);
                    better_rate || (same_rate_fit && config.channels() < current.channels())
                }
            };
            if is_better {
                best = Some(config);
            }
        }

        let range = best.ok_or_else(|| CaptureError::StartFailed("No suitable config found".into()))?;

        // Use the preset rate if supported; otherwise record at the device
        // maximum and resample afterwards
        let sample_rate = if includes(&range) {
            SampleRate(preferred_rate)
        } else {
            range.max_sample_rate()
        };

        let config = StreamConfig {
            channels: range.channels(),
            sample_rate,
            buffer_size: cpal::BufferSize::Default,
        };

        Ok((config, range.sample_format()))
    }

    /// Build a stream that appends mono samples to `buffer` while `is_recording`
    fn build_stream(
        device: &cpal::Device,
        config: &StreamConfig,
        sample_format: SampleFormat,
        buffer: Arc<StdMutex<Vec<i16>>>,
        is_recording: Arc<AtomicBool>,
    ) -> Result<cpal::Stream, CaptureError> {
        let channels = config.channels;
        let on_error = |err: cpal::StreamError| warn!(error = %err, "audio stream error");

        let stream = match sample_format {
            SampleFormat::I16 => device.build_input_stream(
                config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    if is_recording.load(Ordering::SeqCst) {
                        let mono = mix_to_mono(data, channels);
                        lock(&buffer).extend_from_slice(&mono);
                    }
                },
                on_error,
                None,
            ),
            SampleFormat::F32 => device.build_input_stream(
                config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if is_recording.load(Ordering::SeqCst) {
                        let pcm: Vec<i16> = data.iter().map(|&s| f32_to_i16(s)).collect();
                        let mono = mix_to_mono(&pcm, channels);
                        lock(&buffer).extend_from_slice(&mono);
                    }
                },
                on_error,
                None,
            ),
            _ => {
                return Err(CaptureError::StartFailed(
                    "Unsupported sample format".into(),
                ))
            }
        };

        stream.map_err(|e| CaptureError::StartFailed(e.to_string()))
    }

    /// Body of the capture thread. Reports the device rate (or the failure)
    /// through `ready`, then keeps the stream alive until recording stops.
    fn run_stream(
        preferred_rate: u32,
        buffer: Arc<StdMutex<Vec<i16>>>,
        is_recording: Arc<AtomicBool>,
        ready: oneshot::Sender<Result<u32, CaptureError>>,
    ) {
        let opened = Self::input_device().and_then(|device| {
            let (config, format) = Self::input_config(&device, preferred_rate)?;
            let stream =
                Self::build_stream(&device, &config, format, buffer, Arc::clone(&is_recording))?;
            stream
                .play()
                .map_err(|e| CaptureError::StartFailed(e.to_string()))?;
            Ok((stream, config.sample_rate.0))
        });

        let stream = match opened {
            Ok((stream, rate)) => {
                let _ = ready.send(Ok(rate));
                stream
            }
            Err(e) => {
                is_recording.store(false, Ordering::SeqCst);
                let _ = ready.send(Err(e));
                return;
            }
        };

        while is_recording.load(Ordering::SeqCst) {
            std::thread::sleep(POLL_INTERVAL);
        }

        drop(stream);
    }

    fn capture_path(&self, preset: &CapturePreset) -> PathBuf {
        self.capture_dir.join(format!(
            "capture-{}.{}",
            Utc::now().timestamp_millis(),
            preset.extension()
        ))
    }
}

#[async_trait]
impl AudioCapture for CpalCapture {
    async fn start(&self, preset: &CapturePreset) -> Result<(), CaptureError> {
        if self.is_recording.load(Ordering::SeqCst) {
            return Err(CaptureError::StartFailed(
                "Recording already in progress".to_string(),
            ));
        }

        tokio::fs::create_dir_all(&self.capture_dir)
            .await
            .map_err(|e| CaptureError::StartFailed(format!("{}: {}", self.capture_dir.display(), e)))?;

        lock(&self.audio_buffer).clear();
        self.is_recording.store(true, Ordering::SeqCst);

        let (ready_tx, ready_rx) = oneshot::channel();
        let preferred_rate = preset.sample_rate;
        let buffer = Arc::clone(&self.audio_buffer);
        let is_recording = Arc::clone(&self.is_recording);

        // cpal::Stream is not Send, so it lives on its own thread
        let thread = std::thread::spawn(move || {
            Self::run_stream(preferred_rate, buffer, is_recording, ready_tx)
        });

        let device_rate = match ready_rx.await {
            Ok(Ok(rate)) => rate,
            Ok(Err(e)) => {
                self.is_recording.store(false, Ordering::SeqCst);
                return Err(e);
            }
            Err(_) => {
                self.is_recording.store(false, Ordering::SeqCst);
                return Err(CaptureError::StartFailed("Capture thread exited".into()));
            }
        };
        self.device_sample_rate.store(device_rate, Ordering::SeqCst);

        let path = self.capture_path(preset);
        debug!(path = %path.display(), device_rate, "capture started");

        *lock(&self.started) = Some(Instant::now());
        *lock(&self.active) = Some(ActiveCapture {
            path,
            preset: *preset,
            thread,
        });

        Ok(())
    }

    async fn stop(&self) -> Result<PathBuf, CaptureError> {
        let active = lock(&self.active).take();
        let ActiveCapture {
            path,
            preset,
            thread,
        } = active.ok_or(CaptureError::NotRecording)?;

        self.is_recording.store(false, Ordering::SeqCst);
        *lock(&self.started) = None;

        // Wait for the stream to be dropped so the device is released
        let joined = tokio::task::spawn_blocking(move || thread.join()).await;
        if !matches!(joined, Ok(Ok(()))) {
            warn!("capture thread did not shut down cleanly");
        }

        let sample_rate = self.device_sample_rate.load(Ordering::SeqCst);
        if sample_rate == 0 {
            return Err(CaptureError::RecordingFailed("Sample rate not set".into()));
        }

        let samples = std::mem::take(&mut *lock(&self.audio_buffer));
        debug!(samples = samples.len(), sample_rate, "capture stopped");

        let out = path.clone();
        tokio::task::spawn_blocking(move || encode_capture(&out, &samples, sample_rate, &preset))
            .await
            .map_err(|e| CaptureError::RecordingFailed(format!("Encode task error: {}", e)))??;

        Ok(path)
    }

    fn elapsed_ms(&self) -> u64 {
        lock(&self.started)
            .map(|t| t.elapsed().as_millis() as u64)
            .unwrap_or(0)
    }
}
