//! Microphone capture port interfaces

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::capture::CapturePreset;

/// Capture errors
#[derive(Debug, Clone, Error)]
pub enum CaptureError {
    #[error("Failed to start recording: {0}")]
    StartFailed(String),

    #[error("Recording failed: {0}")]
    RecordingFailed(String),

    #[error("Failed to write audio file: {0}")]
    WriteFailed(String),

    #[error("No audio data captured")]
    NoAudio,

    #[error("No recording in progress")]
    NotRecording,

    #[error("No audio input device available")]
    NoAudioDevice,
}

/// Result of asking for microphone access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
    Undetermined,
}

impl PermissionStatus {
    pub fn is_granted(&self) -> bool {
        *self == Self::Granted
    }
}

/// Port for microphone permission checks
#[async_trait]
pub trait MicrophonePermission: Send + Sync {
    /// Current permission without prompting
    async fn status(&self) -> PermissionStatus;

    /// Ask for access. May prompt the user.
    async fn request(&self) -> PermissionStatus;
}

/// Port for microphone capture, started and stopped on user request
#[async_trait]
pub trait AudioCapture: Send + Sync {
    /// Begin writing a new temporary capture file.
    async fn start(&self, preset: &CapturePreset) -> Result<(), CaptureError>;

    /// Finalize the capture file and return its path.
    ///
    /// The capture device is released even when this fails. The file is
    /// left on disk for the caller.
    async fn stop(&self) -> Result<PathBuf, CaptureError>;

    /// Get elapsed capture time in milliseconds
    fn elapsed_ms(&self) -> u64;
}
