//! Audio playback port interfaces

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::oneshot;

/// Errors that can occur during playback
#[derive(Error, Debug, Clone)]
pub enum PlaybackError {
    /// The audio file could not be opened or decoded
    #[error("Failed to play audio. The file may be corrupted or missing: {0}")]
    LoadFailed(String),

    /// No audio output device available
    #[error("Audio device not available: {0}")]
    DeviceNotAvailable(String),

    /// Nothing is loaded
    #[error("No audio loaded")]
    NotLoaded,

    /// Failed to read the duration of a file
    #[error("Failed to read audio duration: {0}")]
    ProbeFailed(String),
}

/// Resolves when the loaded audio reaches its end.
///
/// The sender is dropped without a value when the audio is unloaded first.
pub type PlaybackCompletion = oneshot::Receiver<()>;

/// Port for the single process-wide playback resource
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    /// Load a file and start playing it.
    ///
    /// Callers unload any previous resource first.
    async fn load(&self, path: &Path) -> Result<PlaybackCompletion, PlaybackError>;

    /// Pause the loaded audio, keeping it loaded
    async fn pause(&self) -> Result<(), PlaybackError>;

    /// Continue the loaded audio from where it was paused
    async fn resume(&self) -> Result<(), PlaybackError>;

    /// Release the loaded audio. Succeeds when nothing is loaded.
    async fn unload(&self) -> Result<(), PlaybackError>;
}

/// Port for reading the duration of an audio file
#[async_trait]
pub trait DurationProbe: Send + Sync {
    /// Load `path` into a decoder just long enough to read its duration
    async fn duration_ms(&self, path: &Path) -> Result<u64, PlaybackError>;
}
