//! Persistence port interfaces

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::recording::RecordingId;

/// Key-value storage errors
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("Failed to read '{key}': {message}")]
    ReadFailed { key: String, message: String },

    #[error("Failed to write '{key}': {message}")]
    WriteFailed { key: String, message: String },

    #[error("Failed to serialize recordings: {0}")]
    SerializeFailed(String),
}

/// Port for a string key-value store.
///
/// `set` replaces the whole value; a reader never observes a partial write.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Audio file errors
#[derive(Debug, Clone, Error)]
pub enum FileError {
    #[error("Failed to move audio file {from} to {to}: {message}")]
    MoveFailed {
        from: PathBuf,
        to: PathBuf,
        message: String,
    },

    #[error("Failed to delete audio file {path}: {message}")]
    DeleteFailed { path: PathBuf, message: String },
}

/// Port for the audio files referenced by recordings
#[async_trait]
pub trait AudioFiles: Send + Sync {
    /// Move a finished capture into permanent storage under `id`.
    /// Returns the new location.
    async fn adopt(&self, capture: &Path, id: &RecordingId) -> Result<PathBuf, FileError>;

    /// Delete a file. A file that does not exist counts as deleted.
    async fn remove(&self, path: &Path) -> Result<(), FileError>;
}
