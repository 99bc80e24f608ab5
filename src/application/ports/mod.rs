//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod capture;
pub mod config;
pub mod player;
pub mod storage;

// Re-export common types
pub use capture::{AudioCapture, CaptureError, MicrophonePermission, PermissionStatus};
pub use config::ConfigStore;
pub use player::{AudioPlayer, DurationProbe, PlaybackCompletion, PlaybackError};
pub use storage::{AudioFiles, FileError, KeyValueStore, StorageError};
