//! Domain layer - Core business logic
//!
//! Contains value objects, entities, state machines, and domain errors.
//! This layer has no dependencies on external systems.

pub mod capture;
pub mod config;
pub mod error;
pub mod format;
pub mod playback;
pub mod recording;

// Re-export common types
pub use capture::{CapturePreset, CaptureSession, CaptureState};
pub use config::AppConfig;
pub use error::*;
pub use format::{format_date, format_duration};
pub use playback::{PlaybackSession, PlaybackState};
pub use recording::{Collection, RecordingId, RecordingMeta};
