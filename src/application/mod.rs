//! Application layer - Use cases and port interfaces
//!
//! Contains the recorder session, playback controller, recording store,
//! and the library facade, plus the trait definitions for the devices and
//! storage they run on.

pub mod library;
pub mod playback;
pub mod ports;
pub mod recorder;
pub mod recording_store;

// Re-export use cases
pub use library::{LibraryError, VoiceNotes};
pub use playback::{PlaybackControlError, PlaybackController};
pub use recorder::{CapturedRecording, RecorderError, RecorderSession};
pub use recording_store::{RecordingStore, STORAGE_KEY};
