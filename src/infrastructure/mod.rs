//! Infrastructure layer - Adapter implementations
//!
//! Concrete implementations of the port interfaces: cpal capture, rodio
//! playback, file-backed storage and the XDG config file.

pub mod capture;
pub mod config;
pub mod playback;
pub mod storage;

// Re-export adapters
pub use capture::{CpalCapture, DevicePermission};
pub use config::XdgConfigStore;
pub use playback::{DecoderProbe, RodioPlayer};
pub use storage::{FileKeyValueStore, LocalAudioFiles, MemoryKeyValueStore};
