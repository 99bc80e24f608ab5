//! Persistence adapters
//!
//! Key-value stores for the recordings blob and local storage for the audio
//! files themselves.

mod file_store;
mod local_files;
mod memory;

pub use file_store::FileKeyValueStore;
pub use local_files::LocalAudioFiles;
pub use memory::MemoryKeyValueStore;
