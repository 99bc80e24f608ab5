//! Playback session

pub mod session;

pub use session::{PlaybackSession, PlaybackState};
