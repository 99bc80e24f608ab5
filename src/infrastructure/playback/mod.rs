//! Playback infrastructure adapters
//!
//! Plays saved notes through rodio and reads their durations.

mod decoder_probe;
mod rodio_player;

pub use decoder_probe::DecoderProbe;
pub use rodio_player::RodioPlayer;
