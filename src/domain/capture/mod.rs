//! Microphone capture session and preset

pub mod preset;
pub mod session;

pub use preset::{is_valid_sample_rate, CapturePreset};
pub use session::{CaptureSession, CaptureState};
