//! Capture infrastructure module
//!
//! Microphone capture through cpal, written to WAV with hound.

mod cpal_capture;
mod device_permission;
mod wav_encoder;

pub use cpal_capture::CpalCapture;
pub use device_permission::DevicePermission;
pub use wav_encoder::{encode_capture, write_wav};
