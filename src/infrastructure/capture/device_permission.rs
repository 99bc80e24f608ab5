//! Microphone access check for desktop hosts
//!
//! Desktop platforms have no runtime permission prompt that cpal can drive.
//! Access counts as granted when the default input device exists and can
//! report its configurations.

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait};
use tracing::debug;

use crate::application::ports::{MicrophonePermission, PermissionStatus};

/// Permission adapter backed by the default cpal input device
#[derive(Debug, Default, Clone, Copy)]
pub struct DevicePermission;

impl DevicePermission {
    pub fn new() -> Self {
        Self
    }

    fn has_input_device() -> bool {
        cpal::default_host().default_input_device().is_some()
    }

    fn can_open_input() -> bool {
        cpal::default_host()
            .default_input_device()
            .map(|device| device.supported_input_configs().is_ok())
            .unwrap_or(false)
    }
}

#[async_trait]
impl MicrophonePermission for DevicePermission {
    async fn status(&self) -> PermissionStatus {
        let present = tokio::task::spawn_blocking(Self::has_input_device)
            .await
            .unwrap_or(false);
        if present {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Undetermined
        }
    }

    async fn request(&self) -> PermissionStatus {
        let usable = tokio::task::spawn_blocking(Self::can_open_input)
            .await
            .unwrap_or(false);
        debug!(usable, "microphone access requested");
        if usable {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        }
    }
}
