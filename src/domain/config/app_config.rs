//! Application configuration value object

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::capture::preset::{is_valid_sample_rate, HIGH_QUALITY_SAMPLE_RATE};
use crate::domain::capture::CapturePreset;

/// Directory name used under the platform data, cache and config dirs
pub const APP_DIR_NAME: &str = "voice-notes";

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub data_dir: Option<String>,
    pub sample_rate: Option<u32>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            data_dir: None,
            sample_rate: Some(HIGH_QUALITY_SAMPLE_RATE),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            data_dir: other.data_dir.or(self.data_dir),
            sample_rate: other.sample_rate.or(self.sample_rate),
        }
    }

    /// Data directory, or `<platform data dir>/voice-notes`
    pub fn data_dir_or_default(&self) -> PathBuf {
        self.data_dir
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir)
    }

    /// Directory holding adopted audio files
    pub fn notes_dir(&self) -> PathBuf {
        self.data_dir_or_default().join("notes")
    }

    /// Capture preset, with the configured sample rate if it is valid
    pub fn preset_or_default(&self) -> CapturePreset {
        let preset = CapturePreset::high_quality();
        match self.sample_rate {
            Some(rate) if is_valid_sample_rate(rate) => preset.with_sample_rate(rate),
            _ => preset,
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

/// Directory for in-progress captures
pub fn default_capture_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
}
