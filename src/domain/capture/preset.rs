//! Capture encoding preset

/// Sample rate of the high-quality preset
pub const HIGH_QUALITY_SAMPLE_RATE: u32 = 44_100;

/// Lowest and highest sample rates accepted from configuration
pub const MIN_SAMPLE_RATE: u32 = 8_000;
pub const MAX_SAMPLE_RATE: u32 = 192_000;

/// Fixed encoding settings used for every capture.
///
/// Output is mono, 16-bit PCM WAV.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapturePreset {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
}

impl CapturePreset {
    pub const fn high_quality() -> Self {
        Self {
            sample_rate: HIGH_QUALITY_SAMPLE_RATE,
            channels: 1,
            bits_per_sample: 16,
        }
    }

    /// Same preset with a different sample rate
    pub const fn with_sample_rate(self, sample_rate: u32) -> Self {
        Self {
            sample_rate,
            ..self
        }
    }

    /// File extension for captures written with this preset
    pub const fn extension(&self) -> &'static str {
        "wav"
    }
}

impl Default for CapturePreset {
    fn default() -> Self {
        Self::high_quality()
    }
}

/// Check that a sample rate is within the supported range
pub fn is_valid_sample_rate(rate: u32) -> bool {
    (MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_quality_values() {
        let preset = CapturePreset::high_quality();
        assert_eq!(preset.sample_rate, 44_100);
        assert_eq!(preset.channels, 1);
        assert_eq!(preset.bits_per_sample, 16);
        assert_eq!(preset.extension(), "wav");
    }

    #[test]
    fn override_sample_rate() {
        let preset = CapturePreset::high_quality().with_sample_rate(48_000);
        assert_eq!(preset.sample_rate, 48_000);
        assert_eq!(preset.channels, 1);
    }

    #[test]
    fn sample_rate_bounds() {
        assert!(is_valid_sample_rate(8_000));
        assert!(is_valid_sample_rate(192_000));
        assert!(!is_valid_sample_rate(7_999));
        assert!(!is_valid_sample_rate(0));
    }
}
