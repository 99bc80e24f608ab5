//! Duration probe using rodio's decoder

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rodio::{Decoder, Source};
use tracing::warn;

use crate::application::ports::{DurationProbe, PlaybackError};

/// Reads a file's duration by opening it in a decoder without an output device
#[derive(Debug, Default, Clone, Copy)]
pub struct DecoderProbe;

impl DecoderProbe {
    pub fn new() -> Self {
        Self
    }
}

fn probe(path: PathBuf) -> Result<u64, PlaybackError> {
    let file = File::open(&path)
        .map_err(|e| PlaybackError::ProbeFailed(format!("{}: {}", path.display(), e)))?;
    let decoder = Decoder::new(BufReader::new(file))
        .map_err(|e| PlaybackError::ProbeFailed(format!("{}: {}", path.display(), e)))?;

    match decoder.total_duration() {
        Some(duration) => Ok(duration.as_millis() as u64),
        None => {
            warn!(path = %path.display(), "decoder reported no duration");
            Ok(0)
        }
    }
}

#[async_trait]
impl DurationProbe for DecoderProbe {
    async fn duration_ms(&self, path: &Path) -> Result<u64, PlaybackError> {
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || probe(path))
            .await
            .map_err(|e| PlaybackError::ProbeFailed(format!("Task join error: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::capture::CapturePreset;
    use crate::infrastructure::capture::write_wav;

    #[tokio::test]
    async fn reads_wav_duration() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("half-second.wav");
        write_wav(&path, &vec![0i16; 22_050], &CapturePreset::high_quality()).unwrap();

        let ms = DecoderProbe::new().duration_ms(&path).await.unwrap();
        assert!((490..=510).contains(&ms), "got {ms}");
    }

    #[tokio::test]
    async fn missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = DecoderProbe::new()
            .duration_ms(&dir.path().join("gone.wav"))
            .await;
        assert!(matches!(result, Err(PlaybackError::ProbeFailed(_))));
    }

    #[tokio::test]
    async fn garbage_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.wav");
        std::fs::write(&path, b"not audio").unwrap();
        assert!(DecoderProbe::new().duration_ms(&path).await.is_err());
    }
}
