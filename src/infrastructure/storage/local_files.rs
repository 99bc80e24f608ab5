//! Local audio file storage
//!
//! Finished captures are moved into the notes directory and named after
//! their recording id.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use crate::application::ports::{AudioFiles, FileError};
use crate::domain::recording::RecordingId;

pub struct LocalAudioFiles {
    notes_dir: PathBuf,
}

impl LocalAudioFiles {
    pub fn new(notes_dir: impl Into<PathBuf>) -> Self {
        Self {
            notes_dir: notes_dir.into(),
        }
    }

    fn target_for(&self, capture: &Path, id: &RecordingId) -> PathBuf {
        let ext = capture
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("wav");
        self.notes_dir.join(format!("{}.{}", id, ext))
    }
}

#[async_trait]
impl AudioFiles for LocalAudioFiles {
    async fn adopt(&self, capture: &Path, id: &RecordingId) -> Result<PathBuf, FileError> {
        let target = self.target_for(capture, id);
        let move_err = |e: std::io::Error| FileError::MoveFailed {
            from: capture.to_path_buf(),
            to: target.clone(),
            message: e.to_string(),
        };

        fs::create_dir_all(&self.notes_dir).await.map_err(move_err)?;

        // Rename fails across filesystems (cache dir vs data dir)
        if fs::rename(capture, &target).await.is_err() {
            fs::copy(capture, &target).await.map_err(move_err)?;
            fs::remove_file(capture).await.map_err(move_err)?;
        }

        debug!(from = %capture.display(), to = %target.display(), "capture adopted");
        Ok(target)
    }

    async fn remove(&self, path: &Path) -> Result<(), FileError> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(FileError::DeleteFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }
}
