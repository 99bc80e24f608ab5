//! Voice notes library use case
//!
//! Owns the in-memory collection and keeps it in step with the store after
//! every create, rename, and delete. This is the surface the screen drives.

use thiserror::Error;
use tokio::sync::{watch, Mutex};
use tracing::{info, warn};

use crate::domain::capture::CaptureState;
use crate::domain::error::CollectionError;
use crate::domain::playback::PlaybackState;
use crate::domain::recording::{Collection, RecordingId, RecordingMeta};

use super::playback::{PlaybackControlError, PlaybackController};
use super::ports::{
    AudioCapture, AudioFiles, AudioPlayer, DurationProbe, FileError, KeyValueStore,
    MicrophonePermission, StorageError,
};
use super::recorder::{RecorderError, RecorderSession};
use super::recording_store::RecordingStore;

/// Errors from library operations
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error(transparent)]
    Recorder(#[from] RecorderError),

    #[error(transparent)]
    Playback(#[from] PlaybackControlError),

    #[error(transparent)]
    Collection(#[from] CollectionError),

    #[error("Changes may not have been saved: {0}")]
    NotSaved(#[from] StorageError),

    #[error(transparent)]
    File(#[from] FileError),
}

/// Voice notes library: collection, recorder and player behind one facade
pub struct VoiceNotes<S, F, C, M, D, P>
where
    S: KeyValueStore,
    F: AudioFiles,
    C: AudioCapture,
    M: MicrophonePermission,
    D: DurationProbe,
    P: AudioPlayer + 'static,
{
    store: RecordingStore<S>,
    files: F,
    recorder: RecorderSession<C, M, D>,
    player: PlaybackController<P>,
    recordings: Mutex<Collection>,
}

impl<S, F, C, M, D, P> VoiceNotes<S, F, C, M, D, P>
where
    S: KeyValueStore,
    F: AudioFiles,
    C: AudioCapture,
    M: MicrophonePermission,
    D: DurationProbe,
    P: AudioPlayer + 'static,
{
    /// Create a library with an empty collection. Call [`Self::load`] next.
    pub fn new(
        store: RecordingStore<S>,
        files: F,
        recorder: RecorderSession<C, M, D>,
        player: PlaybackController<P>,
    ) -> Self {
        Self {
            store,
            files,
            recorder,
            player,
            recordings: Mutex::new(Collection::new()),
        }
    }

    /// Replace the in-memory collection with the persisted one
    pub async fn load(&self) -> usize {
        let loaded = self.store.load().await;
        let count = loaded.len();
        *self.recordings.lock().await = loaded;
        count
    }

    /// Snapshot of all recordings, newest first
    pub async fn recordings(&self) -> Vec<RecordingMeta> {
        self.recordings.lock().await.as_slice().to_vec()
    }

    /// Recordings whose name contains `query`, ignoring case
    pub async fn search(&self, query: &str) -> Vec<RecordingMeta> {
        self.recordings
            .lock()
            .await
            .filter(query)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn get(&self, id: &RecordingId) -> Option<RecordingMeta> {
        self.recordings.lock().await.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.recordings.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.recordings.lock().await.is_empty()
    }

    pub async fn start_recording(&self) -> Result<(), LibraryError> {
        self.recorder.start().await?;
        Ok(())
    }

    /// Stop capturing and add the new note at the top of the collection.
    ///
    /// The note stays in memory even if saving fails; the error tells the
    /// caller to warn the user.
    pub async fn stop_recording(&self) -> Result<RecordingMeta, LibraryError> {
        let captured = self.recorder.stop().await?;

        let id = RecordingId::generate();
        let path = self.files.adopt(&captured.path, &id).await?;
        let meta = RecordingMeta::new(id, path.to_string_lossy(), captured.duration_millis);

        let mut recordings = self.recordings.lock().await;
        recordings.insert_newest(meta.clone())?;
        self.store.save(&recordings).await?;

        info!(id = %meta.id, duration_millis = meta.duration_millis, "recording saved");
        Ok(meta)
    }

    /// Change a recording's display name
    pub async fn rename(&self, id: &RecordingId, name: &str) -> Result<RecordingMeta, LibraryError> {
        let mut recordings = self.recordings.lock().await;
        let renamed = recordings.rename(id, name)?.clone();
        self.store.save(&recordings).await?;
        Ok(renamed)
    }

    /// Remove a recording and its audio file.
    ///
    /// Playback of the recording is stopped first. The file is only removed
    /// once the shortened collection has been saved.
    pub async fn delete(&self, id: &RecordingId) -> Result<RecordingMeta, LibraryError> {
        let mut recordings = self.recordings.lock().await;
        if !recordings.contains(id) {
            return Err(CollectionError::NotFound(id.to_string()).into());
        }

        self.player.stop_if_active(id).await?;

        let removed = recordings.remove(id)?;
        self.store.save(&recordings).await?;
        drop(recordings);

        self.files.remove(&removed.path()).await?;
        info!(id = %removed.id, "recording deleted");
        Ok(removed)
    }

    /// Toggle playback of a recording
    pub async fn play(&self, id: &RecordingId) -> Result<PlaybackState, LibraryError> {
        let item = self
            .get(id)
            .await
            .ok_or_else(|| CollectionError::NotFound(id.to_string()))?;
        Ok(self.player.play(&item).await?)
    }

    pub async fn pause(&self) -> Result<PlaybackState, LibraryError> {
        Ok(self.player.pause().await?)
    }

    pub async fn resume(&self) -> Result<PlaybackState, LibraryError> {
        Ok(self.player.resume().await?)
    }

    pub async fn stop_playback(&self) -> Result<(), LibraryError> {
        Ok(self.player.stop().await?)
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.player.state()
    }

    pub fn recorder_state(&self) -> CaptureState {
        self.recorder.state()
    }

    pub fn recording_elapsed_ms(&self) -> u64 {
        self.recorder.elapsed_ms()
    }

    pub fn subscribe_playback(&self) -> watch::Receiver<PlaybackState> {
        self.player.subscribe()
    }

    pub fn subscribe_recorder(&self) -> watch::Receiver<CaptureState> {
        self.recorder.subscribe()
    }

    /// Release the playback resource before exit.
    /// A capture still running is finished and kept.
    pub async fn shutdown(&self) -> Option<Result<RecordingMeta, LibraryError>> {
        if let Err(e) = self.player.stop().await {
            warn!(error = %e, "could not release player on shutdown");
        }
        if self.recorder.state() == CaptureState::Recording {
            return Some(self.stop_recording().await);
        }
        None
    }
}
