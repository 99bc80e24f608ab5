//! Rodio-based playback adapter
//!
//! rodio's `OutputStream` is not `Send`, so each loaded file gets its own
//! thread owning the stream and sink. The thread takes pause, resume and
//! release commands over a channel and reports the natural end of the
//! audio through a oneshot.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Mutex as StdMutex, MutexGuard};
use std::thread::JoinHandle;
use std::time::Duration;

use async_trait::async_trait;
use rodio::{Decoder, OutputStream, Sink};
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::application::ports::{AudioPlayer, PlaybackCompletion, PlaybackError};

/// How often the playback thread checks whether the sink has drained
const POLL_INTERVAL: Duration = Duration::from_millis(50);

enum Command {
    Pause,
    Resume,
    Release,
}

struct Loaded {
    commands: mpsc::Sender<Command>,
    thread: JoinHandle<()>,
}

/// Audio player holding at most one loaded file
#[derive(Default)]
pub struct RodioPlayer {
    loaded: StdMutex<Option<Loaded>>,
}

fn lock<T>(mutex: &StdMutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl RodioPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    fn open(path: &Path) -> Result<(OutputStream, Sink), PlaybackError> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| PlaybackError::DeviceNotAvailable(e.to_string()))?;
        let sink = Sink::try_new(&handle).map_err(|e| PlaybackError::DeviceNotAvailable(e.to_string()))?;

        let file = File::open(path)
            .map_err(|e| PlaybackError::LoadFailed(format!("{}: {}", path.display(), e)))?;
        let source = Decoder::new(BufReader::new(file))
            .map_err(|e| PlaybackError::LoadFailed(format!("{}: {}", path.display(), e)))?;
        sink.append(source);

        Ok((stream, sink))
    }

    /// Body of the playback thread
    fn run(
        path: PathBuf,
        commands: mpsc::Receiver<Command>,
        ready: oneshot::Sender<Result<(), PlaybackError>>,
        finished: oneshot::Sender<()>,
    ) {
        let (_stream, sink) = match Self::open(&path) {
            Ok(opened) => opened,
            Err(e) => {
                let _ = ready.send(Err(e));
                return;
            }
        };
        let _ = ready.send(Ok(()));

        loop {
            match commands.recv_timeout(POLL_INTERVAL) {
                Ok(Command::Pause) => sink.pause(),
                Ok(Command::Resume) => sink.play(),
                Ok(Command::Release) | Err(RecvTimeoutError::Disconnected) => {
                    sink.stop();
                    return;
                }
                Err(RecvTimeoutError::Timeout) => {
                    if sink.empty() {
                        debug!(path = %path.display(), "playback finished");
                        let _ = finished.send(());
                        return;
                    }
                }
            }
        }
    }

    fn send(&self, command: Command) -> Result<(), PlaybackError> {
        let loaded = lock(&self.loaded);
        let loaded = loaded.as_ref().ok_or(PlaybackError::NotLoaded)?;
        loaded
            .commands
            .send(command)
            .map_err(|_| PlaybackError::NotLoaded)
    }
}

#[async_trait]
impl AudioPlayer for RodioPlayer {
    async fn load(&self, path: &Path) -> Result<PlaybackCompletion, PlaybackError> {
        self.unload().await?;

        let (command_tx, command_rx) = mpsc::channel();
        let (ready_tx, ready_rx) = oneshot::channel();
        let (finished_tx, finished_rx) = oneshot::channel();
        let owned = path.to_path_buf();

        let thread = std::thread::spawn(move || Self::run(owned, command_rx, ready_tx, finished_tx));

        match ready_rx.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => {
                return Err(PlaybackError::LoadFailed(
                    "Playback thread exited".to_string(),
                ))
            }
        }

        *lock(&self.loaded) = Some(Loaded {
            commands: command_tx,
            thread,
        });
        debug!(path = %path.display(), "playback started");
        Ok(finished_rx)
    }

    async fn pause(&self) -> Result<(), PlaybackError> {
        self.send(Command::Pause)
    }

    async fn resume(&self) -> Result<(), PlaybackError> {
        self.send(Command::Resume)
    }

    async fn unload(&self) -> Result<(), PlaybackError> {
        let Some(loaded) = lock(&self.loaded).take() else {
            return Ok(());
        };

        // The thread may already have exited after the audio ended
        let _ = loaded.commands.send(Command::Release);
        let joined = tokio::task::spawn_blocking(move || loaded.thread.join()).await;
        if !matches!(joined, Ok(Ok(()))) {
            warn!("playback thread did not shut down cleanly");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn commands_without_audio_are_rejected() {
        let player = RodioPlayer::new();
        assert!(matches!(player.pause().await, Err(PlaybackError::NotLoaded)));
        assert!(matches!(player.resume().await, Err(PlaybackError::NotLoaded)));
    }

    #[tokio::test]
    async fn unload_without_audio_succeeds() {
        let player = RodioPlayer::new();
        assert!(player.unload().await.is_ok());
    }

    #[tokio::test]
    #[ignore = "Requires audio hardware"]
    async fn plays_a_note_to_the_end() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.wav");
        let preset = crate::domain::capture::CapturePreset::high_quality();
        crate::infrastructure::capture::write_wav(&path, &vec![0i16; 4_410], &preset).unwrap();

        let player = RodioPlayer::new();
        let finished = player.load(&path).await.unwrap();
        tokio::time::timeout(Duration::from_secs(2), finished)
            .await
            .unwrap()
            .unwrap();
        player.unload().await.unwrap();
    }
}
