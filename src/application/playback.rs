//! Playback controller use case

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{watch, Mutex, MutexGuard};
use tracing::{debug, warn};

use crate::domain::error::InvalidStateTransition;
use crate::domain::playback::{PlaybackSession, PlaybackState};
use crate::domain::recording::{RecordingId, RecordingMeta};

use super::ports::{AudioPlayer, PlaybackCompletion, PlaybackError};

/// Errors from the playback controller
#[derive(Debug, Error)]
pub enum PlaybackControlError {
    #[error("Player is busy, please wait")]
    Busy,

    #[error(transparent)]
    Player(#[from] PlaybackError),

    #[error(transparent)]
    InvalidState(#[from] InvalidStateTransition),
}

/// Owns the single loaded playback resource.
///
/// Cloning yields another handle to the same controller. Natural end of
/// playback is detected in a background task, which releases the resource
/// and moves the controller to `Stopped`.
pub struct PlaybackController<P: AudioPlayer + 'static> {
    inner: Arc<Inner<P>>,
}

struct Inner<P: AudioPlayer> {
    player: P,
    session: Mutex<PlaybackSession>,
    /// Bumped on every load and release so stale completions can be ignored
    generation: AtomicU64,
    updates: watch::Sender<PlaybackState>,
}

impl<P: AudioPlayer + 'static> Clone for PlaybackController<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P: AudioPlayer + 'static> PlaybackController<P> {
    pub fn new(player: P) -> Self {
        let (updates, _) = watch::channel(PlaybackState::Stopped);
        Self {
            inner: Arc::new(Inner {
                player,
                session: Mutex::new(PlaybackSession::new()),
                generation: AtomicU64::new(0),
                updates,
            }),
        }
    }

    /// Last published state
    pub fn state(&self) -> PlaybackState {
        self.inner.updates.borrow().clone()
    }

    /// Recording currently audible, if any
    pub fn playing_id(&self) -> Option<RecordingId> {
        self.inner.updates.borrow().playing_id().cloned()
    }

    /// Observe state changes, including natural completion
    pub fn subscribe(&self) -> watch::Receiver<PlaybackState> {
        self.inner.updates.subscribe()
    }

    /// Toggle playback of `item`.
    ///
    /// Pauses it if it is playing and resumes it if it is paused. Any other
    /// loaded audio is released before `item` is loaded from the start.
    pub async fn play(&self, item: &RecordingMeta) -> Result<PlaybackState, PlaybackControlError> {
        let mut session = self.lock()?;

        match session.state().clone() {
            PlaybackState::Playing(id) if id == item.id => {
                let result = self.inner.player.pause().await;
                if let Some(state) = self.inner.settle(&mut session, result).await? {
                    return Ok(state);
                }
                session.pause()?;
            }
            PlaybackState::Paused(id) if id == item.id => {
                let result = self.inner.player.resume().await;
                if let Some(state) = self.inner.settle(&mut session, result).await? {
                    return Ok(state);
                }
                session.resume()?;
            }
            current => {
                if current.active_id().is_some() {
                    self.inner.release(&mut session).await;
                }

                let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
                let completion = match self.inner.player.load(&item.path()).await {
                    Ok(completion) => completion,
                    Err(e) => return Err(self.inner.fail(&mut session, e).await),
                };

                session.play(item.id.clone());
                self.watch_completion(generation, completion);
                debug!(id = %item.id, "playback started");
            }
        }

        Ok(self.inner.publish(&session))
    }

    /// PLAYING -> PAUSED, keeping the audio loaded
    pub async fn pause(&self) -> Result<PlaybackState, PlaybackControlError> {
        let mut session = self.lock()?;
        if !matches!(session.state(), PlaybackState::Playing(_)) {
            return Err(InvalidStateTransition::new(session.state().as_str(), "pause").into());
        }
        let result = self.inner.player.pause().await;
        if let Some(state) = self.inner.settle(&mut session, result).await? {
            return Ok(state);
        }
        session.pause()?;
        Ok(self.inner.publish(&session))
    }

    /// PAUSED -> PLAYING using the still-loaded audio
    pub async fn resume(&self) -> Result<PlaybackState, PlaybackControlError> {
        let mut session = self.lock()?;
        if !matches!(session.state(), PlaybackState::Paused(_)) {
            return Err(InvalidStateTransition::new(session.state().as_str(), "resume").into());
        }
        let result = self.inner.player.resume().await;
        if let Some(state) = self.inner.settle(&mut session, result).await? {
            return Ok(state);
        }
        session.resume()?;
        Ok(self.inner.publish(&session))
    }

    /// Release any loaded audio and return to `Stopped`
    pub async fn stop(&self) -> Result<(), PlaybackControlError> {
        let mut session = self.lock()?;
        self.inner.release(&mut session).await;
        self.inner.publish(&session);
        Ok(())
    }

    /// Stop playback only if `id` is the loaded recording.
    /// Returns whether anything was stopped.
    pub async fn stop_if_active(&self, id: &RecordingId) -> Result<bool, PlaybackControlError> {
        // The completion task may hold the lock; only contend for our own id
        if self.state().active_id() != Some(id) {
            return Ok(false);
        }
        let mut session = self.lock()?;
        if session.state().active_id() != Some(id) {
            return Ok(false);
        }
        self.inner.release(&mut session).await;
        self.inner.publish(&session);
        Ok(true)
    }

    fn lock(&self) -> Result<MutexGuard<'_, PlaybackSession>, PlaybackControlError> {
        self.inner
            .session
            .try_lock()
            .map_err(|_| PlaybackControlError::Busy)
    }

    fn watch_completion(&self, generation: u64, completion: PlaybackCompletion) {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            // Err means the audio was released before reaching its end
            if completion.await.is_ok() {
                inner.finish(generation).await;
            }
        });
    }
}

impl<P: AudioPlayer> Inner<P> {
    fn publish(&self, session: &PlaybackSession) -> PlaybackState {
        let state = session.state().clone();
        self.updates.send_replace(state.clone());
        state
    }

    /// Unload whatever is loaded and move to STOPPED
    async fn release(&self, session: &mut PlaybackSession) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Err(e) = self.player.unload().await {
            warn!(error = %e, "could not unload audio");
        }
        session.stop();
    }

    /// Interpret the result of a pause or resume sent to the player.
    ///
    /// `NotLoaded` means the audio reached its end before the command
    /// arrived, so the session is stopped quietly and the stopped state is
    /// returned. Other failures reset the session and are reported.
    async fn settle(
        &self,
        session: &mut PlaybackSession,
        result: Result<(), PlaybackError>,
    ) -> Result<Option<PlaybackState>, PlaybackControlError> {
        match result {
            Ok(()) => Ok(None),
            Err(PlaybackError::NotLoaded) => {
                debug!(state = %session.state(), "audio ended before the command");
                self.release(session).await;
                Ok(Some(self.publish(session)))
            }
            Err(e) => Err(self.fail(session, e).await),
        }
    }

    /// Reset to STOPPED after a player failure
    async fn fail(&self, session: &mut PlaybackSession, error: PlaybackError) -> PlaybackControlError {
        warn!(error = %error, "playback failed");
        self.release(session).await;
        self.publish(session);
        PlaybackControlError::Player(error)
    }

    /// Called when the audio loaded at `generation` reaches its end
    async fn finish(&self, generation: u64) {
        let mut session = self.session.lock().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            return;
        }
        debug!(state = %session.state(), "playback finished");
        self.release(&mut session).await;
        self.publish(&session);
    }
}
