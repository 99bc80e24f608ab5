//! Playback session state machine

use std::fmt;

use crate::domain::error::InvalidStateTransition;
use crate::domain::recording::RecordingId;

/// Playback states. The id names the recording whose audio is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing(RecordingId),
    Paused(RecordingId),
}

impl PlaybackState {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Playing(_) => "playing",
            Self::Paused(_) => "paused",
        }
    }

    /// Recording whose audio is loaded, playing or paused
    pub fn active_id(&self) -> Option<&RecordingId> {
        match self {
            Self::Stopped => None,
            Self::Playing(id) | Self::Paused(id) => Some(id),
        }
    }

    /// Recording currently audible
    pub fn playing_id(&self) -> Option<&RecordingId> {
        match self {
            Self::Playing(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_playing(&self, id: &RecordingId) -> bool {
        self.playing_id() == Some(id)
    }

    pub fn is_paused(&self, id: &RecordingId) -> bool {
        matches!(self, Self::Paused(p) if p == id)
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.active_id() {
            Some(id) => write!(f, "{} {}", self.as_str(), id),
            None => write!(f, "{}", self.as_str()),
        }
    }
}

/// Playback session entity.
///
/// State machine:
///   any -> PLAYING(id) (play)
///   PLAYING(id) -> PAUSED(id) (pause)
///   PAUSED(id) -> PLAYING(id) (resume)
///   any -> STOPPED (stop)
#[derive(Debug, Default)]
pub struct PlaybackSession {
    state: PlaybackState,
}

impl PlaybackSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    /// Start playing a freshly loaded recording
    pub fn play(&mut self, id: RecordingId) {
        self.state = PlaybackState::Playing(id);
    }

    /// Transition from PLAYING to PAUSED
    pub fn pause(&mut self) -> Result<(), InvalidStateTransition> {
        match &self.state {
            PlaybackState::Playing(id) => {
                self.state = PlaybackState::Paused(id.clone());
                Ok(())
            }
            other => Err(InvalidStateTransition::new(other.as_str(), "pause")),
        }
    }

    /// Transition from PAUSED to PLAYING
    pub fn resume(&mut self) -> Result<(), InvalidStateTransition> {
        match &self.state {
            PlaybackState::Paused(id) => {
                self.state = PlaybackState::Playing(id.clone());
                Ok(())
            }
            other => Err(InvalidStateTransition::new(other.as_str(), "resume")),
        }
    }

    /// Return to STOPPED from any state
    pub fn stop(&mut self) {
        self.state = PlaybackState::Stopped;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> RecordingId {
        RecordingId::from(s)
    }

    #[test]
    fn new_session_is_stopped() {
        let session = PlaybackSession::new();
        assert_eq!(session.state(), &PlaybackState::Stopped);
        assert!(session.state().active_id().is_none());
    }

    #[test]
    fn play_pause_resume_cycle() {
        let mut session = PlaybackSession::new();
        session.play(id("a"));
        assert!(session.state().is_playing(&id("a")));

        session.pause().unwrap();
        assert!(session.state().is_paused(&id("a")));
        assert!(session.state().playing_id().is_none());
        assert_eq!(session.state().active_id(), Some(&id("a")));

        session.resume().unwrap();
        assert!(session.state().is_playing(&id("a")));
    }

    #[test]
    fn play_replaces_active_item() {
        let mut session = PlaybackSession::new();
        session.play(id("a"));
        session.play(id("b"));
        assert!(session.state().is_playing(&id("b")));
        assert!(!session.state().is_playing(&id("a")));
    }

    #[test]
    fn pause_when_stopped_fails() {
        let mut session = PlaybackSession::new();
        let err = session.pause().unwrap_err();
        assert_eq!(err.current_state, "stopped");
        assert_eq!(err.action, "pause");
    }

    #[test]
    fn resume_when_playing_fails() {
        let mut session = PlaybackSession::new();
        session.play(id("a"));
        let err = session.resume().unwrap_err();
        assert_eq!(err.current_state, "playing");
    }

    #[test]
    fn stop_from_paused() {
        let mut session = PlaybackSession::new();
        session.play(id("a"));
        session.pause().unwrap();
        session.stop();
        assert_eq!(session.state(), &PlaybackState::Stopped);
    }

    #[test]
    fn state_display() {
        assert_eq!(PlaybackState::Stopped.to_string(), "stopped");
        assert_eq!(PlaybackState::Playing(id("x")).to_string(), "playing x");
        assert_eq!(PlaybackState::Paused(id("x")).to_string(), "paused x");
    }
}
