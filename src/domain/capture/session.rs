//! Capture session state machine

use std::fmt;

use crate::domain::error::InvalidStateTransition;

/// Microphone capture states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CaptureState {
    #[default]
    Idle,
    Recording,
}

impl CaptureState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
        }
    }
}

impl fmt::Display for CaptureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Capture session entity.
///
/// State machine:
///   IDLE -> RECORDING (start)
///   RECORDING -> IDLE (stop)
#[derive(Debug, Default)]
pub struct CaptureSession {
    state: CaptureState,
}

impl CaptureSession {
    /// Create a new session in idle state
    pub fn new() -> Self {
        Self {
            state: CaptureState::Idle,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == CaptureState::Idle
    }

    pub fn is_recording(&self) -> bool {
        self.state == CaptureState::Recording
    }

    /// Transition from IDLE to RECORDING
    pub fn start(&mut self) -> Result<(), InvalidStateTransition> {
        if self.state != CaptureState::Idle {
            return Err(InvalidStateTransition::new(self.state, "start recording"));
        }
        self.state = CaptureState::Recording;
        Ok(())
    }

    /// Transition from RECORDING to IDLE
    pub fn stop(&mut self) -> Result<(), InvalidStateTransition> {
        if self.state != CaptureState::Recording {
            return Err(InvalidStateTransition::new(self.state, "stop recording"));
        }
        self.state = CaptureState::Idle;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_idle() {
        let session = CaptureSession::new();
        assert!(session.is_idle());
        assert!(!session.is_recording());
    }

    #[test]
    fn start_from_idle() {
        let mut session = CaptureSession::new();
        assert!(session.start().is_ok());
        assert!(session.is_recording());
    }

    #[test]
    fn start_while_recording_fails() {
        let mut session = CaptureSession::new();
        session.start().unwrap();

        let err = session.start().unwrap_err();
        assert_eq!(err.current_state, "recording");
        assert!(err.action.contains("start recording"));
    }

    #[test]
    fn stop_from_idle_fails() {
        let mut session = CaptureSession::new();
        let err = session.stop().unwrap_err();
        assert_eq!(err.current_state, "idle");
    }

    #[test]
    fn full_cycle() {
        let mut session = CaptureSession::new();
        session.start().unwrap();
        session.stop().unwrap();
        assert!(session.is_idle());

        // Can start another cycle
        session.start().unwrap();
        assert!(session.is_recording());
    }

    #[test]
    fn state_display() {
        assert_eq!(CaptureState::Idle.to_string(), "idle");
        assert_eq!(CaptureState::Recording.to_string(), "recording");
    }
}
