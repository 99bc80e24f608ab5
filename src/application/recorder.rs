//! Recorder session use case

use std::path::PathBuf;

use thiserror::Error;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use crate::domain::capture::{CapturePreset, CaptureSession, CaptureState};
use crate::domain::error::InvalidStateTransition;

use super::ports::{
    AudioCapture, CaptureError, DurationProbe, MicrophonePermission, PlaybackError,
};

/// Errors from the recorder session
#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("Microphone permission was denied")]
    PermissionDenied,

    #[error("Recorder is busy, please wait")]
    Busy,

    #[error("No recording in progress")]
    NotRecording,

    #[error("Could not start recording: {0}")]
    StartFailed(#[source] CaptureError),

    #[error("Could not stop recording: {0}")]
    StopFailed(#[source] CaptureError),

    #[error("Could not read recording duration: {0}")]
    DurationUnavailable(#[from] PlaybackError),

    #[error(transparent)]
    InvalidState(#[from] InvalidStateTransition),
}

/// A finished capture handed over to the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedRecording {
    pub path: PathBuf,
    pub duration_millis: u64,
}

/// Microphone capture lifecycle: permission, start, stop.
///
/// Only one capture can be live. Calls that arrive while another start or
/// stop is still running are rejected with [`RecorderError::Busy`].
pub struct RecorderSession<C, M, D>
where
    C: AudioCapture,
    M: MicrophonePermission,
    D: DurationProbe,
{
    capture: C,
    permission: M,
    probe: D,
    preset: CapturePreset,
    session: Mutex<CaptureSession>,
    updates: watch::Sender<CaptureState>,
}

impl<C, M, D> RecorderSession<C, M, D>
where
    C: AudioCapture,
    M: MicrophonePermission,
    D: DurationProbe,
{
    pub fn new(capture: C, permission: M, probe: D, preset: CapturePreset) -> Self {
        let (updates, _) = watch::channel(CaptureState::Idle);
        Self {
            capture,
            permission,
            probe,
            preset,
            session: Mutex::new(CaptureSession::new()),
            updates,
        }
    }

    /// Last published state
    pub fn state(&self) -> CaptureState {
        *self.updates.borrow()
    }

    /// Observe state changes
    pub fn subscribe(&self) -> watch::Receiver<CaptureState> {
        self.updates.subscribe()
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.capture.elapsed_ms()
    }

    /// IDLE -> RECORDING
    pub async fn start(&self) -> Result<(), RecorderError> {
        let mut session = self.session.try_lock().map_err(|_| RecorderError::Busy)?;
        if session.is_recording() {
            return Err(RecorderError::Busy);
        }

        if !self.permission.status().await.is_granted() {
            let answer = self.permission.request().await;
            if !answer.is_granted() {
                info!(?answer, "microphone permission not granted");
                return Err(RecorderError::PermissionDenied);
            }
        }

        self.capture
            .start(&self.preset)
            .await
            .map_err(RecorderError::StartFailed)?;

        session.start()?;
        self.updates.send_replace(session.state());
        debug!(sample_rate = self.preset.sample_rate, "recording started");
        Ok(())
    }

    /// RECORDING -> IDLE, returning the captured file and its duration.
    ///
    /// The session is back to idle afterwards whether or not finalizing
    /// the file succeeded.
    pub async fn stop(&self) -> Result<CapturedRecording, RecorderError> {
        let mut session = self.session.try_lock().map_err(|_| RecorderError::Busy)?;
        if !session.is_recording() {
            return Err(RecorderError::NotRecording);
        }

        let finished = self.capture.stop().await;

        session.stop()?;
        self.updates.send_replace(session.state());

        let path = finished.map_err(|e| {
            warn!(error = %e, "could not finalize recording");
            RecorderError::StopFailed(e)
        })?;

        let duration_millis = self.probe.duration_ms(&path).await.inspect_err(|e| {
            warn!(error = %e, path = %path.display(), "could not read duration");
        })?;

        debug!(path = %path.display(), duration_millis, "recording stopped");
        Ok(CapturedRecording {
            path,
            duration_millis,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::PermissionStatus;
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct MockCapture {
        fail_start: bool,
        fail_stop: bool,
        starts: AtomicUsize,
    }

    #[async_trait]
    impl AudioCapture for MockCapture {
        async fn start(&self, _preset: &CapturePreset) -> Result<(), CaptureError> {
            if self.fail_start {
                return Err(CaptureError::NoAudioDevice);
            }
            self.starts.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn stop(&self) -> Result<PathBuf, CaptureError> {
            if self.fail_stop {
                return Err(CaptureError::NoAudio);
            }
            Ok(PathBuf::from("/tmp/capture-1.wav"))
        }

        fn elapsed_ms(&self) -> u64 {
            0
        }
    }

    struct MockPermission {
        status: PermissionStatus,
        answer: PermissionStatus,
        requests: Arc<AtomicUsize>,
    }

    impl MockPermission {
        fn granted() -> Self {
            Self::with(PermissionStatus::Granted, PermissionStatus::Granted)
        }

        fn with(status: PermissionStatus, answer: PermissionStatus) -> Self {
            Self {
                status,
                answer,
                requests: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl MicrophonePermission for MockPermission {
        async fn status(&self) -> PermissionStatus {
            self.status
        }

        async fn request(&self) -> PermissionStatus {
            self.requests.fetch_add(1, Ordering::SeqCst);
            self.answer
        }
    }

    struct MockProbe(Result<u64, PlaybackError>);

    #[async_trait]
    impl DurationProbe for MockProbe {
        async fn duration_ms(&self, _path: &Path) -> Result<u64, PlaybackError> {
            self.0.clone()
        }
    }

    fn session(
        capture: MockCapture,
        permission: MockPermission,
    ) -> RecorderSession<MockCapture, MockPermission, MockProbe> {
        RecorderSession::new(
            capture,
            permission,
            MockProbe(Ok(3_500)),
            CapturePreset::high_quality(),
        )
    }

    #[tokio::test]
    async fn start_then_stop_returns_file_and_duration() {
        let recorder = session(MockCapture::default(), MockPermission::granted());

        recorder.start().await.unwrap();
        assert_eq!(recorder.state(), CaptureState::Recording);

        let captured = recorder.stop().await.unwrap();
        assert_eq!(captured.path, PathBuf::from("/tmp/capture-1.wav"));
        assert_eq!(captured.duration_millis, 3_500);
        assert_eq!(recorder.state(), CaptureState::Idle);
    }

    #[tokio::test]
    async fn start_requests_permission_when_undetermined() {
        let permission =
            MockPermission::with(PermissionStatus::Undetermined, PermissionStatus::Granted);
        let requests = Arc::clone(&permission.requests);
        let recorder = session(MockCapture::default(), permission);

        recorder.start().await.unwrap();
        assert_eq!(requests.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn declined_permission_stays_idle() {
        let recorder = session(
            MockCapture::default(),
            MockPermission::with(PermissionStatus::Undetermined, PermissionStatus::Denied),
        );

        let err = recorder.start().await.unwrap_err();
        assert!(matches!(err, RecorderError::PermissionDenied));
        assert_eq!(recorder.state(), CaptureState::Idle);
        assert_eq!(recorder.capture.starts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn start_while_recording_is_busy() {
        let recorder = session(MockCapture::default(), MockPermission::granted());
        recorder.start().await.unwrap();

        let err = recorder.start().await.unwrap_err();
        assert!(matches!(err, RecorderError::Busy));
        assert_eq!(recorder.capture.starts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn device_failure_on_start_stays_idle() {
        let capture = MockCapture {
            fail_start: true,
            ..Default::default()
        };
        let recorder = session(capture, MockPermission::granted());

        let err = recorder.start().await.unwrap_err();
        assert!(matches!(err, RecorderError::StartFailed(CaptureError::NoAudioDevice)));
        assert_eq!(recorder.state(), CaptureState::Idle);
    }

    #[tokio::test]
    async fn stop_when_idle_is_rejected() {
        let recorder = session(MockCapture::default(), MockPermission::granted());
        assert!(matches!(
            recorder.stop().await.unwrap_err(),
            RecorderError::NotRecording
        ));
    }

    #[tokio::test]
    async fn failed_stop_returns_to_idle() {
        let capture = MockCapture {
            fail_stop: true,
            ..Default::default()
        };
        let recorder = session(capture, MockPermission::granted());
        recorder.start().await.unwrap();

        let err = recorder.stop().await.unwrap_err();
        assert!(matches!(err, RecorderError::StopFailed(CaptureError::NoAudio)));
        assert_eq!(recorder.state(), CaptureState::Idle);

        // A new session can begin
        recorder.start().await.unwrap();
    }

    #[tokio::test]
    async fn probe_failure_still_returns_to_idle() {
        let recorder = RecorderSession::new(
            MockCapture::default(),
            MockPermission::granted(),
            MockProbe(Err(PlaybackError::ProbeFailed("bad header".into()))),
            CapturePreset::high_quality(),
        );
        recorder.start().await.unwrap();

        let err = recorder.stop().await.unwrap_err();
        assert!(matches!(err, RecorderError::DurationUnavailable(_)));
        assert_eq!(recorder.state(), CaptureState::Idle);
    }

    #[tokio::test]
    async fn subscribers_see_transitions() {
        let recorder = session(MockCapture::default(), MockPermission::granted());
        let mut rx = recorder.subscribe();

        recorder.start().await.unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), CaptureState::Recording);

        recorder.stop().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), CaptureState::Idle);
    }
}
