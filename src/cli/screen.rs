//! Interactive voice notes screen
//!
//! One prompt drives everything. Input lines, playback state changes and
//! Ctrl-C are multiplexed with `tokio::select!`, so a note finishing in the
//! background is announced without waiting for the next command.

use tokio::sync::mpsc;
use tracing::debug;

use crate::application::ports::{
    AudioCapture, AudioFiles, AudioPlayer, DurationProbe, KeyValueStore, MicrophonePermission,
};
use crate::application::{LibraryError, VoiceNotes};
use crate::domain::capture::CaptureState;
use crate::domain::format_duration;
use crate::domain::playback::PlaybackState;
use crate::domain::recording::RecordingMeta;

use super::command::{is_confirmation, parse, ScreenCommand};
use super::presenter::Presenter;

/// Whether the loop should keep going after a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Read stdin lines on a plain thread.
///
/// A blocked read on this thread does not hold up runtime shutdown.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        let mut line = String::new();
        loop {
            line.clear();
            match stdin.read_line(&mut line) {
                Ok(0) | Err(_) => break,
                Ok(_) => {
                    if tx.send(line.trim_end_matches(['\r', '\n']).to_string()).is_err() {
                        break;
                    }
                }
            }
        }
    });
    rx
}

/// State of the interactive screen
pub struct Screen<'a, S, F, C, M, D, P>
where
    S: KeyValueStore,
    F: AudioFiles,
    C: AudioCapture,
    M: MicrophonePermission,
    D: DurationProbe,
    P: AudioPlayer + 'static,
{
    notes: &'a VoiceNotes<S, F, C, M, D, P>,
    presenter: &'a Presenter,
    query: String,
    visible: Vec<RecordingMeta>,
    pending_delete: Option<RecordingMeta>,
    last_playback: PlaybackState,
}

impl<'a, S, F, C, M, D, P> Screen<'a, S, F, C, M, D, P>
where
    S: KeyValueStore,
    F: AudioFiles,
    C: AudioCapture,
    M: MicrophonePermission,
    D: DurationProbe,
    P: AudioPlayer + 'static,
{
    pub fn new(notes: &'a VoiceNotes<S, F, C, M, D, P>, presenter: &'a Presenter) -> Self {
        Self {
            notes,
            presenter,
            query: String::new(),
            visible: Vec::new(),
            pending_delete: None,
            last_playback: PlaybackState::Stopped,
        }
    }

    /// Run until `quit`, end of input or Ctrl-C
    pub async fn run(&mut self) {
        let mut input = spawn_stdin_reader();
        let mut playback = self.notes.subscribe_playback();

        self.refresh().await;
        self.render();
        self.presenter.info("Type 'help' for commands");
        self.prompt();

        loop {
            tokio::select! {
                line = input.recv() => {
                    let Some(line) = line else { break };
                    if self.handle_line(&line).await == Flow::Quit {
                        break;
                    }
                    self.prompt();
                }
                Ok(()) = playback.changed() => {
                    let state = playback.borrow_and_update().clone();
                    if self.on_playback_change(state) {
                        self.prompt();
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    self.presenter.output("");
                    break;
                }
            }
        }

        self.shutdown().await;
    }

    fn prompt(&self) {
        match &self.pending_delete {
            Some(meta) => self
                .presenter
                .output_inline(&format!("Delete '{}'? [y/N] ", meta.name)),
            None if self.notes.recorder_state() == CaptureState::Recording => {
                let elapsed = format_duration(self.notes.recording_elapsed_ms() as f64);
                self.presenter.output_inline(&format!("rec {}> ", elapsed))
            }
            None => self.presenter.output_inline("> "),
        }
    }

    async fn refresh(&mut self) {
        self.visible = self.notes.search(&self.query).await;
    }

    fn render(&self) {
        if self.visible.is_empty() {
            if self.query.trim().is_empty() {
                self.presenter.info("No recordings yet. Type 'r' to record one");
            } else {
                self.presenter
                    .info(&format!("No recordings match '{}'", self.query.trim()));
            }
            return;
        }
        self.presenter
            .recordings(&self.visible, &self.notes.playback_state());
    }

    /// Returns true when something was printed
    fn on_playback_change(&mut self, state: PlaybackState) -> bool {
        let previous = std::mem::replace(&mut self.last_playback, state.clone());
        match (previous, state) {
            (PlaybackState::Playing(id), PlaybackState::Stopped) => {
                let name = self
                    .visible
                    .iter()
                    .find(|m| m.id == id)
                    .map(|m| m.name.clone())
                    .unwrap_or_else(|| id.to_string());
                self.presenter.output("");
                self.presenter.success(&format!("Finished playing {}", name));
                true
            }
            _ => false,
        }
    }

    fn item(&self, position: usize) -> Option<&RecordingMeta> {
        let item = position.checked_sub(1).and_then(|i| self.visible.get(i));
        if item.is_none() {
            self.presenter
                .warn(&format!("No recording #{} in the list", position));
        }
        item
    }

    async fn handle_line(&mut self, line: &str) -> Flow {
        if let Some(meta) = self.pending_delete.take() {
            if is_confirmation(line) {
                self.delete(&meta).await;
            } else {
                self.presenter.info("Delete cancelled");
            }
            return Flow::Continue;
        }

        let command = match parse(line) {
            Ok(command) => command,
            Err(e) => {
                self.presenter.warn(&e.to_string());
                return Flow::Continue;
            }
        };
        debug!(?command, "screen command");

        match command {
            ScreenCommand::Empty => {}
            ScreenCommand::Record => self.toggle_recording().await,
            ScreenCommand::Play(n) => {
                if let Some(meta) = self.item(n).cloned() {
                    match self.notes.play(&meta.id).await {
                        Ok(state) => self.show_playback(state, &meta.name),
                        Err(e) => self.presenter.error(&e.to_string()),
                    }
                    self.last_playback = self.notes.playback_state();
                }
            }
            ScreenCommand::Pause => {
                let result = self.notes.pause().await;
                self.after_transport(result);
            }
            ScreenCommand::Resume => {
                let result = self.notes.resume().await;
                self.after_transport(result);
            }
            ScreenCommand::Stop => {
                if let Err(e) = self.notes.stop_playback().await {
                    self.presenter.error(&e.to_string());
                }
                self.last_playback = self.notes.playback_state();
            }
            ScreenCommand::Rename(n, name) => {
                if let Some(meta) = self.item(n).cloned() {
                    match self.notes.rename(&meta.id, &name).await {
                        Ok(renamed) => self
                            .presenter
                            .success(&format!("Renamed to {}", renamed.name)),
                        Err(e) => self.presenter.error(&e.to_string()),
                    }
                    self.refresh().await;
                }
            }
            ScreenCommand::Delete(n) => {
                self.pending_delete = self.item(n).cloned();
            }
            ScreenCommand::Search(query) => {
                self.query = query;
                self.refresh().await;
                self.render();
            }
            ScreenCommand::List => {
                self.refresh().await;
                self.render();
            }
            ScreenCommand::Help => self.presenter.help(),
            ScreenCommand::Quit => return Flow::Quit,
        }

        Flow::Continue
    }

    fn after_transport(&mut self, result: Result<PlaybackState, LibraryError>) {
        match result {
            Ok(state) => {
                let name = state
                    .active_id()
                    .and_then(|id| self.visible.iter().find(|m| &m.id == id))
                    .map(|m| m.name.clone())
                    .unwrap_or_default();
                self.show_playback(state, &name);
            }
            Err(e) => self.presenter.warn(&e.to_string()),
        }
        self.last_playback = self.notes.playback_state();
    }

    fn show_playback(&self, state: PlaybackState, name: &str) {
        self.presenter.playback_status(&state, name);
    }

    async fn toggle_recording(&mut self) {
        match self.notes.recorder_state() {
            CaptureState::Idle => match self.notes.start_recording().await {
                Ok(()) => self.presenter.recording_started(),
                Err(e) => self.presenter.error(&e.to_string()),
            },
            CaptureState::Recording => {
                let result = self.notes.stop_recording().await;
                self.report_saved(result);
                self.refresh().await;
                self.render();
            }
        }
    }

    fn report_saved(&self, result: Result<RecordingMeta, LibraryError>) {
        match result {
            Ok(meta) => self.presenter.success(&format!(
                "Saved {} ({})",
                meta.name,
                format_duration(meta.duration_millis as f64)
            )),
            // The note is kept in memory; only persistence failed
            Err(e @ LibraryError::NotSaved(_)) => self.presenter.warn(&e.to_string()),
            Err(e) => self.presenter.error(&e.to_string()),
        }
    }

    async fn delete(&mut self, meta: &RecordingMeta) {
        match self.notes.delete(&meta.id).await {
            Ok(removed) => self.presenter.success(&format!("Deleted {}", removed.name)),
            Err(e @ LibraryError::NotSaved(_)) => self.presenter.warn(&e.to_string()),
            Err(e) => self.presenter.error(&e.to_string()),
        }
        self.last_playback = self.notes.playback_state();
        self.refresh().await;
        self.render();
    }

    async fn shutdown(&self) {
        if let Some(result) = self.notes.shutdown().await {
            self.report_saved(result);
        }
    }
}
