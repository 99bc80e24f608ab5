//! App runners for the interactive screen and the `list` command

use std::path::PathBuf;
use std::process::ExitCode;

use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::application::ports::ConfigStore;
use crate::application::{PlaybackController, RecorderSession, RecordingStore, VoiceNotes};
use crate::domain::config::{default_capture_dir, AppConfig};
use crate::domain::playback::PlaybackState;
use crate::infrastructure::{
    CpalCapture, DecoderProbe, DevicePermission, FileKeyValueStore, LocalAudioFiles, RodioPlayer,
    XdgConfigStore,
};

use super::presenter::Presenter;
use super::screen::Screen;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;

/// The library wired to the desktop adapters
pub type DesktopVoiceNotes = VoiceNotes<
    FileKeyValueStore,
    LocalAudioFiles,
    CpalCapture,
    DevicePermission,
    DecoderProbe,
    RodioPlayer,
>;

/// Install the stderr log subscriber. `RUST_LOG` overrides the `warn` default.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Load and merge configuration: defaults < file < CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load().await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "ignoring unreadable config file");
        AppConfig::empty()
    });

    AppConfig::defaults().merge(file_config).merge(cli_config)
}

/// CLI overrides from the `--data-dir` flag
pub fn cli_config(data_dir: Option<PathBuf>) -> AppConfig {
    AppConfig {
        data_dir: data_dir.map(|p| p.to_string_lossy().into_owned()),
        ..Default::default()
    }
}

fn recording_store(config: &AppConfig) -> RecordingStore<FileKeyValueStore> {
    RecordingStore::new(FileKeyValueStore::new(config.data_dir_or_default()))
}

/// Wire the library to the desktop adapters
pub fn build_voice_notes(config: &AppConfig) -> DesktopVoiceNotes {
    let recorder = RecorderSession::new(
        CpalCapture::new(default_capture_dir()),
        DevicePermission::new(),
        DecoderProbe::new(),
        config.preset_or_default(),
    );

    VoiceNotes::new(
        recording_store(config),
        LocalAudioFiles::new(config.notes_dir()),
        recorder,
        PlaybackController::new(RodioPlayer::new()),
    )
}

/// Print saved recordings, optionally filtered, and exit
pub async fn run_list(config: AppConfig, query: Option<String>) -> ExitCode {
    let presenter = Presenter::new();
    let collection = recording_store(&config).load().await;
    let items: Vec<_> = collection
        .filter(query.as_deref().unwrap_or(""))
        .into_iter()
        .cloned()
        .collect();

    if items.is_empty() {
        presenter.info("No recordings");
    } else {
        presenter.recordings(&items, &PlaybackState::Stopped);
    }
    ExitCode::from(EXIT_SUCCESS)
}

/// Open the interactive screen
pub async fn run_screen(config: AppConfig) -> ExitCode {
    let mut presenter = Presenter::new();
    debug!(data_dir = %config.data_dir_or_default().display(), "opening screen");

    let notes = build_voice_notes(&config);

    presenter.start_spinner("Loading recordings...");
    let count = notes.load().await;
    presenter.spinner_success(&format!(
        "{} recording{}",
        count,
        if count == 1 { "" } else { "s" }
    ));

    Screen::new(&notes, &presenter).run().await;

    ExitCode::from(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_config_only_sets_data_dir() {
        let config = cli_config(Some(PathBuf::from("/srv/notes")));
        assert_eq!(config.data_dir.as_deref(), Some("/srv/notes"));
        assert!(config.sample_rate.is_none());

        assert_eq!(cli_config(None), AppConfig::empty());
    }

    #[test]
    fn cli_data_dir_wins_over_file() {
        let file = AppConfig {
            data_dir: Some("/from/file".into()),
            sample_rate: Some(48_000),
        };
        let merged = AppConfig::defaults()
            .merge(file)
            .merge(cli_config(Some(PathBuf::from("/from/cli"))));

        assert_eq!(merged.data_dir.as_deref(), Some("/from/cli"));
        assert_eq!(merged.sample_rate, Some(48_000));
    }

    #[tokio::test]
    async fn list_on_empty_data_dir_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let config = cli_config(Some(dir.path().to_path_buf()));
        assert_eq!(run_list(config, None).await, ExitCode::from(EXIT_SUCCESS));
    }
}
