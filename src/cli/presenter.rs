//! CLI presenter for output formatting

use std::io::{self, Write};

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::domain::playback::PlaybackState;
use crate::domain::recording::RecordingMeta;
use crate::domain::{format_date, format_duration};

const SCREEN_HELP: &[(&str, &str)] = &[
    ("record, r", "Start or stop recording"),
    ("play, p <n>", "Play or pause recording n"),
    ("pause", "Pause playback"),
    ("resume", "Resume paused playback"),
    ("stop", "Stop playback"),
    ("rename <n> <name>", "Rename recording n"),
    ("delete <n>", "Delete recording n"),
    ("search <text>", "Filter by name (empty clears)"),
    ("list, ls", "Show recordings"),
    ("help", "Show this help"),
    ("quit, q", "Exit"),
];

/// Presenter for CLI output formatting
pub struct Presenter {
    spinner: Option<ProgressBar>,
}

impl Presenter {
    pub fn new() -> Self {
        Self { spinner: None }
    }

    /// Start a spinner with message
    pub fn start_spinner(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg}")
        {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    /// Mark spinner as success and finish
    pub fn spinner_success(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✓".green(), message));
        }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Output text to stdout without newline
    pub fn output_inline(&self, text: &str) {
        print!("{}", text);
        let _ = io::stdout().flush();
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }

    /// Recording indicator shown while the microphone is open
    pub fn recording_started(&self) {
        eprintln!("{} Recording... type 'r' to stop", "●".red());
    }

    pub fn playback_status(&self, state: &PlaybackState, name: &str) {
        match state {
            PlaybackState::Playing(_) => eprintln!("{} Playing {}", "▶".green(), name.bold()),
            PlaybackState::Paused(_) => eprintln!("{} Paused {}", "⏸".yellow(), name.bold()),
            PlaybackState::Stopped => eprintln!("{} Stopped", "■".dimmed()),
        }
    }

    /// Format one list row: position, marker, name, date and duration
    pub fn format_row(&self, position: usize, meta: &RecordingMeta, playback: &PlaybackState) -> String {
        let marker = if playback.is_playing(&meta.id) {
            "▶".green().to_string()
        } else if playback.is_paused(&meta.id) {
            "⏸".yellow().to_string()
        } else {
            " ".to_string()
        };

        format!(
            "{} {:>3}. {}  {}  {}",
            marker,
            position,
            meta.name.bold(),
            format_date(&meta.date).dimmed(),
            format_duration(meta.duration_millis as f64).cyan()
        )
    }

    /// Print the given recordings as a numbered list
    pub fn recordings(&self, items: &[RecordingMeta], playback: &PlaybackState) {
        for (i, meta) in items.iter().enumerate() {
            self.output(&self.format_row(i + 1, meta, playback));
        }
    }

    pub fn help(&self) {
        for (usage, description) in SCREEN_HELP {
            println!("  {:<20} {}", usage.cyan(), description);
        }
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}
