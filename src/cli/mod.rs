//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, the interactive screen and
//! its command parser, and the app runners.

pub mod app;
pub mod args;
pub mod command;
pub mod config_cmd;
pub mod presenter;
pub mod screen;

// Re-export commonly used types
pub use app::{run_list, run_screen, DesktopVoiceNotes, EXIT_ERROR, EXIT_SUCCESS};
pub use args::{Cli, Commands, ConfigAction};
pub use command::{parse as parse_command, ScreenCommand};
pub use presenter::Presenter;
pub use screen::Screen;
