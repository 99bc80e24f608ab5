//! Interactive screen command parsing

use thiserror::Error;

/// A command typed at the screen prompt.
///
/// Item numbers are 1-based positions in the currently shown list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenCommand {
    /// Start recording, or stop and save the current one
    Record,
    Play(usize),
    Pause,
    Resume,
    Stop,
    Rename(usize, String),
    Delete(usize),
    /// Filter by name; an empty query clears the filter
    Search(String),
    List,
    Help,
    Quit,
    /// Blank line
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandParseError {
    #[error("Unknown command '{0}'. Type 'help' for a list of commands")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("'{0}' is not a recording number")]
    InvalidNumber(String),

    #[error("Please enter a valid name")]
    EmptyName,
}

fn parse_position(raw: Option<&str>, usage: &'static str) -> Result<usize, CommandParseError> {
    let raw = raw.ok_or(CommandParseError::Usage(usage))?;
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CommandParseError::InvalidNumber(raw.to_string())),
    }
}

/// Parse one input line
pub fn parse(line: &str) -> Result<ScreenCommand, CommandParseError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_lowercase().as_str() {
        "" => ScreenCommand::Empty,
        "record" | "r" => ScreenCommand::Record,
        "play" | "p" => {
            let n = parse_position(Some(rest).filter(|s| !s.is_empty()), "play <n>")?;
            ScreenCommand::Play(n)
        }
        "pause" => ScreenCommand::Pause,
        "resume" => ScreenCommand::Resume,
        "stop" => ScreenCommand::Stop,
        "rename" => {
            const USAGE: &str = "rename <n> <name>";
            let (raw, name) = match rest.split_once(char::is_whitespace) {
                Some((raw, name)) => (Some(raw), name.trim()),
                None => (Some(rest).filter(|s| !s.is_empty()), ""),
            };
            let n = parse_position(raw, USAGE)?;
            if name.is_empty() {
                return Err(CommandParseError::EmptyName);
            }
            ScreenCommand::Rename(n, name.to_string())
        }
        "delete" | "rm" => {
            let n = parse_position(Some(rest).filter(|s| !s.is_empty()), "delete <n>")?;
            ScreenCommand::Delete(n)
        }
        "search" | "/" => ScreenCommand::Search(rest.to_string()),
        "list" | "ls" => ScreenCommand::List,
        "help" | "?" => ScreenCommand::Help,
        "quit" | "q" | "exit" => ScreenCommand::Quit,
        other => return Err(CommandParseError::Unknown(other.to_string())),
    };

    Ok(command)
}

/// Whether a reply to a yes/no question means yes
pub fn is_confirmation(reply: &str) -> bool {
    matches!(reply.trim().to_lowercase().as_str(), "y" | "yes")
}
