//! Text commands accepted by the terminal form
//!
//! One command per line. Keywords are case-insensitive; field values are
//! kept verbatim so any text can be typed into a coordinate field.

use std::path::PathBuf;

use crate::domain::core::Axis;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,
    #[error("Unknown command '{0}' (type 'help' for a list)")]
    Unknown(String),
    #[error("'{command}' needs an axis: x, y or z")]
    MissingAxis { command: &'static str },
    #[error("Unknown axis '{0}', expected x, y or z")]
    InvalidAxis(String),
    #[error("'snapshot' needs an output path")]
    MissingPath,
}

/// A parsed form interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Flip the conversion direction
    Toggle,
    /// Type text into a field of the active set
    Set { axis: Axis, value: String },
    /// Empty a field of the active set
    Clear(Axis),
    /// Activate the convert control
    Convert,
    /// Redraw the form
    Show,
    /// Save a PNG rendering of the form
    Snapshot(PathBuf),
    Help,
    Quit,
}

impl Command {
    pub const HELP: &'static str = "\
Commands:
  toggle              switch between Nether → Overworld and Overworld → Nether
  set <x|y|z> <text>  type a value into the active coordinate set
  clear <x|y|z>       empty a field of the active coordinate set
  convert             run the conversion
  show                redraw the form
  snapshot <file.png> save a picture of the form
  help                show this list
  quit                leave";

    /// Parses one input line
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let (keyword, rest) = match line.split_once(char::is_whitespace) {
            Some((keyword, rest)) => (keyword, rest.trim()),
            None => (line, ""),
        };

        match keyword.to_ascii_lowercase().as_str() {
            "" => Err(CommandError::Empty),
            "toggle" | "t" => Ok(Command::Toggle),
            "convert" | "c" => Ok(Command::Convert),
            "show" | "s" => Ok(Command::Show),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            "set" => {
                let (axis, value) = match rest.split_once(char::is_whitespace) {
                    Some((axis, value)) => (axis, value.trim()),
                    None => (rest, ""),
                };
                let axis = parse_axis("set", axis)?;
                Ok(Command::Set {
                    axis,
                    value: value.to_string(),
                })
            }
            "clear" => Ok(Command::Clear(parse_axis("clear", rest)?)),
            "snapshot" => {
                if rest.is_empty() {
                    Err(CommandError::MissingPath)
                } else {
                    Ok(Command::Snapshot(PathBuf::from(rest)))
                }
            }
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn parse_axis(command: &'static str, text: &str) -> Result<Axis, CommandError> {
    if text.is_empty() {
        return Err(CommandError::MissingAxis { command });
    }
    Axis::from_name(text).ok_or_else(|| CommandError::InvalidAxis(text.to_string()))
}
