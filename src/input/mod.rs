//! Input handling for the terminal form
//!
//! Parses typed commands and captures console lines on a background thread.

pub mod commands;
pub mod console;

pub use commands::{Command, CommandError};
