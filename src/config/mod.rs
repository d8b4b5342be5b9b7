//! Configuration module for axis-gate
//!
//! Settings come from built-in defaults, an optional JSON file and command
//! line flags, in increasing order of precedence.

pub mod settings;

pub use settings::{ConverterSettings, SettingsError, SettingsOverrides};
