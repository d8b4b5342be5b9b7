use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use log::LevelFilter;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::conversion::Rounding;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read config file {path}: {source}")]
    Unreadable { path: PathBuf, source: std::io::Error },
    #[error("Invalid config file: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Unknown flag '{0}'")]
    UnknownFlag(String),
    #[error("Flag '{0}' expects a value")]
    MissingValue(String),
    #[error("Invalid value '{value}' for {field}")]
    InvalidValue { field: String, value: String },
}

/// Runtime settings for the converter
#[derive(Debug, Clone, PartialEq)]
pub struct ConverterSettings {
    /// Simulated processing latency before a result appears
    pub delay_ms: u64,
    pub rounding: Rounding,
    pub log_level: LevelFilter,
    /// TrueType/OpenType font used for snapshot text, if any
    pub font_path: Option<PathBuf>,
    pub snapshot_width: u32,
    pub snapshot_height: u32,
}

impl ConverterSettings {
    pub const DEFAULT_DELAY_MS: u64 = 800;
    pub const MAX_DELAY_MS: u64 = 10_000;
    pub const DEFAULT_SNAPSHOT_WIDTH: u32 = 640;
    pub const DEFAULT_SNAPSHOT_HEIGHT: u32 = 420;
    pub const MIN_SNAPSHOT_SIZE: u32 = 200;
    pub const MAX_SNAPSHOT_SIZE: u32 = 4096;

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn sanitize_delay(value: u64) -> u64 {
        value.min(Self::MAX_DELAY_MS)
    }

    pub fn sanitize_snapshot_dimension(value: u32) -> u32 {
        value.clamp(Self::MIN_SNAPSHOT_SIZE, Self::MAX_SNAPSHOT_SIZE)
    }

    /// Parses settings from JSON; absent fields keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let file: SettingsFile = serde_json::from_str(json)?;
        let mut settings = Self::default();
        settings.merge_file(file)?;
        Ok(settings)
    }

    /// Reads settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Builds settings from defaults, then the config file, then flags
    pub fn resolve(overrides: &SettingsOverrides) -> Result<Self, SettingsError> {
        let mut settings = match &overrides.config_path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Some(delay_ms) = overrides.delay_ms {
            settings.delay_ms = Self::sanitize_delay(delay_ms);
        }
        if let Some(rounding) = overrides.rounding {
            settings.rounding = rounding;
        }
        if let Some(level) = overrides.log_level {
            settings.log_level = level;
        }

        Ok(settings)
    }

    fn merge_file(&mut self, file: SettingsFile) -> Result<(), SettingsError> {
        if let Some(delay_ms) = file.delay_ms {
            self.delay_ms = Self::sanitize_delay(delay_ms);
        }
        if let Some(rounding) = file.rounding {
            self.rounding = rounding;
        }
        if let Some(level) = file.log_level {
            self.log_level = parse_level("log_level", &level)?;
        }
        if let Some(font_path) = file.font_path {
            self.font_path = Some(font_path);
        }
        if let Some(width) = file.snapshot_width {
            self.snapshot_width = Self::sanitize_snapshot_dimension(width);
        }
        if let Some(height) = file.snapshot_height {
            self.snapshot_height = Self::sanitize_snapshot_dimension(height);
        }
        Ok(())
    }
}

impl Default for ConverterSettings {
    fn default() -> Self {
        Self {
            delay_ms: Self::DEFAULT_DELAY_MS,
            rounding: Rounding::Exact,
            log_level: LevelFilter::Warn,
            font_path: None,
            snapshot_width: Self::DEFAULT_SNAPSHOT_WIDTH,
            snapshot_height: Self::DEFAULT_SNAPSHOT_HEIGHT,
        }
    }
}

/// On-disk shape of the config file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    delay_ms: Option<u64>,
    rounding: Option<Rounding>,
    log_level: Option<String>,
    font_path: Option<PathBuf>,
    snapshot_width: Option<u32>,
    snapshot_height: Option<u32>,
}

/// Values given on the command line, applied over the config file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsOverrides {
    pub config_path: Option<PathBuf>,
    pub delay_ms: Option<u64>,
    pub rounding: Option<Rounding>,
    pub log_level: Option<LevelFilter>,
    pub show_help: bool,
}

impl SettingsOverrides {
    pub const USAGE: &'static str = "Usage: axis-gate [--config <file.json>] [--delay-ms <n>] \
[--rounding <exact|floor>] [--log-level <off|error|warn|info|debug|trace>]";

    /// Parses flags, excluding the program name
    pub fn parse<I, S>(args: I) -> Result<Self, SettingsError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut overrides = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            let flag = arg.as_ref().to_string();
            if flag == "--help" || flag == "-h" {
                overrides.show_help = true;
                continue;
            }

            let value = match flag.as_str() {
                "--config" | "--delay-ms" | "--rounding" | "--log-level" => args
                    .next()
                    .map(|v| v.as_ref().to_string())
                    .ok_or_else(|| SettingsError::MissingValue(flag.clone()))?,
                _ => return Err(SettingsError::UnknownFlag(flag.clone())),
            };

            match flag.as_str() {
                "--config" => overrides.config_path = Some(PathBuf::from(value)),
                "--delay-ms" => {
                    let delay = value.trim().parse::<u64>().map_err(|_| SettingsError::InvalidValue {
                        field: flag.clone(),
                        value: value.clone(),
                    })?;
                    overrides.delay_ms = Some(delay);
                }
                "--rounding" => {
                    let rounding = Rounding::from_name(&value).ok_or_else(|| SettingsError::InvalidValue {
                        field: flag.clone(),
                        value: value.clone(),
                    })?;
                    overrides.rounding = Some(rounding);
                }
                _ => overrides.log_level = Some(parse_level(&flag, &value)?),
            }
        }

        Ok(overrides)
    }
}

fn parse_level(field: &str, value: &str) -> Result<LevelFilter, SettingsError> {
    LevelFilter::from_str(value.trim()).map_err(|_| SettingsError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    })
}
