//! Logger setup for the `log` facade
//!
//! Diagnostics go to stderr through `env_logger`, keeping stdout for the
//! form itself.

use std::io::Write;

use env_logger::{Builder, Target};
use log::{LevelFilter, Record, SetLoggerError};

fn format_record(record: &Record) -> String {
    format!("[{} {}] {}", record.level(), record.target(), record.args())
}

/// Logger builder writing `[LEVEL target] message` lines to stderr
pub fn builder(level: LevelFilter) -> Builder {
    let mut builder = Builder::new();
    builder
        .filter_level(level)
        .target(Target::Stderr)
        .format(|buf, record| writeln!(buf, "{}", format_record(record)));
    builder
}

/// Installs the global logger at `level`
///
/// Calling this twice returns the error from the second `set_logger`.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    builder(level).try_init()
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::{Level, Log};

    #[test]
    fn records_carry_level_and_target() {
        assert_eq!(
            format_record(
                &Record::builder()
                    .args(format_args!("Direction toggled to {}", "Overworld → Nether"))
                    .level(Level::Info)
                    .target("axis_gate::app::state")
                    .build()
            ),
            "[INFO axis_gate::app::state] Direction toggled to Overworld → Nether"
        );
    }

    #[test]
    fn builder_applies_level() {
        let logger = builder(LevelFilter::Info).build();
        assert_eq!(logger.filter(), LevelFilter::Info);

        let debug = log::Metadata::builder().level(Level::Debug).target("axis_gate").build();
        let warn = log::Metadata::builder().level(Level::Warn).target("axis_gate").build();
        assert!(!logger.enabled(&debug));
        assert!(logger.enabled(&warn));
    }
}
