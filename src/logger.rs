// src/logger.rs

//! Process logger for the `log` facade.
//!
//! Prints one coloured line per record with a wall-clock timestamp:
//!
//! ```text
//! [INFO]  [12:34:56] dynamics loop started (dt = 0.005, scale = 1)
//! ```

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

struct Logger;

static LOGGER: Logger = Logger;

impl Logger {
    fn style(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1b[31m", "[ERROR]"),
            Level::Warn => ("\x1b[35m", "[WARN] "),
            Level::Info => ("\x1b[32m", "[INFO] "),
            Level::Debug => ("\x1b[33m", "[DEBUG]"),
            Level::Trace => ("\x1b[90m", "[TRACE]"),
        }
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let (colour, tag) = Self::style(record.level());
        let line = format!(
            "{colour}{tag} [{}]\x1b[0m {}",
            chrono::Utc::now().format("%H:%M:%S"),
            record.args()
        );
        if record.level() <= Level::Warn {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }

    fn flush(&self) {}
}

/// Installs the process logger and sets the maximum level.
///
/// Fails if a logger is already installed.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}
