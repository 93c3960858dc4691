//! Logger utility for application-wide logging
//!
//! This module provides a custom logger implementation that works alongside
//! the standard log crate. Records go to stderr so stdout stays free for
//! inspection output, and can additionally be mirrored to a file.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;
use log::{Log, Record, Metadata, LevelFilter};

/// Custom logger implementation
pub struct Logger {
    /// Most verbose level that is emitted
    level: LevelFilter,
    /// File handle for log output
    file: Mutex<Option<File>>,
}

impl Logger {
    /// Creates a new logger instance
    ///
    /// # Arguments
    ///
    /// * `level` - Most verbose level to emit
    /// * `log_file` - Optional path of a file that receives a copy of every record
    ///
    /// # Returns
    ///
    /// A new Logger instance or an error if the file cannot be created
    pub fn new(level: LevelFilter, log_file: Option<&str>) -> io::Result<Self> {
        let file = match log_file {
            Some(path) => Some(File::create(Path::new(path))?),
            None => None,
        };

        Ok(Logger {
            level,
            file: Mutex::new(file),
        })
    }

    /// Writes a formatted line to the log file, if one is configured
    fn write_file(&self, message: &str) -> io::Result<()> {
        // A poisoned lock only means another thread panicked mid-write
        let mut guard = match self.file.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(file) = guard.as_mut() {
            writeln!(file, "{}", message)?;
            file.flush()?;
        }
        Ok(())
    }

    /// Static method to initialize the global logger
    ///
    /// Safe to call more than once; later calls only adjust the level.
    pub fn init_global_logger(level: LevelFilter, log_file: Option<&str>) -> io::Result<()> {
        let global_logger = Logger::new(level, log_file)?;

        if log::set_boxed_logger(Box::new(global_logger)).is_err() {
            // Already installed (tests create several converters per process)
            log::debug!("Global logger was already initialized");
        }

        log::set_max_level(level);
        Ok(())
    }

    /// Maps a textual level ("error", "warn", "info", "debug", "trace", "off")
    pub fn parse_level(name: &str) -> Option<LevelFilter> {
        match name.to_ascii_lowercase().as_str() {
            "off" => Some(LevelFilter::Off),
            "error" => Some(LevelFilter::Error),
            "warn" | "warning" => Some(LevelFilter::Warn),
            "info" => Some(LevelFilter::Info),
            "debug" => Some(LevelFilter::Debug),
            "trace" => Some(LevelFilter::Trace),
            _ => None,
        }
    }
}

// Implement the Log trait to make our Logger work with the log crate
impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let message = format!("[{}] {}", record.level(), record.args());
            let _ = self.write_file(&message);

            eprintln!("{}", message);
        }
    }

    fn flush(&self) {
        // Already flushing in write_file
    }
}
