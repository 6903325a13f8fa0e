//! `log` backend writing to the process console.
//!
//! Records are formatted as `[LEVEL] target: message`, one line per record.

use core::fmt;

use log::Record;

/// Format one record as a console line.
pub fn write_record<W: fmt::Write>(out: &mut W, record: &Record<'_>) -> fmt::Result {
    writeln!(out, "[{}] {}: {}", record.level(), record.target(), record.args())
}

#[cfg(any(target_arch = "aarch64", target_arch = "x86_64"))]
mod global {
    use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

    use super::write_record;
    use crate::io::console::{self, CONSOLE};

    /// Logger backed by the global console.
    pub struct ConsoleLogger;

    static LOGGER: ConsoleLogger = ConsoleLogger;

    impl Log for ConsoleLogger {
        fn enabled(&self, metadata: &Metadata<'_>) -> bool {
            metadata.level() <= log::max_level()
        }

        fn log(&self, record: &Record<'_>) {
            if !self.enabled(record.metadata()) {
                return;
            }
            let mut console = CONSOLE.lock();
            let _ = write_record(&mut *console, record);
        }

        fn flush(&self) {
            console::flush();
        }
    }

    /// Install the console logger with `level` as the maximum level.
    ///
    /// Fails if a logger is already installed.
    pub fn init_logger(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_logger(&LOGGER)?;
        log::set_max_level(level);
        Ok(())
    }
}

#[cfg(any(target_arch = "aarch64", target_arch = "x86_64"))]
pub use global::{init_logger, ConsoleLogger};
