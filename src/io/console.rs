//! Buffered console output over the `write` syscall
//!
//! Output is collected in a small line buffer and handed to the kernel one
//! line at a time, so a `uprintln!` costs one trap instead of one per
//! formatting fragment.
//!
//! # Flush Points
//! - A `\n` is written
//! - The line buffer is full
//! - [`Console::flush`] is called (also done by `sys::exit`, `sys::fork`)

use core::fmt::{self, Write};

use crate::syscall::{Fd, SyscallError, Syscalls};
use crate::trap::TrapGate;

/// Capacity of the line buffer in bytes.
pub const LINE_CAP: usize = 128;

/// Error type for console output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleError {
    /// The kernel rejected the write.
    Kernel(SyscallError),
    /// The kernel accepted a write but consumed no bytes.
    Stalled,
}

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kernel(e) => write!(f, "console write failed: {}", e),
            Self::Stalled => f.write_str("console write made no progress"),
        }
    }
}

impl From<SyscallError> for ConsoleError {
    fn from(e: SyscallError) -> Self {
        Self::Kernel(e)
    }
}

/// Line-buffered writer to a file descriptor.
pub struct Console<G: TrapGate> {
    sys: Syscalls<G>,
    fd: Fd,
    buf: [u8; LINE_CAP],
    len: usize,
}

impl<G: TrapGate> Console<G> {
    /// Create a console writing to standard output.
    pub const fn new(gate: G) -> Self {
        Self::with_fd(gate, Fd::STDOUT)
    }

    /// Create a console writing to `fd`.
    pub const fn with_fd(gate: G, fd: Fd) -> Self {
        Self {
            sys: Syscalls::new(gate),
            fd,
            buf: [0; LINE_CAP],
            len: 0,
        }
    }

    /// Bytes waiting for the next flush.
    pub fn pending(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// The facade this console writes through.
    pub fn syscalls(&self) -> &Syscalls<G> {
        &self.sys
    }

    /// Append bytes, flushing at every newline and whenever the buffer fills.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), ConsoleError> {
        for &byte in bytes {
            if self.len == LINE_CAP {
                self.flush()?;
            }
            self.buf[self.len] = byte;
            self.len += 1;
            if byte == b'\n' {
                self.flush()?;
            }
        }
        Ok(())
    }

    /// Hand all buffered bytes to the kernel.
    ///
    /// Short writes are continued from where the kernel stopped. On error
    /// the remaining bytes are dropped so the buffer is always empty after
    /// this returns.
    pub fn flush(&mut self) -> Result<(), ConsoleError> {
        let mut done = 0;
        let result = loop {
            if done == self.len {
                break Ok(());
            }
            match self.sys.write(self.fd, &self.buf[done..self.len]) {
                Ok(0) => break Err(ConsoleError::Stalled),
                Ok(n) => done += n.min(self.len - done),
                Err(e) => break Err(e.into()),
            }
        };
        self.len = 0;
        result
    }
}

impl<G: TrapGate> Write for Console<G> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_bytes(s.as_bytes()).map_err(|_| fmt::Error)
    }
}

#[cfg(any(target_arch = "aarch64", target_arch = "x86_64"))]
mod global {
    use core::fmt::{self, Write};
    use spin::Mutex;

    use super::Console;
    use crate::trap::NativeGate;

    /// Process-wide console on standard output.
    pub static CONSOLE: Mutex<Console<NativeGate>> = Mutex::new(Console::new(NativeGate {}));

    /// Format into the global console. Used by `uprint!`.
    pub fn print_fmt(args: fmt::Arguments<'_>) {
        let _ = CONSOLE.lock().write_fmt(args);
    }

    /// Flush the global console, discarding output the kernel refuses.
    pub fn flush() {
        let _ = CONSOLE.lock().flush();
    }
}

#[cfg(any(target_arch = "aarch64", target_arch = "x86_64"))]
pub use global::{flush, print_fmt, CONSOLE};

/// Print to standard output.
#[macro_export]
macro_rules! uprint {
    ($($arg:tt)*) => {
        $crate::io::console::print_fmt(format_args!($($arg)*))
    };
}

/// Print a line to standard output.
#[macro_export]
macro_rules! uprintln {
    () => {
        $crate::uprint!("\n")
    };
    ($($arg:tt)*) => {
        $crate::io::console::print_fmt(format_args!("{}\n", format_args!($($arg)*)))
    };
}
