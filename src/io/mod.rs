//! Console I/O for user programs
//!
//! - Line-buffered console on standard output (`uprint!`, `uprintln!`)
//! - `log` backend so runtime and program messages share the console

pub mod console;
pub mod logger;

pub use console::{Console, ConsoleError, LINE_CAP};
#[cfg(any(target_arch = "aarch64", target_arch = "x86_64"))]
pub use logger::{init_logger, ConsoleLogger};
